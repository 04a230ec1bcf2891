// ==========================================
// 矿石配矿系统 - 规格解析器
// ==========================================
// 职责: 每粒级解析一次有效规格
// 顺序: 粒级覆写 → 首批次内嵌规格 → 全局缺省
// 红线: 解析总是成功，不产生错误
// ==========================================

use crate::domain::lot::Lot;
use crate::domain::spec::{ResolvedSpec, SizeSpecOverride, SpecSet};
use crate::domain::types::{ProductSize, SpecSource};
use std::collections::BTreeMap;
use tracing::debug;

pub struct SpecResolver {
    // 无状态引擎
}

impl SpecResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 解析单粒级有效规格
    ///
    /// 规则:
    /// 1) 覆写表中存在该粒级 → 覆写字段优先，0/缺省字段回退全局
    /// 2) 否则首个批次带 fe_spec_min / sio2_spec_max → 采用对应字段
    /// 3) Al2O3 / P 始终取全局（批次无此内嵌规格）
    ///
    /// # 参数
    /// - `global`: 全局缺省规格
    /// - `overrides`: 粒级覆写表
    /// - `size`: 当前粒级
    /// - `lots`: 当前粒级的批次（输入顺序）
    pub fn resolve(
        &self,
        global: &SpecSet,
        overrides: &BTreeMap<ProductSize, SizeSpecOverride>,
        size: ProductSize,
        lots: &[Lot],
    ) -> ResolvedSpec {
        if let Some(size_override) = overrides.get(&size) {
            let spec = size_override.merge_onto(global);
            debug!(
                product_size = %size,
                fe_min = spec.fe_min,
                sio2_max = spec.sio2_max,
                al_max = spec.al_max,
                p_max = spec.p_max,
                "采用粒级覆写规格"
            );
            return ResolvedSpec {
                spec,
                source: SpecSource::SizeOverride,
            };
        }

        let mut spec = *global;
        let mut source = SpecSource::Global;
        if let Some(first) = lots.first() {
            if let Some(fe_min) = first.spec_override.fe_spec_min {
                spec.fe_min = fe_min;
                source = SpecSource::LotEmbedded;
            }
            if let Some(sio2_max) = first.spec_override.sio2_spec_max {
                spec.sio2_max = sio2_max;
                source = SpecSource::LotEmbedded;
            }
        }

        debug!(
            product_size = %size,
            source = %source,
            fe_min = spec.fe_min,
            sio2_max = spec.sio2_max,
            al_max = spec.al_max,
            p_max = spec.p_max,
            "粒级有效规格"
        );
        ResolvedSpec { spec, source }
    }
}

impl Default for SpecResolver {
    fn default() -> Self {
        Self::new()
    }
}
