// ==========================================
// 矿石配矿系统 - 结果汇总
// ==========================================
// 职责: 由最终累计和与台账生成单粒级 BlendSummary
// 兜底: 从未分配任何吨位时，按全部批次加权平均，保证总有汇总输出
// ==========================================

use crate::domain::blend::{BlendSummary, SpecCompliance};
use crate::domain::lot::{Chemistry, Lot};
use crate::domain::spec::SpecSet;
use crate::domain::types::{AllocationStatus, ChemistryBasis, ProductSize};
use crate::engine::running_blend::{AllocationState, RunningBlend};
use tracing::{info, warn};

pub struct ResultAggregator {
    // 无状态引擎
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 生成配矿汇总
    ///
    /// # 参数
    /// - `product_size`: 粒级
    /// - `lots`: 该粒级全部批次（兜底平均使用）
    /// - `spec`: 有效规格
    /// - `state`: 三轮分配结束后的状态
    pub fn aggregate(
        &self,
        product_size: ProductSize,
        lots: &[Lot],
        spec: &SpecSet,
        state: AllocationState,
    ) -> BlendSummary {
        let total_allocated_t = state.running.tonnage_t;

        let (chemistry, contribution_total, chemistry_basis) = match state.running.average() {
            Some(avg) => (avg, state.running.sums, ChemistryBasis::Allocated),
            None => {
                let full = self.full_lot_set_blend(lots);
                warn!(
                    product_size = %product_size,
                    "未分配任何吨位，按全部批次加权平均给出化学成分"
                );
                (
                    full.average().unwrap_or_default(),
                    full.sums,
                    ChemistryBasis::FullLotSet,
                )
            }
        };

        let shortfall_t = if state.target_t > total_allocated_t {
            state.target_t - total_allocated_t
        } else {
            0.0
        };
        if shortfall_t > 0.0 {
            warn!(
                product_size = %product_size,
                target_t = state.target_t,
                total_allocated_t,
                shortfall_t,
                "目标吨位未满足（批次总量不足）"
            );
        }

        let met_specs = SpecCompliance::evaluate(&chemistry, spec);
        let count = |status: AllocationStatus| {
            state.ledger.iter().filter(|a| a.status == status).count()
        };
        let recovered_count = count(AllocationStatus::Recovered);
        let forced_count = count(AllocationStatus::Forced);

        info!(
            product_size = %product_size,
            total_allocated_t,
            fe = chemistry.fe,
            sio2 = chemistry.sio2,
            all_met = met_specs.all_met(),
            rejected = state.rejected_count,
            recovered = recovered_count,
            forced = forced_count,
            "粒级配矿完成"
        );

        BlendSummary {
            product_size,
            chemistry,
            chemistry_basis,
            contribution_total,
            target_t: state.target_t,
            total_allocated_t,
            shortfall_t,
            spec: *spec,
            met_specs,
            rejected_count: state.rejected_count,
            recovered_count,
            forced_count,
            allocations: state.ledger,
        }
    }

    /// 全部批次按整批吨位的加权和（不考虑规格）
    fn full_lot_set_blend(&self, lots: &[Lot]) -> RunningBlend {
        lots.iter().fold(RunningBlend::default(), |mut acc, lot| {
            acc.commit(lot, lot.tonnage_t);
            acc
        })
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}
