// ==========================================
// 矿石配矿系统 - 质量规格
// ==========================================
// 职责: 规格集合与三级优先级的输入载体
// 优先级: 由 SpecResolver 统一解析（每粒级一次）
// ==========================================

use crate::domain::lot::Chemistry;
use crate::domain::types::{ChemParam, ProductSize, SpecSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SpecSet - 有效规格
// ==========================================
// Fe 为下限，SiO2/Al2O3/P 为上限
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecSet {
    pub fe_min: f64,
    pub sio2_max: f64,
    pub al_max: f64,
    pub p_max: f64,
}

impl SpecSet {
    pub fn new(fe_min: f64, sio2_max: f64, al_max: f64, p_max: f64) -> Self {
        Self {
            fe_min,
            sio2_max,
            al_max,
            p_max,
        }
    }

    /// 按指标取界限值
    pub fn bound(&self, param: ChemParam) -> f64 {
        match param {
            ChemParam::Fe => self.fe_min,
            ChemParam::SiO2 => self.sio2_max,
            ChemParam::Al2O3 => self.al_max,
            ChemParam::P => self.p_max,
        }
    }

    /// 单项指标是否满足
    pub fn satisfies(&self, param: ChemParam, value: f64) -> bool {
        let bound = self.bound(param);
        if param.is_lower_bound() {
            value >= bound
        } else {
            value <= bound
        }
    }

    /// 四项指标全部满足
    pub fn satisfied_by(&self, chem: &Chemistry) -> bool {
        ChemParam::ALL
            .iter()
            .all(|param| self.satisfies(*param, chem.get(*param)))
    }
}

impl Default for SpecSet {
    fn default() -> Self {
        Self::new(62.0, 6.0, 1.5, 0.06)
    }
}

// ==========================================
// SizeSpecOverride - 粒级覆写
// ==========================================
// 字段为 None 或 0 时回退到全局对应字段
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeSpecOverride {
    #[serde(default)]
    pub fe_min: Option<f64>,
    #[serde(default)]
    pub sio2_max: Option<f64>,
    #[serde(default)]
    pub al_max: Option<f64>,
    #[serde(default)]
    pub p_max: Option<f64>,
}

impl SizeSpecOverride {
    /// 与全局规格合并
    pub fn merge_onto(&self, global: &SpecSet) -> SpecSet {
        SpecSet {
            fe_min: pick(self.fe_min, global.fe_min),
            sio2_max: pick(self.sio2_max, global.sio2_max),
            al_max: pick(self.al_max, global.al_max),
            p_max: pick(self.p_max, global.p_max),
        }
    }
}

fn pick(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 => v,
        _ => fallback,
    }
}

// ==========================================
// SpecConfig - 规格配置快照
// ==========================================
// 由调用方按值传入，核心不持有任何跨次运行的状态
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecConfig {
    pub global: SpecSet,
    #[serde(default)]
    pub size_overrides: BTreeMap<ProductSize, SizeSpecOverride>,
}

impl SpecConfig {
    pub fn new(global: SpecSet) -> Self {
        Self {
            global,
            size_overrides: BTreeMap::new(),
        }
    }

    pub fn with_size_override(mut self, size: ProductSize, spec: SizeSpecOverride) -> Self {
        self.size_overrides.insert(size, spec);
        self
    }
}

// ==========================================
// ResolvedSpec - 解析结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSpec {
    pub spec: SpecSet,
    pub source: SpecSource,
}
