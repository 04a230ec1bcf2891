// ==========================================
// 矿石配矿系统 - 配矿结果实体
// ==========================================
// 职责: 分配台账 (Allocation)、配矿汇总 (BlendSummary)
// 生命周期: 每次运行新建，不落库
// ==========================================

use crate::domain::lot::{Chemistry, Lot};
use crate::domain::spec::SpecSet;
use crate::domain::types::{AllocationStatus, ChemParam, ChemistryBasis, ProductSize};
use serde::{Deserialize, Serialize};

// ==========================================
// Allocation - 分配台账行
// ==========================================
// 不变量: 0 < allocated_t <= lot.tonnage_t
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub lot_id: String,
    pub product_size: ProductSize,
    pub allocated_t: f64,
    /// allocated_t × 各指标百分比，作为加权求和项，不再归一化
    pub contribution: Chemistry,
    pub status: AllocationStatus,
}

impl Allocation {
    pub fn new(lot: &Lot, allocated_t: f64, status: AllocationStatus) -> Self {
        Self {
            lot_id: lot.lot_id.clone(),
            product_size: lot.product_size,
            allocated_t,
            contribution: lot.chemistry.scaled(allocated_t),
            status,
        }
    }
}

// ==========================================
// SpecCompliance - 逐项合格判定
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecCompliance {
    pub fe: bool,
    pub sio2: bool,
    pub al2o3: bool,
    pub p: bool,
}

impl SpecCompliance {
    /// 以最终百分比对照有效规格
    pub fn evaluate(chem: &Chemistry, spec: &SpecSet) -> Self {
        Self {
            fe: spec.satisfies(ChemParam::Fe, chem.fe),
            sio2: spec.satisfies(ChemParam::SiO2, chem.sio2),
            al2o3: spec.satisfies(ChemParam::Al2O3, chem.al2o3),
            p: spec.satisfies(ChemParam::P, chem.p),
        }
    }

    pub fn get(&self, param: ChemParam) -> bool {
        match param {
            ChemParam::Fe => self.fe,
            ChemParam::SiO2 => self.sio2,
            ChemParam::Al2O3 => self.al2o3,
            ChemParam::P => self.p,
        }
    }

    pub fn all_met(&self) -> bool {
        self.fe && self.sio2 && self.al2o3 && self.p
    }
}

// ==========================================
// BlendSummary - 单粒级配矿汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendSummary {
    pub product_size: ProductSize,
    /// 加权平均化学成分（全精度）
    pub chemistry: Chemistry,
    pub chemistry_basis: ChemistryBasis,
    /// 加权贡献合计
    pub contribution_total: Chemistry,
    pub target_t: f64,
    pub total_allocated_t: f64,
    /// 目标吨位未满足的差额（批次总量不足时 > 0）
    pub shortfall_t: f64,
    pub spec: SpecSet,
    pub met_specs: SpecCompliance,
    pub rejected_count: usize,
    pub recovered_count: usize,
    pub forced_count: usize,
    /// 台账顺序: ACCEPTED（Fe 降序）→ RECOVERED → FORCED
    pub allocations: Vec<Allocation>,
}

impl BlendSummary {
    /// 按声明精度取整后的化学成分（供展示）
    pub fn display_chemistry(&self) -> Chemistry {
        self.chemistry.rounded()
    }

    pub fn has_shortfall(&self) -> bool {
        self.shortfall_t > 0.0
    }

    pub fn forced_allocations(&self) -> impl Iterator<Item = &Allocation> {
        self.allocations
            .iter()
            .filter(|a| a.status == AllocationStatus::Forced)
    }
}
