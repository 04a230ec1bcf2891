// ==========================================
// 矿石配矿系统 - 领域模型层
// ==========================================
// 职责: 定义批次、规格、分配台账与报告实体
// 红线: 不含文件解析逻辑，不含引擎逻辑
// ==========================================

pub mod adjustment;
pub mod blend;
pub mod lot;
pub mod spec;
pub mod types;

// 重导出核心类型
pub use adjustment::{
    AdjustmentReport, BlendAlarm, BlendRunResult, ForcedLotEntry, ParameterAdjustment,
    SizeBlendResult,
};
pub use blend::{Allocation, BlendSummary, SpecCompliance};
pub use lot::{Chemistry, Lot, LotSpecOverride};
pub use spec::{ResolvedSpec, SizeSpecOverride, SpecConfig, SpecSet};
pub use types::{
    AdjustmentStatus, AlarmSeverity, AlarmType, AllocationStatus, ChemParam, ChemistryBasis,
    ProductSize, SpecSource,
};
