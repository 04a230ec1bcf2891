// ==========================================
// 矿石配矿系统 - 引擎层
// ==========================================
// 职责: 配矿核心算法（贪心分配 + 回收 + 强制 + 汇总 + 反向调整）
// 红线: 引擎无状态、无 I/O，所有判定原因仅输出到诊断日志
// ==========================================

pub mod aggregator;
pub mod forced;
pub mod greedy_allocator;
pub mod orchestrator;
pub mod recovery;
pub mod reverse_adjustment;
pub mod running_blend;
pub mod spec_resolver;

// 重导出核心引擎
pub use aggregator::ResultAggregator;
pub use forced::ForcedAllocationPass;
pub use greedy_allocator::GreedyAllocator;
pub use orchestrator::BlendOrchestrator;
pub use recovery::{RecoveryPass, RECOVERY_CHECKED_PARAMS};
pub use reverse_adjustment::{reference_grade, ReverseAdjustmentEstimator};
pub use running_blend::{AllocationState, RejectedLot, RunningBlend};
pub use spec_resolver::SpecResolver;
