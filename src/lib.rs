// ==========================================
// 矿石配矿系统 - 核心库
// ==========================================
// 职责: 按产品粒级将矿石批次配入目标吨位，
//       在化学指标约束下完成贪心分配、回收、强制分配与反向调整估算
// 系统定位: 决策支持系统 (强制分配需人工确认)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 配矿算法
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AdjustmentStatus, AlarmSeverity, AlarmType, AllocationStatus, ChemParam, ChemistryBasis,
    ProductSize, SpecSource,
};

// 领域实体
pub use domain::{
    AdjustmentReport, Allocation, BlendAlarm, BlendRunResult, BlendSummary, Chemistry, Lot,
    ParameterAdjustment, SizeBlendResult, SizeSpecOverride, SpecCompliance, SpecConfig, SpecSet,
};

// 引擎
pub use engine::{
    BlendOrchestrator, ForcedAllocationPass, GreedyAllocator, RecoveryPass, ResultAggregator,
    ReverseAdjustmentEstimator, SpecResolver,
};

// API
pub use api::{ApiError, BlendApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "矿石配矿系统";
