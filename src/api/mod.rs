// ==========================================
// 矿石配矿系统 - API层
// ==========================================
// 职责: 对外业务接口（CLI / 嵌入调用方）
// ==========================================

pub mod blend_api;
pub mod error;

pub use blend_api::{BlendApi, BlendApiResponse, ImportSummary};
pub use error::{ApiError, ApiResult};
