// ==========================================
// 矿石配矿系统 - API层错误类型
// ==========================================
// 职责: 汇总导入/配置错误与输入校验错误
// 核心算法不返回错误，所有失败均在此层产生
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
