// ==========================================
// 矿石配矿系统 - 配置层
// ==========================================
// 职责: 运行配置加载、保存、校验
// 存储: JSON 文件
// ==========================================

pub mod blend_config;

// 重导出核心配置
pub use blend_config::{
    default_config_path, BlendConfig, ConfigError, ConfigResult, CONFIG_PATH_ENV,
    DEFAULT_LOCALE, DEFAULT_TARGET_TONNAGE_T,
};
