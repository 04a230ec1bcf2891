// ==========================================
// 矿石配矿系统 - 运行配置
// ==========================================
// 职责: 目标吨位 + 全局规格 + 粒级覆写 + 语言
// 存储: JSON 文件（serde_json）
// ==========================================

use crate::domain::spec::{SizeSpecOverride, SpecConfig, SpecSet};
use crate::domain::types::ProductSize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 缺省目标吨位
pub const DEFAULT_TARGET_TONNAGE_T: f64 = 10000.0;

/// 缺省语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// 配置文件路径环境变量（优先于用户配置目录）
pub const CONFIG_PATH_ENV: &str = "ORE_BLENDING_CONFIG_PATH";

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置项无效 ({key}): {message}")]
    Invalid { key: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// BlendConfig - 配矿运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    pub target_tonnage_t: f64,
    pub global_spec: SpecSet,
    pub size_overrides: BTreeMap<ProductSize, SizeSpecOverride>,
    pub locale: String,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            target_tonnage_t: DEFAULT_TARGET_TONNAGE_T,
            global_spec: SpecSet::default(),
            size_overrides: BTreeMap::new(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl BlendConfig {
    /// 从 JSON 文件加载（缺失字段取缺省值）
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: BlendConfig = serde_json::from_str(&content)?;
        debug!(path = %path.as_ref().display(), "配置加载完成");
        Ok(config)
    }

    /// 保存为 JSON 文件（自动创建父目录）
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!(path = %path.display(), "配置已保存");
        Ok(())
    }

    /// 读取缺省路径的配置；文件不存在时返回缺省配置
    pub fn load_or_default() -> ConfigResult<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// 配置校验
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.target_tonnage_t.is_finite() || self.target_tonnage_t <= 0.0 {
            return Err(invalid(
                "target_tonnage_t",
                format!("目标吨位必须为正数: {}", self.target_tonnage_t),
            ));
        }

        check_spec("global_spec", &self.global_spec)?;
        for (size, spec) in &self.size_overrides {
            let merged = spec.merge_onto(&self.global_spec);
            check_spec(&format!("size_overrides.{}", size), &merged)?;
        }

        if !crate::i18n::is_supported(&self.locale) {
            return Err(invalid("locale", format!("不支持的语言: {}", self.locale)));
        }
        Ok(())
    }

    /// 投影为引擎使用的规格快照
    pub fn spec_config(&self) -> SpecConfig {
        SpecConfig {
            global: self.global_spec,
            size_overrides: self.size_overrides.clone(),
        }
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message,
    }
}

fn check_spec(key: &str, spec: &SpecSet) -> ConfigResult<()> {
    let fields = [
        ("fe_min", spec.fe_min),
        ("sio2_max", spec.sio2_max),
        ("al_max", spec.al_max),
        ("p_max", spec.p_max),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(
                &format!("{}.{}", key, name),
                format!("规格值必须为非负有限数: {}", value),
            ));
        }
    }
    if spec.fe_min > 100.0 {
        return Err(invalid(
            &format!("{}.fe_min", key),
            format!("Fe 下限不得超过 100%: {}", spec.fe_min),
        ));
    }
    Ok(())
}

/// 缺省配置文件路径
///
/// 优先读取环境变量 ORE_BLENDING_CONFIG_PATH，
/// 否则为用户配置目录下 ore-blending/config.json
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    dirs::config_dir().map(|dir| dir.join("ore-blending").join("config.json"))
}
