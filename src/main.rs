// ==========================================
// 矿石配矿系统 - 命令行入口
// ==========================================
// 流程: 解析参数 → 加载配置 → 导入批次 → 配矿 → 输出 JSON
// 日志输出到 stderr，结果输出到 stdout
// ==========================================

use anyhow::{bail, Context, Result};
use clap::Parser;
use ore_blending::api::BlendApi;
use ore_blending::config::{default_config_path, BlendConfig};
use ore_blending::logging::{self, LogFormat};
use std::path::PathBuf;

/// 矿石配矿命令行参数
#[derive(Debug, Parser)]
#[command(name = "ore-blending", version, about = "按粒级化学指标的批次配矿")]
struct Args {
    /// 批次文件（.csv / .xlsx / .xls）
    #[arg(long)]
    lots: PathBuf,

    /// 配置文件（JSON）；缺省读取用户配置目录下 ore-blending/config.json
    #[arg(long)]
    config: Option<PathBuf>,

    /// 目标吨位（覆盖配置）
    #[arg(long)]
    target: Option<f64>,

    /// 文本语言（zh-CN / en，覆盖配置）
    #[arg(long)]
    locale: Option<String>,

    /// 格式化输出 JSON
    #[arg(long)]
    pretty: bool,

    /// 日志以 JSON 格式输出
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_with_format(if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    tracing::info!("{} v{}", ore_blending::APP_NAME, ore_blending::VERSION);

    let mut config = load_config(args.config.as_ref())?;
    if let Some(target) = args.target {
        config.target_tonnage_t = target;
    }
    if let Some(locale) = args.locale {
        config.locale = locale;
    }

    let api = BlendApi::new();
    let response = api
        .run_blend_from_file(&args.lots, &config)
        .with_context(|| format!("配矿失败: {}", args.lots.display()))?;

    for skipped in &response.import.skipped {
        tracing::warn!(row = skipped.row, reason = %skipped.reason, "跳过数据行");
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    Ok(())
}

/// 显式路径必须存在；否则回退到缺省路径或缺省配置
fn load_config(path: Option<&PathBuf>) -> Result<BlendConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                bail!("配置文件不存在: {}", path.display());
            }
            BlendConfig::load_from_file(path)
                .with_context(|| format!("无法加载配置: {}", path.display()))
        }
        None => {
            if let Some(default_path) = default_config_path() {
                tracing::debug!(path = %default_path.display(), "缺省配置路径");
            }
            BlendConfig::load_or_default().context("无法加载缺省配置")
        }
    }
}
