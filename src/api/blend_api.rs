// ==========================================
// 矿石配矿系统 - 配矿 API
// ==========================================
// 职责: 输入校验 → 配矿编排 → 结果返回
// 校验只在此层进行，核心引擎假定输入合法
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::BlendConfig;
use crate::domain::adjustment::BlendRunResult;
use crate::domain::lot::Lot;
use crate::domain::types::ChemParam;
use crate::engine::BlendOrchestrator;
use crate::i18n;
use crate::importer::{LotImporter, SkippedRow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

/// 导入摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
}

/// 文件配矿响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendApiResponse {
    pub import: ImportSummary,
    pub result: BlendRunResult,
}

// ==========================================
// BlendApi - 配矿 API
// ==========================================
pub struct BlendApi {
    orchestrator: BlendOrchestrator,
    importer: LotImporter,
}

impl BlendApi {
    pub fn new() -> Self {
        Self {
            orchestrator: BlendOrchestrator::new(),
            importer: LotImporter::new(),
        }
    }

    /// 对给定批次执行配矿
    ///
    /// # 返回
    /// - Ok(BlendRunResult): 按粒级的配矿汇总 + 反向调整报告
    /// - Err(Config): 配置校验失败
    /// - Err(InvalidInput): 批次数据非法（吨位非正、化学成分非有限数等）
    #[instrument(skip(self, lots, config), fields(lot_count = lots.len()))]
    pub fn run_blend(&self, lots: &[Lot], config: &BlendConfig) -> ApiResult<BlendRunResult> {
        config.validate()?;
        validate_lots(lots)?;

        // 文本语言随配置切换
        i18n::set_locale(&config.locale);

        let result = self
            .orchestrator
            .run(lots, config.target_tonnage_t, &config.spec_config());

        if result.requires_attention() {
            warn!("存在强制分配批次，需人工确认");
        }
        info!(sizes = result.results.len(), "配矿完成");
        Ok(result)
    }

    /// 从文件导入批次并执行配矿
    #[instrument(skip(self, file_path, config), fields(path = %file_path.as_ref().display()))]
    pub fn run_blend_from_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        config: &BlendConfig,
    ) -> ApiResult<BlendApiResponse> {
        // 先校验配置，避免无效配置下的文件解析
        config.validate()?;

        let outcome = self.importer.import_file(file_path)?;
        let result = self.run_blend(&outcome.lots, config)?;

        Ok(BlendApiResponse {
            import: ImportSummary {
                total_rows: outcome.total_rows,
                imported: outcome.lots.len(),
                skipped: outcome.skipped,
            },
            result,
        })
    }
}

impl Default for BlendApi {
    fn default() -> Self {
        Self::new()
    }
}

/// 批次输入校验
fn validate_lots(lots: &[Lot]) -> ApiResult<()> {
    if lots.is_empty() {
        return Err(ApiError::InvalidInput("批次列表为空".to_string()));
    }

    for lot in lots {
        if !lot.tonnage_t.is_finite() || lot.tonnage_t <= 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "批次 {} 吨位必须为正数: {}",
                lot.lot_id, lot.tonnage_t
            )));
        }
        for param in ChemParam::ALL {
            let value = lot.chemistry.get(param);
            if !value.is_finite() || value < 0.0 {
                return Err(ApiError::InvalidInput(format!(
                    "批次 {} 的 {} 必须为非负有限数: {}",
                    lot.lot_id, param, value
                )));
            }
        }
    }
    Ok(())
}
