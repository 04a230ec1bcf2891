// ==========================================
// 矿石配矿系统 - 批次导入器
// ==========================================
// 流程: 解析 → 映射 → 汇总（跳过行记录原因）
// 映射失败的行不终止导入，记入 skipped
// ==========================================

use crate::domain::lot::Lot;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{LotFieldMapper, FE_ALIASES};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::lot_importer_trait::{FieldMapper, RawRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

/// 被跳过的数据行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

/// 导入结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub lots: Vec<Lot>,
    pub skipped: Vec<SkippedRow>,
    pub total_rows: usize,
}

impl ImportOutcome {
    pub fn imported_count(&self) -> usize {
        self.lots.len()
    }
}

// ==========================================
// LotImporter - 批次导入器
// ==========================================
pub struct LotImporter {
    field_mapper: Box<dyn FieldMapper>,
}

impl LotImporter {
    pub fn new() -> Self {
        Self {
            field_mapper: Box::new(LotFieldMapper),
        }
    }

    /// 从文件导入批次（.csv / .xlsx / .xls）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 至少一个有效批次
    /// - Err(MissingColumn): 表头无 Fe 列
    /// - Err(NoValidLots): 文件中无有效批次
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportOutcome> {
        let raw_rows = UniversalFileParser.parse(file_path.as_ref())?;

        // Fe 列是判定数据行的依据，缺失即整表无效
        if let Some(first) = raw_rows.first() {
            if !FE_ALIASES.iter().any(|alias| first.contains_key(*alias)) {
                return Err(ImportError::MissingColumn("Fe%".to_string()));
            }
        }

        let outcome = self.import_records(raw_rows);

        if outcome.lots.is_empty() {
            return Err(ImportError::NoValidLots(format!(
                "{} 行数据均无效",
                outcome.total_rows
            )));
        }

        info!(
            imported = outcome.lots.len(),
            skipped = outcome.skipped.len(),
            "批次导入完成"
        );
        Ok(outcome)
    }

    /// 原始行 → 批次（行号从 1 起，不含表头）
    pub fn import_records(&self, raw_rows: Vec<RawRecord>) -> ImportOutcome {
        let total_rows = raw_rows.len();
        let mut lots = Vec::new();
        let mut skipped = Vec::new();

        for (idx, row) in raw_rows.iter().enumerate() {
            let row_number = idx + 1;
            match self.field_mapper.map_to_lot(row, row_number) {
                Ok(Some(lot)) => lots.push(lot),
                Ok(None) => skipped.push(SkippedRow {
                    row: row_number,
                    reason: "Fe 为空或不大于 0".to_string(),
                }),
                Err(e) => {
                    warn!(row_number, error = %e, "字段映射失败");
                    skipped.push(SkippedRow {
                        row: row_number,
                        reason: e.to_string(),
                    });
                }
            }
        }

        ImportOutcome {
            lots,
            skipped,
            total_rows,
        }
    }
}

impl Default for LotImporter {
    fn default() -> Self {
        Self::new()
    }
}
