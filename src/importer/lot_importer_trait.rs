// ==========================================
// 矿石配矿系统 - 批次导入 Trait
// ==========================================
// 职责: 定义文件解析与字段映射接口（不包含实现）
// ==========================================

use crate::domain::lot::Lot;
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

/// 原始行: 规范化表头（小写、去空白）→ 单元格文本
pub type RawRecord = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser {
    /// 解析文件为原始行（跳过全空行）
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 实现者: LotFieldMapper
pub trait FieldMapper {
    /// 原始行 → 批次
    ///
    /// # 返回
    /// - Ok(Some(lot)): 有效批次
    /// - Ok(None): 非数据行（如 Fe 为空/为 0 的汇总行），静默跳过
    /// - Err: 类型转换或数值范围错误
    fn map_to_lot(&self, row: &RawRecord, row_number: usize) -> ImportResult<Option<Lot>>;
}
