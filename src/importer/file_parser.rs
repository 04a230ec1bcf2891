// ==========================================
// 矿石配矿系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 规范化表头（小写、去空白）→ 单元格文本
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::lot_importer_trait::{FileParser, RawRecord};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// 表头规范化: 去空白、小写、合并连续空白
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 根据表头行判断分隔符（逗号或分号）
pub fn detect_delimiter(header_line: &str) -> u8 {
    let commas = header_line.matches(',').count();
    let semicolons = header_line.matches(';').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 按表头组装一行；全空行返回 None
fn build_record<I>(headers: &[String], cells: I) -> Option<RawRecord>
where
    I: Iterator<Item = String>,
{
    let mut row_map = HashMap::new();
    for (col_idx, value) in cells.enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if header.is_empty() {
                continue;
            }
            row_map.insert(header.clone(), value.trim().to_string());
        }
    }

    if row_map.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row_map)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let content = fs::read_to_string(file_path)?;
        let delimiter = detect_delimiter(content.lines().next().unwrap_or(""));

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            if let Some(row) = build_record(&headers, record.iter().map(|v| v.to_string())) {
                records.push(row);
            }
        }

        debug!(path = %file_path.display(), rows = records.len(), "CSV 解析完成");
        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 生产分析报表的表头不在首行: 未指定表头行时，
// 取首个含 Fe 列名的行作为表头（找不到则取首行）
pub struct ExcelParser {
    pub header_row: Option<usize>,
}

impl ExcelParser {
    pub fn new() -> Self {
        Self { header_row: None }
    }

    /// 指定表头行（0 起）
    pub fn with_header_row(header_row: usize) -> Self {
        Self {
            header_row: Some(header_row),
        }
    }

    fn locate_header(&self, rows: &[Vec<String>]) -> usize {
        if let Some(idx) = self.header_row {
            return idx;
        }
        rows.iter()
            .position(|row| {
                row.iter()
                    .map(|cell| normalize_header(cell))
                    .any(|h| h == "fe" || h == "fe%")
            })
            .unwrap_or(0)
    }
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        let header_idx = self.locate_header(&rows);
        let header_row = rows
            .get(header_idx)
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row.iter().map(|h| normalize_header(h)).collect();

        let records: Vec<RawRecord> = rows
            .iter()
            .skip(header_idx + 1)
            .filter_map(|row| build_record(&headers, row.iter().cloned()))
            .collect();

        debug!(
            path = %file_path.display(),
            sheet = %sheet_name,
            header_row = header_idx,
            rows = records.len(),
            "Excel 解析完成"
        );
        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser::new().parse_to_raw_records(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
