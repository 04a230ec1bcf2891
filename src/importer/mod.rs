// ==========================================
// 矿石配矿系统 - 导入层
// ==========================================
// 职责: 外部批次数据导入（核心算法之外）
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod lot_importer;
pub mod lot_importer_trait;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{LotFieldMapper, DEFAULT_LOT_TONNAGE_T};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use lot_importer::{ImportOutcome, LotImporter, SkippedRow};

// 重导出 Trait 接口
pub use lot_importer_trait::{FieldMapper, FileParser, RawRecord};
