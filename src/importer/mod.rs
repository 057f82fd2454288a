// ==========================================
// 土方工程量估算 - 导入层
// ==========================================
// 职责: 柱状图与平均地面高程文件导入
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod borehole_importer;
pub mod borehole_importer_trait;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use borehole_importer::BoreholeImporter;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};

// 重导出 Trait 接口
pub use borehole_importer_trait::{DataCleaner, FieldMapper, FileParser, NumericCell};
