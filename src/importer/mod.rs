// ==========================================
// 学生档案管理 - 导入层
// ==========================================
// 职责: 表格/JSON 批量导入学生数据
// 流程: 文件解析 → 字段映射 → 行级复核 → 逐行写库 → 结果汇总
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod report;
pub mod row_validator;
pub mod student_importer_impl;
pub mod student_importer_trait;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{canonicalize_date, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use report::{format_row_error, summary_message, ReportAggregator};
pub use row_validator::RowValidator as RowValidatorImpl;
pub use student_importer_impl::StudentImporterImpl;

// 重导出 Trait 接口
pub use student_importer_trait::{FieldMapper, FileParser, RowValidator, StudentImporter};
