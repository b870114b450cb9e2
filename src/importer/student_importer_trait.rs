// ==========================================
// 学生档案管理 - 学生导入 Trait 定义
// ==========================================
// 职责: 定义导入流水线各阶段的接口（不包含实现）
// 流水线: FileParser → FieldMapper → RowValidator → StudentImporter → 汇总报告
// ==========================================

use crate::domain::import::{ImportPreview, ImportReport, MappedRow, RawRow, RowFailure};
use crate::domain::student::{CandidateStudentRecord, NewStudent};
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 二进制表格 → 原始行（含表头, 表头为第 0 行）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析内存中的文件内容
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 第一张工作表的全部行（空白行保留）
    /// - Err(ImportError::UnreadableFile): 内容损坏、无工作表或工作表为空
    fn parse_to_raw_rows(&self, payload: &[u8]) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 按表头列名把原始行映射为候选记录
pub trait FieldMapper: Send + Sync {
    /// 映射数据行（首行视为表头, 空白行静默丢弃）
    fn map_rows(&self, rows: Vec<RawRow>) -> Vec<MappedRow>;

    /// 预览: 映射结果 + 提示性警告（不落库）
    fn preview(&self, rows: Vec<RawRow>) -> ImportPreview;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 写库前的结构性复核（必填字段、出生日期格式）
pub trait RowValidator: Send + Sync {
    fn validate(&self, record: &CandidateStudentRecord) -> Result<NewStudent, RowFailure>;
}

// ==========================================
// StudentImporter Trait
// ==========================================
// 用途: 逐行复核并写库, 汇总为导入报告
#[async_trait]
pub trait StudentImporter: Send + Sync {
    /// 导入已映射的行
    ///
    /// # 返回
    /// - Ok(ImportReport): 每一行都有结果（成功或失败）, 部分成功不回滚
    /// - Err(ImportError::InvalidRequest): 批次为空
    async fn import_rows(&self, rows: Vec<MappedRow>) -> ImportResult<ImportReport>;
}
