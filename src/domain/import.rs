// ==========================================
// 学生档案管理 - 导入过程值类型
// ==========================================
// 职责: 表格单元格、原始行、表头索引、逐行结果与导入报告
// 生命周期: 全部为请求级对象, 报告直接返回不落库
// ==========================================

use crate::domain::student::{CandidateStudentRecord, StudentField};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Cell - 单元格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// 空单元格或仅含空白的文本
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// 转为去除首尾空白的文本, 空白返回 None
    ///
    /// 整数值不带小数部分（12345.0 → "12345"）
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
            Cell::Number(n) => Some(format_number(*n)),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// RawRow - 表格原始行
// ==========================================
// row_number 为工作表中的位置（表头 = 0）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_number: usize,
    pub cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<Cell>) -> Self {
        Self { row_number, cells }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }

    pub fn cell(&self, position: usize) -> Option<&Cell> {
        self.cells.get(position)
    }
}

// ==========================================
// HeaderIndex - 表头索引
// ==========================================
// 列名精确匹配; 同名列出现多次时取第一列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// 由表头行构建索引
    pub fn build(header: &RawRow) -> Self {
        let mut positions = HashMap::new();
        for (position, cell) in header.cells.iter().enumerate() {
            // 文本列名不去空白: "NIM " 不等于 "NIM"
            let label = match cell {
                Cell::Text(s) if !s.is_empty() => Some(s.clone()),
                Cell::Text(_) => None,
                other => other.as_text(),
            };
            if let Some(label) = label {
                positions.entry(label).or_insert(position);
            }
        }
        Self { positions }
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    pub fn position_of(&self, field: StudentField) -> Option<usize> {
        self.position(field.label())
    }
}

// ==========================================
// RowFailure - 单行失败原因
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowFailure {
    MissingField { field: String },
    InvalidDateFormat { value: String },
    UniquenessViolation { message: String },
    Persistence { message: String },
}

impl RowFailure {
    pub fn missing(field: StudentField) -> Self {
        RowFailure::MissingField {
            field: field.key().to_string(),
        }
    }
}

// ==========================================
// MappedRow - 行映射结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedRow {
    pub row_number: usize,
    pub nim: Option<String>,
    pub failure: RowFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MappedRow {
    Candidate {
        row_number: usize,
        record: CandidateStudentRecord,
    },
    Failed(FailedRow),
}

impl MappedRow {
    pub fn row_number(&self) -> usize {
        match self {
            MappedRow::Candidate { row_number, .. } => *row_number,
            MappedRow::Failed(failed) => failed.row_number,
        }
    }
}

// ==========================================
// RowOutcome - 单行导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Imported {
        row_number: usize,
        nim: String,
        student_id: i64,
    },
    Failed {
        row_number: usize,
        nim: Option<String>,
        failure: RowFailure,
    },
}

impl RowOutcome {
    pub fn is_imported(&self) -> bool {
        matches!(self, RowOutcome::Imported { .. })
    }

    pub fn row_number(&self) -> usize {
        match self {
            RowOutcome::Imported { row_number, .. } | RowOutcome::Failed { row_number, .. } => {
                *row_number
            }
        }
    }
}

impl From<FailedRow> for RowOutcome {
    fn from(failed: FailedRow) -> Self {
        RowOutcome::Failed {
            row_number: failed.row_number,
            nim: failed.nim,
            failure: failed.failure,
        }
    }
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportShape {
    AllImported,
    Partial,
    NoneImported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub imported_count: usize,
    pub failed_count: usize,
    /// 按行号顺序排列的失败说明
    pub error_messages: Vec<String>,
    pub outcomes: Vec<RowOutcome>,
    pub elapsed_ms: u64,
}

impl ImportReport {
    pub fn shape(&self) -> ReportShape {
        if self.imported_count == 0 {
            ReportShape::NoneImported
        } else if self.failed_count == 0 {
            ReportShape::AllImported
        } else {
            ReportShape::Partial
        }
    }
}

// ==========================================
// ImportPreview - 导入预览（不落库）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPreview {
    pub total_rows: usize,
    pub rows: Vec<MappedRow>,
    pub missing_columns: Vec<String>,
    pub warnings: Vec<String>,
}
