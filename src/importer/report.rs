// ==========================================
// 学生档案管理 - 导入结果汇总
// ==========================================
// 职责: 逐行结果 → 导入报告（计数、按行号排序的错误说明、总体提示）
// ==========================================

use crate::domain::import::{ImportReport, ReportShape, RowFailure, RowOutcome};
use crate::i18n::{t, t_with_args};
use std::time::Duration;

/// 单行失败原因的用户可读说明
pub fn describe_failure(failure: &RowFailure) -> String {
    match failure {
        RowFailure::MissingField { field } => {
            t_with_args("import.missing_field", &[("field", field)])
        }
        RowFailure::InvalidDateFormat { value } => {
            t_with_args("import.invalid_date", &[("value", value)])
        }
        RowFailure::UniquenessViolation { message } => {
            t_with_args("import.duplicate_nim", &[("message", message)])
        }
        RowFailure::Persistence { message } => {
            t_with_args("import.persistence_failed", &[("message", message)])
        }
    }
}

/// 单行错误说明, 例如 "Row 2 (NIM A1): UNIQUE constraint failed: students.nim"
pub fn format_row_error(row_number: usize, nim: Option<&str>, failure: &RowFailure) -> String {
    let row = row_number.to_string();
    let reason = describe_failure(failure);
    match nim {
        Some(nim) => t_with_args(
            "import.row_error_with_nim",
            &[("row", &row), ("nim", nim), ("reason", &reason)],
        ),
        None => t_with_args("import.row_error", &[("row", &row), ("reason", &reason)]),
    }
}

/// 报告的总体提示
pub fn summary_message(report: &ImportReport) -> String {
    match report.shape() {
        ReportShape::AllImported => t_with_args(
            "import.all_imported",
            &[("count", &report.imported_count.to_string())],
        ),
        ReportShape::Partial => t_with_args(
            "import.partial",
            &[
                ("imported", &report.imported_count.to_string()),
                ("failed", &report.failed_count.to_string()),
            ],
        ),
        ReportShape::NoneImported => t("import.none_imported"),
    }
}

// ==========================================
// ReportAggregator
// ==========================================
pub struct ReportAggregator;

impl ReportAggregator {
    /// 汇总逐行结果
    ///
    /// # 参数
    /// - batch_id: 批次号（日志关联用）
    /// - outcomes: 按输入顺序排列的逐行结果
    /// - elapsed: 导入耗时
    pub fn aggregate(batch_id: String, outcomes: Vec<RowOutcome>, elapsed: Duration) -> ImportReport {
        let imported_count = outcomes.iter().filter(|o| o.is_imported()).count();
        let failed_count = outcomes.len() - imported_count;

        let error_messages = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                RowOutcome::Failed {
                    row_number,
                    nim,
                    failure,
                } => Some(format_row_error(*row_number, nim.as_deref(), failure)),
                RowOutcome::Imported { .. } => None,
            })
            .collect();

        ImportReport {
            batch_id,
            imported_count,
            failed_count,
            error_messages,
            outcomes,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}
