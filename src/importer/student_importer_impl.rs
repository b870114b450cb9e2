// ==========================================
// 学生档案管理 - 学生批量导入器实现
// ==========================================
// 职责: 逐行复核、写库、汇总
// 流程: 复核 → 写库（每行独立事务）→ 记录结果 → 继续下一行
// 约束:
// - 不做批内去重, NIM 冲突只由数据库唯一约束判定
// - 不重试, 不回滚已成功的行
// ==========================================

use crate::domain::import::{ImportReport, MappedRow, RowFailure, RowOutcome};
use crate::domain::student::CandidateStudentRecord;
use crate::i18n::t;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::report::ReportAggregator;
use crate::importer::student_importer_trait::{RowValidator, StudentImporter};
use crate::repository::{RepositoryError, StudentRepository};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// StudentImporterImpl - 学生批量导入器
// ==========================================
pub struct StudentImporterImpl<R>
where
    R: StudentRepository,
{
    // 数据访问层
    student_repo: R,

    // 行级复核
    row_validator: Box<dyn RowValidator>,
}

impl<R> StudentImporterImpl<R>
where
    R: StudentRepository,
{
    /// 创建新的 StudentImporter 实例
    ///
    /// # 参数
    /// - student_repo: 学生仓储
    /// - row_validator: 行级复核器
    pub fn new(student_repo: R, row_validator: Box<dyn RowValidator>) -> Self {
        Self {
            student_repo,
            row_validator,
        }
    }

    /// 导入单行
    async fn import_one(&self, row_number: usize, record: CandidateStudentRecord) -> RowOutcome {
        let nim = record.known_nim();

        let student = match self.row_validator.validate(&record) {
            Ok(student) => student,
            Err(failure) => {
                warn!(row_number, nim = ?nim, failure = ?failure, "行复核失败");
                return RowOutcome::Failed {
                    row_number,
                    nim,
                    failure,
                };
            }
        };

        match self.student_repo.create_student(&student).await {
            Ok(student_id) => {
                debug!(row_number, nim = %student.nim, student_id, "学生已写入");
                RowOutcome::Imported {
                    row_number,
                    nim: student.nim,
                    student_id,
                }
            }
            Err(RepositoryError::UniqueConstraintViolation(message)) => {
                warn!(row_number, nim = %student.nim, "NIM 已存在");
                RowOutcome::Failed {
                    row_number,
                    nim: Some(student.nim),
                    failure: RowFailure::UniquenessViolation { message },
                }
            }
            Err(e) => {
                error!(row_number, nim = %student.nim, error = %e, "学生写入失败");
                RowOutcome::Failed {
                    row_number,
                    nim: Some(student.nim),
                    failure: RowFailure::Persistence {
                        message: e.to_string(),
                    },
                }
            }
        }
    }
}

#[async_trait]
impl<R> StudentImporter for StudentImporterImpl<R>
where
    R: StudentRepository,
{
    #[instrument(skip(self, rows), fields(batch_id))]
    async fn import_rows(&self, rows: Vec<MappedRow>) -> ImportResult<ImportReport> {
        if rows.is_empty() {
            return Err(ImportError::InvalidRequest(t("import.empty_batch")));
        }

        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(batch_id = %batch_id, total_rows = rows.len(), "开始导入学生数据");

        let mut outcomes = Vec::with_capacity(rows.len());
        for row in rows {
            let outcome = match row {
                MappedRow::Failed(failed) => {
                    warn!(row_number = failed.row_number, failure = ?failed.failure, "映射阶段失败");
                    RowOutcome::from(failed)
                }
                MappedRow::Candidate { row_number, record } => {
                    self.import_one(row_number, record).await
                }
            };
            outcomes.push(outcome);
        }

        let report = ReportAggregator::aggregate(batch_id, outcomes, start_time.elapsed());

        info!(
            batch_id = %report.batch_id,
            imported = report.imported_count,
            failed = report.failed_count,
            elapsed_ms = report.elapsed_ms,
            "学生数据导入完成"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::import::FailedRow;
    use crate::domain::student::{NewStudent, Student};
    use crate::importer::row_validator::RowValidator as RowValidatorImpl;
    use crate::repository::RepositoryResult;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // 内存仓储: 用 HashMap 模拟 nim 唯一约束
    #[derive(Default)]
    struct InMemoryStudentRepo {
        students: Mutex<HashMap<String, i64>>,
        fail_with_lock_error: bool,
    }

    #[async_trait]
    impl StudentRepository for InMemoryStudentRepo {
        async fn create_student(&self, student: &NewStudent) -> RepositoryResult<i64> {
            if self.fail_with_lock_error {
                return Err(RepositoryError::LockError("poisoned".to_string()));
            }
            let mut students = self.students.lock().unwrap();
            if students.contains_key(&student.nim) {
                return Err(RepositoryError::UniqueConstraintViolation(
                    "UNIQUE constraint failed: students.nim".to_string(),
                ));
            }
            let id = students.len() as i64 + 1;
            students.insert(student.nim.clone(), id);
            Ok(id)
        }

        async fn find_by_nim(&self, _nim: &str) -> RepositoryResult<Option<Student>> {
            Ok(None)
        }

        async fn count_students(&self) -> RepositoryResult<i64> {
            Ok(self.students.lock().unwrap().len() as i64)
        }
    }

    fn importer(repo: InMemoryStudentRepo) -> StudentImporterImpl<InMemoryStudentRepo> {
        StudentImporterImpl::new(repo, Box::new(RowValidatorImpl))
    }

    fn candidate(row_number: usize, nim: &str) -> MappedRow {
        MappedRow::Candidate {
            row_number,
            record: CandidateStudentRecord {
                nim: nim.to_string(),
                name: format!("Mahasiswa {}", nim),
                born_date: "2002-08-17".to_string(),
                gender: "Unknown".to_string(),
                city: "Malang".to_string(),
                address: "-".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_all_unique_rows_imported() {
        let importer = importer(InMemoryStudentRepo::default());
        let rows = (1..=5).map(|i| candidate(i, &format!("N{}", i))).collect();

        let report = importer.import_rows(rows).await.unwrap();

        assert_eq!(report.imported_count, 5);
        assert_eq!(report.failed_count, 0);
        assert!(report.error_messages.is_empty());
        assert_eq!(importer.student_repo.count_students().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_within_batch_fails_later_row_only() {
        let importer = importer(InMemoryStudentRepo::default());
        let rows = vec![candidate(1, "A1"), candidate(2, "A1"), candidate(3, "A3")];

        let report = importer.import_rows(rows).await.unwrap();

        assert_eq!(report.imported_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(
            report.outcomes[1],
            RowOutcome::Failed {
                row_number: 2,
                nim: Some("A1".to_string()),
                failure: RowFailure::UniquenessViolation {
                    message: "UNIQUE constraint failed: students.nim".to_string()
                },
            }
        );
        assert!(report.error_messages[0].contains("A1"));
    }

    #[tokio::test]
    async fn test_mapped_failures_and_validation_failures_keep_order() {
        let importer = importer(InMemoryStudentRepo::default());
        let mut bad_date = candidate(3, "C3");
        if let MappedRow::Candidate { record, .. } = &mut bad_date {
            record.born_date = "17/08/2002".to_string();
        }
        let rows = vec![
            candidate(1, "C1"),
            MappedRow::Failed(FailedRow {
                row_number: 2,
                nim: None,
                failure: RowFailure::MissingField {
                    field: "nim".to_string(),
                },
            }),
            bad_date,
            candidate(5, "C5"),
        ];

        let report = importer.import_rows(rows).await.unwrap();

        let rows: Vec<usize> = report.outcomes.iter().map(RowOutcome::row_number).collect();
        assert_eq!(rows, vec![1, 2, 3, 5]);
        assert_eq!(report.imported_count, 2);
        assert_eq!(report.failed_count, 2);
        assert!(report.error_messages[0].contains("nim"));
        assert!(report.error_messages[1].contains("17/08/2002"));
    }

    #[tokio::test]
    async fn test_storage_error_becomes_row_failure() {
        let importer = importer(InMemoryStudentRepo {
            fail_with_lock_error: true,
            ..Default::default()
        });

        let report = importer.import_rows(vec![candidate(1, "A1")]).await.unwrap();

        assert_eq!(report.imported_count, 0);
        assert!(matches!(
            report.outcomes[0],
            RowOutcome::Failed {
                failure: RowFailure::Persistence { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let importer = importer(InMemoryStudentRepo::default());
        let err = importer.import_rows(Vec::new()).await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidRequest(_)));
    }
}
