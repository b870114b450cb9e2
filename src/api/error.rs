// ==========================================
// 学生档案管理 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把导入层/仓储层错误转换为面向调用方的错误
// 约束: 面向用户的变体携带已本地化的消息; HTTP 状态映射见 app::http::common
// ==========================================

use crate::i18n::t_with_args;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求级错误
    // ==========================================
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    UnreadableFile(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::DatabaseError(format!("外键约束违反: {}", msg))
            }
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnreadableFile(reason) => ApiError::UnreadableFile(t_with_args(
                "import.unreadable_file",
                &[("reason", &reason)],
            )),
            ImportError::UnsupportedFormat(name) => ApiError::UnreadableFile(t_with_args(
                "import.unsupported_format",
                &[("name", &name)],
            )),
            ImportError::InvalidRequest(msg) => ApiError::InvalidRequest(msg),
            ImportError::Unauthorized => ApiError::Unauthorized(crate::i18n::t("auth.unauthorized")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_conversion() {
        let err: ApiError = ImportError::InvalidRequest("empty".to_string()).into();
        assert!(matches!(err, ApiError::InvalidRequest(msg) if msg == "empty"));

        let err: ApiError = ImportError::UnsupportedFormat("pdf".to_string()).into();
        assert!(matches!(err, ApiError::UnreadableFile(msg) if msg.contains("pdf")));

        let err: ApiError = ImportError::Unauthorized.into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_repository_error_conversion() {
        let err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(err, ApiError::DatabaseConnectionError(_)));

        let err: ApiError = RepositoryError::DatabaseQueryError("no such table".to_string()).into();
        assert!(matches!(err, ApiError::DatabaseError(msg) if msg == "no such table"));

        let err: ApiError =
            RepositoryError::DatabaseConnectionError("/missing/dir".to_string()).into();
        assert!(matches!(err, ApiError::DatabaseConnectionError(_)));
    }
}
