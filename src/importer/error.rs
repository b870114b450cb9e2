// ==========================================
// 学生档案管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: 只表示整批失败; 单行失败是 RowFailure 值, 不走 Err
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件无法读取: {0}")]
    UnreadableFile(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.xlsb/.ods/.csv）")]
    UnsupportedFormat(String),

    // ===== 请求级错误 =====
    #[error("导入请求无效: {0}")]
    InvalidRequest(String),

    #[error("调用方未认证")]
    Unauthorized,
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::UnreadableFile(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::UnreadableFile(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
