// ==========================================
// 学生档案管理 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供 HTTP 处理器调用
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod import_api;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult};
pub use import_api::{parse_import_request, ImportApi, ImportApiResponse, ImportStudentsRequest};
