// ==========================================
// 学生档案管理 - 应用层
// ==========================================
// 职责: HTTP 集成, 连接前端与后端
// ==========================================

pub mod http;
pub mod state;

// 重导出
pub use http::configure_routes;
pub use state::{get_bind_address, get_default_db_path, AppState};
