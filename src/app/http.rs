// ==========================================
// 学生档案管理 - HTTP 路由（按域拆分）
// ==========================================
// 职责: axum 路由定义, 连接前端与后端 API
// ==========================================

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::state::AppState;

pub mod common;
pub mod dashboard;
pub mod import;

pub use common::{map_api_error, CurrentUser, ErrorResponse};
pub use dashboard::*;
pub use import::*;

/// 上传文件大小上限（字节）
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// 构建应用路由
pub fn configure_routes(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/students/import", post(import_students))
        .route("/api/students/import/file", post(import_students_file))
        .route("/api/students/import/preview", post(preview_students_file))
        .route("/api/dashboard-stats", get(get_dashboard_stats))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
