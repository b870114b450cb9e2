use std::sync::Arc;

use axum::{extract::State, Json};

use super::common::CurrentUser;
use crate::api::error::ApiError;
use crate::app::state::AppState;
use crate::domain::dashboard::DashboardStats;

// ==========================================
// 驾驶舱相关命令
// ==========================================

/// GET /api/dashboard-stats
pub async fn get_dashboard_stats(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state.dashboard_api.get_stats()?;
    Ok(Json(stats))
}
