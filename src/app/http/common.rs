use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::importer::error::ImportError;
use crate::app::state::AppState;
use crate::auth::parse_bearer;
use crate::domain::user::User;
use crate::i18n::t;

// ==========================================
// 公共工具：错误映射、调用方认证
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,
}

/// ApiError → (HTTP 状态, 错误代码)
pub fn map_api_error(err: &ApiError) -> (StatusCode, &'static str) {
    match err {
        ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ApiError::InvalidRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST"),
        ApiError::UnreadableFile(_) => (StatusCode::BAD_REQUEST, "UNREADABLE_FILE"),
        ApiError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        ApiError::DatabaseConnectionError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_CONNECTION_ERROR")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = map_api_error(&self);

        // 服务端错误只记录明细, 不把数据库消息回传给调用方
        let message = if status.is_server_error() {
            tracing::error!(code, error = %self, "请求处理失败");
            t("error.storage")
        } else {
            tracing::warn!(code, error = %self, "请求被拒绝");
            self.to_string()
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

// ==========================================
// CurrentUser 提取器
// ==========================================
// 作为 FromRequestParts 提取器, 在请求体提取器之前执行,
// 保证未认证请求不会解析请求体。

/// 当前已认证用户
/// 用法: `async fn handler(CurrentUser(user): CurrentUser, ...)`
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_bearer);

        match state.authenticator.current_user(token).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(ImportError::Unauthorized.into()),
        }
    }
}
