use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use super::common::CurrentUser;
use crate::api::error::ApiError;
use crate::api::ImportApiResponse;
use crate::app::state::AppState;
use crate::domain::import::{ImportPreview, ReportShape};
use crate::i18n::t;

// ==========================================
// 学生导入相关命令
// ==========================================

/// multipart 中文件字段名
pub const UPLOAD_FIELD: &str = "file";

/// 导入结果 → HTTP 状态（一行都没导入时为 400）
pub fn import_status(response: &ImportApiResponse) -> StatusCode {
    match response.status {
        ReportShape::AllImported | ReportShape::Partial => StatusCode::OK,
        ReportShape::NoneImported => StatusCode::BAD_REQUEST,
    }
}

/// POST /api/students/import
///
/// 请求体: `{ "students": [ { nim, name, born_date, gender?, city, address? }, ... ] }`
pub async fn import_students(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    body: Bytes,
) -> Result<(StatusCode, Json<ImportApiResponse>), ApiError> {
    let response = state.import_api.import_students(&user, &body).await?;
    Ok((import_status(&response), Json(response)))
}

/// POST /api/students/import/file
///
/// multipart 上传表格（字段名 `file`）, 服务端读取、映射并导入
pub async fn import_students_file(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImportApiResponse>), ApiError> {
    let (file_name, payload) = read_upload(multipart).await?;
    let response = state
        .import_api
        .import_file(&user, &file_name, &payload)
        .await?;
    Ok((import_status(&response), Json(response)))
}

/// POST /api/students/import/preview
///
/// multipart 上传表格, 只做映射并返回候选行与警告
pub async fn preview_students_file(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<Json<ImportPreview>, ApiError> {
    let (file_name, payload) = read_upload(multipart).await?;
    let preview = state
        .import_api
        .preview_file(&user, &file_name, &payload)
        .await?;
    Ok(Json(preview))
}

/// 读取 multipart 中的上传文件
async fn read_upload(mut multipart: Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let payload = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        tracing::debug!(file_name = %file_name, size = payload.len(), "收到上传文件");
        return Ok((file_name, payload));
    }

    Err(ApiError::InvalidRequest(t("import.missing_file")))
}
