// ==========================================
// 学生档案管理 - 学生导入API
// ==========================================
// 职责: 封装学生批量导入（JSON 批次 / 上传表格 / 预览）
// 约束: 调用方认证由 HTTP 层在读取请求体之前完成, 这里只接收已认证用户
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfigReader;
use crate::domain::import::{ImportPreview, ImportReport, MappedRow, ReportShape};
use crate::domain::student::{CandidateStudentRecord, StudentImportItem};
use crate::domain::user::User;
use crate::i18n::{t, t_with_args};
use crate::importer::{
    summary_message, FieldMapper, FieldMapperImpl, StudentImporter, UniversalFileParser,
};

/// JSON 导入请求体: { "students": [...] }
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStudentsRequest {
    pub students: Option<Vec<StudentImportItem>>,
}

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 总体提示
    pub message: String,
    /// 结果形态（全部成功 / 部分成功 / 全部失败）
    pub status: ReportShape,
    /// 成功导入的学生数
    pub imported: usize,
    /// 失败的行数
    pub failed: usize,
    /// 按行号排序的失败说明（全部成功时省略）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// 批次ID
    pub batch_id: String,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u64,
}

impl ImportApiResponse {
    pub fn from_report(report: &ImportReport) -> Self {
        let status = report.shape();
        let errors = match status {
            ReportShape::AllImported => None,
            ReportShape::Partial | ReportShape::NoneImported => {
                Some(report.error_messages.clone())
            }
        };

        Self {
            message: summary_message(report),
            status,
            imported: report.imported_count,
            failed: report.failed_count,
            errors,
            batch_id: report.batch_id.clone(),
            elapsed_ms: report.elapsed_ms,
        }
    }
}

/// 解析 JSON 导入请求
///
/// # 返回
/// - Ok(Vec<StudentImportItem>): 非空且不超过上限的批次
/// - Err(ApiError::InvalidRequest): 请求体不是合法 JSON、students 缺失/为空/超限
pub fn parse_import_request(body: &[u8], max_rows: usize) -> ApiResult<Vec<StudentImportItem>> {
    let request: ImportStudentsRequest = serde_json::from_slice(body).map_err(|e| {
        ApiError::InvalidRequest(t_with_args(
            "import.malformed_body",
            &[("reason", &e.to_string())],
        ))
    })?;

    let items = request.students.unwrap_or_default();
    if items.is_empty() {
        return Err(ApiError::InvalidRequest(t("import.empty_batch")));
    }
    ensure_within_limit(items.len(), max_rows)?;

    Ok(items)
}

fn ensure_within_limit(count: usize, max_rows: usize) -> ApiResult<()> {
    if count > max_rows {
        return Err(ApiError::InvalidRequest(t_with_args(
            "import.batch_too_large",
            &[("count", &count.to_string()), ("max", &max_rows.to_string())],
        )));
    }
    Ok(())
}

/// 导入API
pub struct ImportApi {
    importer: Arc<dyn StudentImporter>,
    config: Arc<dyn ImportConfigReader>,
    file_parser: UniversalFileParser,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    ///
    /// # 参数
    /// - importer: 学生导入器
    /// - config: 导入配置读取器
    pub fn new(importer: Arc<dyn StudentImporter>, config: Arc<dyn ImportConfigReader>) -> Self {
        Self {
            importer,
            config,
            file_parser: UniversalFileParser,
        }
    }

    async fn field_mapper(&self) -> ApiResult<FieldMapperImpl> {
        let defaults = self.config.get_optional_field_defaults().await?;
        Ok(FieldMapperImpl::new(defaults))
    }

    /// 导入 JSON 批次
    ///
    /// # 参数
    /// - user: 已认证用户
    /// - body: 原始请求体 `{ "students": [...] }`
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入结果（可能部分失败）
    /// - Err(ApiError::InvalidRequest): 批次结构无效, 未处理任何行
    #[instrument(skip(self, user, body), fields(user_id = user.id))]
    pub async fn import_students(&self, user: &User, body: &[u8]) -> ApiResult<ImportApiResponse> {
        let max_rows = self.config.get_max_batch_rows().await?;
        let items = parse_import_request(body, max_rows)?;
        let defaults = self.config.get_optional_field_defaults().await?;

        info!(rows = items.len(), "收到学生导入请求");

        // JSON 批次的行号 = 数组下标 + 1
        let rows: Vec<MappedRow> = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| MappedRow::Candidate {
                row_number: idx + 1,
                record: CandidateStudentRecord::from_item(item, &defaults),
            })
            .collect();

        let report = self.importer.import_rows(rows).await?;
        Ok(ImportApiResponse::from_report(&report))
    }

    /// 导入上传的表格文件
    ///
    /// # 参数
    /// - user: 已认证用户
    /// - file_name: 上传文件名（用于判断格式）
    /// - payload: 文件内容
    #[instrument(skip(self, user, payload), fields(user_id = user.id, size = payload.len()))]
    pub async fn import_file(
        &self,
        user: &User,
        file_name: &str,
        payload: &[u8],
    ) -> ApiResult<ImportApiResponse> {
        let max_rows = self.config.get_max_batch_rows().await?;
        let raw_rows = self.file_parser.parse(file_name, payload)?;
        let rows = self.field_mapper().await?.map_rows(raw_rows);

        if rows.is_empty() {
            return Err(ApiError::InvalidRequest(t("import.no_rows")));
        }
        ensure_within_limit(rows.len(), max_rows)?;

        info!(rows = rows.len(), "表格映射完成");

        let report = self.importer.import_rows(rows).await?;
        Ok(ImportApiResponse::from_report(&report))
    }

    /// 预览上传的表格文件（不落库）
    #[instrument(skip(self, user, payload), fields(user_id = user.id, size = payload.len()))]
    pub async fn preview_file(
        &self,
        user: &User,
        file_name: &str,
        payload: &[u8],
    ) -> ApiResult<ImportPreview> {
        let raw_rows = self.file_parser.parse(file_name, payload)?;
        Ok(self.field_mapper().await?.preview(raw_rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_request() {
        let items = parse_import_request(
            br#"{"students": [{"nim": "A1", "name": "Budi"}, {"nim": 7}]}"#,
            10,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].nim.as_deref(), Some("7"));
    }

    #[test]
    fn test_parse_rejects_invalid_batches() {
        for body in [
            &b""[..],
            &b"not json"[..],
            &br#"{}"#[..],
            &br#"{"students": []}"#[..],
            &br#"{"students": "A1"}"#[..],
            &br#"{"students": [1, 2]}"#[..],
        ] {
            let err = parse_import_request(body, 10).unwrap_err();
            assert!(
                matches!(err, ApiError::InvalidRequest(_)),
                "body {:?} gave {:?}",
                String::from_utf8_lossy(body),
                err
            );
        }
    }

    #[test]
    fn test_parse_rejects_oversized_batch() {
        let err = parse_import_request(br#"{"students": [{}, {}, {}]}"#, 2).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(msg) if msg.contains('3')));
    }
}
