// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、应用状态、认证用户等功能
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::sync::Arc;

use student_records::app::AppState;
use student_records::db::{init_schema, open_sqlite_connection};
use student_records::User;
use tempfile::NamedTempFile;

/// 测试用访问令牌
pub const TEST_TOKEN: &str = "test-token-0123456789";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 创建测试用 AppState
pub fn create_test_state() -> (NamedTempFile, Arc<AppState>) {
    let (temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let state = AppState::new(db_path).expect("创建AppState失败");
    (temp_file, Arc::new(state))
}

/// 创建后台用户并签发 TEST_TOKEN
pub fn seed_user(state: &AppState) -> User {
    let user = state
        .user_repo
        .create_user("Admin", "admin@example.com")
        .expect("创建用户失败");
    state
        .user_repo
        .register_token(user.id, "auth_token", TEST_TOKEN)
        .expect("签发令牌失败");
    user
}

/// 构造 JSON 导入请求体
///
/// 每项为 (nim, name, born_date, city)
pub fn students_body(rows: &[(&str, &str, &str, &str)]) -> Vec<u8> {
    let students: Vec<serde_json::Value> = rows
        .iter()
        .map(|(nim, name, born_date, city)| {
            serde_json::json!({
                "nim": nim,
                "name": name,
                "born_date": born_date,
                "city": city,
            })
        })
        .collect();
    serde_json::to_vec(&serde_json::json!({ "students": students })).unwrap()
}
