// ==========================================
// 学生档案管理 - 后台用户
// ==========================================

use serde::{Deserialize, Serialize};

/// 持有访问令牌的后台用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}
