// ==========================================
// 学生档案管理 - 调用方认证
// ==========================================
// 职责: Bearer 令牌 → 当前用户
// 红线: 不含登录/会话逻辑, 令牌由管理工具签发（见 bin/issue_token）
// ==========================================

use crate::domain::user::User;
use crate::repository::{RepositoryResult, UserRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// 从 Authorization 头取出 Bearer 令牌
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// ==========================================
// Authenticator Trait
// ==========================================
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// 解析当前用户
    ///
    /// # 返回
    /// - Ok(Some(User)): 令牌有效
    /// - Ok(None): 未提供令牌或令牌无效
    async fn current_user(&self, bearer_token: Option<&str>) -> RepositoryResult<Option<User>>;
}

// ==========================================
// TokenAuthenticator - 访问令牌认证
// ==========================================
pub struct TokenAuthenticator {
    user_repo: Arc<UserRepository>,
}

impl TokenAuthenticator {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn current_user(&self, bearer_token: Option<&str>) -> RepositoryResult<Option<User>> {
        match bearer_token {
            Some(token) => self.user_repo.find_by_token(token),
            None => Ok(None),
        }
    }
}
