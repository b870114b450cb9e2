// ==========================================
// 学生档案管理 - 用户与访问令牌仓储
// ==========================================
// 职责: users / access_tokens 表的读写
// 约束: 令牌只以 SHA-256 十六进制摘要落库, 明文不入库
// ==========================================

use crate::domain::user::User;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};

/// 计算令牌摘要
pub fn hash_token(plain_token: &str) -> String {
    format!("{:x}", Sha256::digest(plain_token.as_bytes()))
}

// ==========================================
// UserRepository - 用户仓储
// ==========================================
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建用户
    ///
    /// # 返回
    /// - Ok(User): 新建用户
    /// - Err(UniqueConstraintViolation): email 已存在
    pub fn create_user(&self, name: &str, email: &str) -> RepositoryResult<User> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![name, email, Utc::now().to_rfc3339()],
        )?;
        Ok(User {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// 按 email 查询用户
    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, email FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// 为用户登记访问令牌
    ///
    /// # 参数
    /// - user_id: 用户 id
    /// - token_name: 令牌名称（如 "auth_token"）
    /// - plain_token: 明文令牌, 只保存其摘要
    pub fn register_token(
        &self,
        user_id: i64,
        token_name: &str,
        plain_token: &str,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO access_tokens (user_id, name, token_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![user_id, token_name, hash_token(plain_token), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// 按明文令牌查找所属用户, 命中时刷新 last_used_at
    pub fn find_by_token(&self, plain_token: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let token_hash = hash_token(plain_token);

        let found = conn
            .query_row(
                r#"
                SELECT t.id, u.id, u.name, u.email
                FROM access_tokens t
                JOIN users u ON u.id = t.user_id
                WHERE t.token_hash = ?1
                "#,
                params![token_hash],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        User {
                            id: row.get(1)?,
                            name: row.get(2)?,
                            email: row.get(3)?,
                        },
                    ))
                },
            )
            .optional()?;

        match found {
            Some((token_id, user)) => {
                conn.execute(
                    "UPDATE access_tokens SET last_used_at = ?1 WHERE id = ?2",
                    params![Utc::now().to_rfc3339(), token_id],
                )?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}
