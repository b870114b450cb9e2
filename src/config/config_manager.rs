// ==========================================
// 学生档案管理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::student::{OptionalFieldDefaults, DEFAULT_ADDRESS, DEFAULT_GENDER};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 单次导入默认最大行数
pub const DEFAULT_MAX_BATCH_ROWS: usize = 5_000;

/// 默认语言
pub const DEFAULT_LOCALE: &str = "en";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let snapshot = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(snapshot)
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_batch_rows(&self) -> RepositoryResult<usize> {
        let default = DEFAULT_MAX_BATCH_ROWS.to_string();
        let value = self.get_config_or_default(config_keys::IMPORT_MAX_BATCH_ROWS, &default)?;
        match value.parse::<usize>() {
            Ok(v) if v > 0 => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = config_keys::IMPORT_MAX_BATCH_ROWS,
                    raw_value = %value,
                    "最大导入行数配置无效，使用默认值"
                );
                Ok(DEFAULT_MAX_BATCH_ROWS)
            }
        }
    }

    async fn get_optional_field_defaults(&self) -> RepositoryResult<OptionalFieldDefaults> {
        Ok(OptionalFieldDefaults {
            gender: self.get_config_or_default(config_keys::IMPORT_DEFAULT_GENDER, DEFAULT_GENDER)?,
            address: self
                .get_config_or_default(config_keys::IMPORT_DEFAULT_ADDRESS, DEFAULT_ADDRESS)?,
        })
    }

    async fn get_locale(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::APP_LOCALE, DEFAULT_LOCALE)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const IMPORT_MAX_BATCH_ROWS: &str = "import.max_batch_rows";
    pub const IMPORT_DEFAULT_GENDER: &str = "import.default_gender";
    pub const IMPORT_DEFAULT_ADDRESS: &str = "import.default_address";

    // 应用
    pub const APP_LOCALE: &str = "app.locale";
}
