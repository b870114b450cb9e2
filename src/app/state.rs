// ==========================================
// 学生档案管理 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, ImportApi};
use crate::auth::{Authenticator, TokenAuthenticator};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::{RowValidatorImpl, StudentImporterImpl};
use crate::repository::{DashboardRepository, StudentRepositoryImpl, UserRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "STUDENT_RECORDS_DB_PATH";

/// 监听地址环境变量
pub const BIND_ENV: &str = "STUDENT_RECORDS_BIND";

/// 默认监听地址
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// 应用状态
///
/// 包含所有API实例和共享资源, 作为 axum Router 的共享状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 学生导入API
    pub import_api: Arc<ImportApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 调用方认证
    pub authenticator: Arc<dyn Authenticator>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 用户仓储（令牌签发）
    pub user_repo: Arc<UserRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 所有仓储共享同一个连接; 建表幂等, 可重复启动
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let user_repo = Arc::new(UserRepository::from_connection(conn.clone()));
        let dashboard_repo = Arc::new(DashboardRepository::from_connection(conn.clone()));
        let student_repo = StudentRepositoryImpl::from_connection(conn.clone());

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化导入器与API
        // ==========================================
        let importer = Arc::new(StudentImporterImpl::new(
            student_repo,
            Box::new(RowValidatorImpl),
        ));
        let import_api = Arc::new(ImportApi::new(importer, config_manager.clone()));
        let dashboard_api = Arc::new(DashboardApi::new(dashboard_repo));
        let authenticator: Arc<dyn Authenticator> =
            Arc::new(TokenAuthenticator::new(user_repo.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            import_api,
            dashboard_api,
            authenticator,
            config_manager,
            user_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 STUDENT_RECORDS_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./student_records.db");

    // 尝试获取用户数据目录
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("student-records");
        // 确保目录存在
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("student_records.db");
        }
    }

    path.to_string_lossy().to_string()
}

/// 获取监听地址
pub fn get_bind_address() -> String {
    std::env::var(BIND_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
}
