// ==========================================
// 学生档案管理 - 配置层
// ==========================================
// 职责: 运行期配置读取与覆写
// 存储: config_kv 表; 进程级参数来自环境变量（见 app::state）
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_MAX_BATCH_ROWS};
pub use import_config_trait::ImportConfigReader;
