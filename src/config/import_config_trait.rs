// ==========================================
// 学生档案管理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::student::OptionalFieldDefaults;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 单次导入允许的最大行数
    ///
    /// # 默认值
    /// - 5000
    async fn get_max_batch_rows(&self) -> RepositoryResult<usize>;

    /// 可选字段（gender / address）缺省时的默认值
    ///
    /// # 默认值
    /// - gender: "Unknown"
    /// - address: "-"
    async fn get_optional_field_defaults(&self) -> RepositoryResult<OptionalFieldDefaults>;

    /// 面向用户消息的语言
    ///
    /// # 默认值
    /// - "en"
    async fn get_locale(&self) -> RepositoryResult<String>;
}
