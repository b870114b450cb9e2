// ==========================================
// 学生档案管理 - 学生 Repository Trait
// ==========================================
// 职责: 定义导入器依赖的学生数据访问接口（不包含实现）
// 红线: Repository 不含业务规则, NIM 唯一性只由数据库约束判定
// ==========================================

use crate::domain::student::{NewStudent, Student};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// StudentRepository Trait
// ==========================================
// 实现者: StudentRepositoryImpl（rusqlite）
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// 写入单个学生（独立隐式事务）
    ///
    /// # 返回
    /// - Ok(i64): 新记录 id
    /// - Err(RepositoryError::UniqueConstraintViolation): NIM 已存在, 携带数据库原始消息
    async fn create_student(&self, student: &NewStudent) -> RepositoryResult<i64>;

    /// 按 NIM 查询
    async fn find_by_nim(&self, nim: &str) -> RepositoryResult<Option<Student>>;

    /// 学生总数
    async fn count_students(&self) -> RepositoryResult<i64>;
}
