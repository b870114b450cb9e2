// ==========================================
// 学生档案管理 - 学生 Repository 实现
// ==========================================
// 职责: 实现学生数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::student::{NewStudent, Student};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::student_repo::StudentRepository;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// StudentRepositoryImpl
// ==========================================
pub struct StudentRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

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

    fn map_student(row: &Row) -> rusqlite::Result<Student> {
        Ok(Student {
            id: row.get(0)?,
            nim: row.get(1)?,
            name: row.get(2)?,
            born_date: row.get(3)?,
            gender: row.get(4)?,
            city: row.get(5)?,
            address: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

#[async_trait]
impl StudentRepository for StudentRepositoryImpl {
    async fn create_student(&self, student: &NewStudent) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
            INSERT INTO students (
                nim, name, born_date, gender, city, address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                student.nim,
                student.name,
                student.born_date,
                student.gender,
                student.city,
                student.address,
                now,
                now,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    async fn find_by_nim(&self, nim: &str) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                r#"
                SELECT id, nim, name, born_date, gender, city, address, created_at, updated_at
                FROM students
                WHERE nim = ?1
                "#,
                params![nim],
                Self::map_student,
            )
            .optional()?;
        Ok(student)
    }

    async fn count_students(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count)
    }
}
