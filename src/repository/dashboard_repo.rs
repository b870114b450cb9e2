// ==========================================
// 学生档案管理 - 驾驶舱统计仓储
// ==========================================
// 职责: 学生表聚合查询（总数/性别/城市/出生年份）
// ==========================================

use crate::domain::dashboard::{CityCount, DashboardStats, YearCount};
use crate::domain::student::{GENDER_FEMALE, GENDER_MALE};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct DashboardRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DashboardRepository {
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

    /// 读取驾驶舱统计
    pub fn load_stats(&self) -> RepositoryResult<DashboardStats> {
        let conn = self.get_conn()?;

        let total_students: i64 =
            conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        let male_students = Self::count_by_gender(&conn, GENDER_MALE)?;
        let female_students = Self::count_by_gender(&conn, GENDER_FEMALE)?;

        let mut stmt = conn.prepare(
            "SELECT city, COUNT(*) AS total FROM students GROUP BY city ORDER BY city ASC",
        )?;
        let students_by_city = stmt
            .query_map([], |row| {
                Ok(CityCount {
                    city: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // born_date 以 YYYY-MM-DD 文本存储
        let mut stmt = conn.prepare(
            r#"
            SELECT CAST(strftime('%Y', born_date) AS INTEGER) AS year, COUNT(*) AS total
            FROM students
            GROUP BY year
            ORDER BY year ASC
            "#,
        )?;
        let students_by_year = stmt
            .query_map([], |row| {
                Ok(YearCount {
                    year: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DashboardStats {
            total_students,
            male_students,
            female_students,
            students_by_city,
            students_by_year,
        })
    }

    fn count_by_gender(conn: &Connection, gender: &str) -> RepositoryResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM students WHERE gender = ?1",
            params![gender],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn insert(conn: &Connection, nim: &str, born: &str, gender: &str, city: &str) {
        conn.execute(
            "INSERT INTO students (nim, name, born_date, gender, city, address, created_at, updated_at)
             VALUES (?1, 'x', ?2, ?3, ?4, '-', 't', 't')",
            params![nim, born, gender, city],
        )
        .unwrap();
    }

    #[test]
    fn test_load_stats() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        insert(&conn, "1", "2001-05-01", GENDER_MALE, "Bandung");
        insert(&conn, "2", "2001-09-12", GENDER_FEMALE, "Surabaya");
        insert(&conn, "3", "2003-01-30", GENDER_FEMALE, "Bandung");
        insert(&conn, "4", "2003-03-03", "Unknown", "Bandung");

        let repo = DashboardRepository::from_connection(Arc::new(Mutex::new(conn)));
        let stats = repo.load_stats().unwrap();

        assert_eq!(stats.total_students, 4);
        assert_eq!(stats.male_students, 1);
        assert_eq!(stats.female_students, 2);
        assert_eq!(
            stats.students_by_city,
            vec![
                CityCount { city: "Bandung".to_string(), total: 3 },
                CityCount { city: "Surabaya".to_string(), total: 1 },
            ]
        );
        assert_eq!(
            stats.students_by_year,
            vec![
                YearCount { year: 2001, total: 2 },
                YearCount { year: 2003, total: 2 },
            ]
        );
    }

    #[test]
    fn test_empty_stats() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let repo = DashboardRepository::from_connection(Arc::new(Mutex::new(conn)));

        let stats = repo.load_stats().unwrap();
        assert_eq!(stats.total_students, 0);
        assert!(stats.students_by_city.is_empty());
        assert!(stats.students_by_year.is_empty());
    }
}
