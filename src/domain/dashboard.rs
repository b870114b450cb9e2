// ==========================================
// 学生档案管理 - 驾驶舱统计视图
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
    pub city: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub total: i64,
}

/// 驾驶舱统计
///
/// male/female 分别按 gender = "Laki-laki" / "Perempuan" 计数,
/// 其他取值（如导入默认值）只计入总数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub male_students: i64,
    pub female_students: i64,
    pub students_by_city: Vec<CityCount>,
    pub students_by_year: Vec<YearCount>,
}
