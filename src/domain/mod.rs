// ==========================================
// 学生档案管理 - 领域模型层
// ==========================================
// 职责: 定义学生实体、导入过程的值类型、统计视图
// 红线: 不含数据访问逻辑, 不含 HTTP 逻辑
// ==========================================

pub mod dashboard;
pub mod import;
pub mod student;
pub mod user;

// 重导出核心类型
pub use dashboard::{CityCount, DashboardStats, YearCount};
pub use import::{
    Cell, FailedRow, HeaderIndex, ImportPreview, ImportReport, MappedRow, RawRow, ReportShape,
    RowFailure, RowOutcome,
};
pub use student::{
    CandidateStudentRecord, NewStudent, OptionalFieldDefaults, Student, StudentField,
    StudentImportItem, GENDER_FEMALE, GENDER_MALE,
};
pub use user::User;
