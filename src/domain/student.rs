// ==========================================
// 学生档案管理 - 学生实体
// ==========================================
// 职责: 学生主数据、导入字段定义、导入载荷的强/弱类型表示
// 红线: 字段的必填/可选属性只在 StudentField 中声明一次
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 性别取值: 男
pub const GENDER_MALE: &str = "Laki-laki";
/// 性别取值: 女
pub const GENDER_FEMALE: &str = "Perempuan";

/// 可选字段缺省时的默认性别
pub const DEFAULT_GENDER: &str = "Unknown";
/// 可选字段缺省时的默认地址
pub const DEFAULT_ADDRESS: &str = "-";

// ==========================================
// Student - 已入库学生
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub nim: String,
    pub name: String,
    pub born_date: NaiveDate,
    pub gender: String,
    pub city: String,
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

// ==========================================
// NewStudent - 通过校验、待写入的学生
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    pub nim: String,
    pub name: String,
    pub born_date: NaiveDate,
    pub gender: String,
    pub city: String,
    pub address: String,
}

// ==========================================
// StudentField - 导入字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentField {
    Nim,
    Name,
    BornDate,
    Gender,
    City,
    Address,
}

impl StudentField {
    /// 全部字段（声明顺序即表头推荐顺序）
    pub const ALL: [StudentField; 6] = [
        StudentField::Nim,
        StudentField::Name,
        StudentField::BornDate,
        StudentField::Gender,
        StudentField::City,
        StudentField::Address,
    ];

    /// 必填字段，按检查顺序排列
    pub const REQUIRED: [StudentField; 4] = [
        StudentField::Nim,
        StudentField::Name,
        StudentField::BornDate,
        StudentField::City,
    ];

    /// 表格表头中的列名（精确匹配，区分大小写）
    pub fn label(&self) -> &'static str {
        match self {
            StudentField::Nim => "NIM",
            StudentField::Name => "Nama",
            StudentField::BornDate => "Tanggal Lahir (YYYY-MM-DD)",
            StudentField::Gender => "Gender",
            StudentField::City => "Kota",
            StudentField::Address => "Alamat",
        }
    }

    /// JSON 载荷中的字段名
    pub fn key(&self) -> &'static str {
        match self {
            StudentField::Nim => "nim",
            StudentField::Name => "name",
            StudentField::BornDate => "born_date",
            StudentField::Gender => "gender",
            StudentField::City => "city",
            StudentField::Address => "address",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

// ==========================================
// OptionalFieldDefaults - 可选字段默认值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionalFieldDefaults {
    pub gender: String,
    pub address: String,
}

impl Default for OptionalFieldDefaults {
    fn default() -> Self {
        Self {
            gender: DEFAULT_GENDER.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

// ==========================================
// StudentImportItem - JSON 载荷中的单条记录（弱类型）
// ==========================================
// 客户端可能漏字段、传数字 NIM，这里全部接收为 Option<String>,
// 是否合法交给导入器逐行判定。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentImportItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nim: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub born_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
}

/// 数字/布尔值按文本接收, null 视为缺失
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// ==========================================
// CandidateStudentRecord - 映射后的候选记录
// ==========================================
// 必填字段为空字符串表示缺失, 由 RowValidator 判定;
// 可选字段在构造时已填充默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStudentRecord {
    pub nim: String,
    pub name: String,
    pub born_date: String,
    pub gender: String,
    pub city: String,
    pub address: String,
}

impl CandidateStudentRecord {
    /// 从 JSON 载荷构造候选记录
    ///
    /// # 参数
    /// - item: 客户端提交的单条记录
    /// - defaults: 可选字段默认值
    pub fn from_item(item: StudentImportItem, defaults: &OptionalFieldDefaults) -> Self {
        Self {
            nim: trimmed(item.nim).unwrap_or_default(),
            name: trimmed(item.name).unwrap_or_default(),
            born_date: trimmed(item.born_date).unwrap_or_default(),
            gender: trimmed(item.gender).unwrap_or_else(|| defaults.gender.clone()),
            city: trimmed(item.city).unwrap_or_default(),
            address: trimmed(item.address).unwrap_or_else(|| defaults.address.clone()),
        }
    }

    /// 按字段读取值
    pub fn value(&self, field: StudentField) -> &str {
        match field {
            StudentField::Nim => &self.nim,
            StudentField::Name => &self.name,
            StudentField::BornDate => &self.born_date,
            StudentField::Gender => &self.gender,
            StudentField::City => &self.city,
            StudentField::Address => &self.address,
        }
    }

    /// 非空 NIM（用于错误信息定位）
    pub fn known_nim(&self) -> Option<String> {
        let nim = self.nim.trim();
        if nim.is_empty() {
            None
        } else {
            Some(nim.to_string())
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
