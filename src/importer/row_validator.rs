// ==========================================
// 学生档案管理 - 行级复核
// ==========================================
// 职责: 写库前复核候选记录, 不信任客户端或映射阶段的结果
// 规则:
// - 必填字段去空白后非空
// - 出生日期必须是规范格式 YYYY-MM-DD 且为有效日历日期
// ==========================================

use crate::domain::import::RowFailure;
use crate::domain::student::{CandidateStudentRecord, NewStudent, StudentField};
use crate::importer::student_importer_trait::RowValidator as RowValidatorTrait;
use chrono::NaiveDate;

/// 是否符合 \d{4}-\d{2}-\d{2}
pub fn is_canonical_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// 解析规范格式的出生日期
pub fn parse_canonical_date(value: &str) -> Option<NaiveDate> {
    if !is_canonical_date(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub struct RowValidator;

impl RowValidatorTrait for RowValidator {
    fn validate(&self, record: &CandidateStudentRecord) -> Result<NewStudent, RowFailure> {
        if let Some(field) = StudentField::REQUIRED
            .into_iter()
            .find(|field| record.value(*field).trim().is_empty())
        {
            return Err(RowFailure::missing(field));
        }

        let raw_date = record.born_date.trim();
        let born_date = parse_canonical_date(raw_date).ok_or_else(|| {
            RowFailure::InvalidDateFormat {
                value: raw_date.to_string(),
            }
        })?;

        Ok(NewStudent {
            nim: record.nim.trim().to_string(),
            name: record.name.trim().to_string(),
            born_date,
            gender: record.gender.trim().to_string(),
            city: record.city.trim().to_string(),
            address: record.address.trim().to_string(),
        })
    }
}
