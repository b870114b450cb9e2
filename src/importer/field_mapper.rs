// ==========================================
// 学生档案管理 - 字段映射器实现
// ==========================================
// 职责: 按表头列名取值, 组装候选记录
// 规则:
// - 空白行静默丢弃, 不产生任何结果
// - 必填字段缺列或为空 → 该行失败（按 nim, name, born_date, city 顺序取第一个）
// - 可选字段缺失 → 默认值
// - 出生日期可识别时统一为 YYYY-MM-DD, 否则原样透传交给导入器判定
// ==========================================

use crate::domain::import::{
    FailedRow, HeaderIndex, ImportPreview, MappedRow, RawRow, RowFailure,
};
use crate::domain::student::{CandidateStudentRecord, OptionalFieldDefaults, StudentField};
use crate::i18n::t_with_args;
use crate::importer::row_validator::is_canonical_date;
use crate::importer::student_importer_trait::FieldMapper as FieldMapperTrait;
use chrono::{Datelike, NaiveDate};

/// 可接受的出生日期输入格式（按顺序尝试）
/// 斜杠/短横线写法按日在前解析（DD/MM/YYYY）, 月在前的写法不识别
const ACCEPTED_DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%Y%m%d"];

/// 把常见日期写法统一为 YYYY-MM-DD
///
/// # 返回
/// - Some(String): 规范化后的日期
/// - None: 无法识别
pub fn canonicalize_date(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // 日期单元格在读取阶段已转为 YYYY-MM-DD, 这里只处理文本写法
    ACCEPTED_DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(value, format).ok())
        // %Y 也接受 1~3 位年份, 只认四位年份
        .filter(|date| (1000..=9999).contains(&date.year()))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .find(|canonical| is_canonical_date(canonical))
}

// ==========================================
// FieldMapper 实现
// ==========================================
pub struct FieldMapper {
    defaults: OptionalFieldDefaults,
}

impl FieldMapper {
    pub fn new(defaults: OptionalFieldDefaults) -> Self {
        Self { defaults }
    }

    /// 读取某字段的去空白文本
    fn get_string(&self, index: &HeaderIndex, row: &RawRow, field: StudentField) -> Option<String> {
        index
            .position_of(field)
            .and_then(|position| row.cell(position))
            .and_then(|cell| cell.as_text())
    }

    fn map_row(&self, index: &HeaderIndex, row: &RawRow) -> MappedRow {
        let nim = self.get_string(index, row, StudentField::Nim);

        for field in StudentField::REQUIRED {
            if self.get_string(index, row, field).is_none() {
                return MappedRow::Failed(FailedRow {
                    row_number: row.row_number,
                    nim,
                    failure: RowFailure::missing(field),
                });
            }
        }

        let raw_born_date = self
            .get_string(index, row, StudentField::BornDate)
            .unwrap_or_default();
        let born_date = canonicalize_date(&raw_born_date).unwrap_or(raw_born_date);

        let record = CandidateStudentRecord {
            nim: nim.unwrap_or_default(),
            name: self.get_string(index, row, StudentField::Name).unwrap_or_default(),
            born_date,
            gender: self
                .get_string(index, row, StudentField::Gender)
                .unwrap_or_else(|| self.defaults.gender.clone()),
            city: self.get_string(index, row, StudentField::City).unwrap_or_default(),
            address: self
                .get_string(index, row, StudentField::Address)
                .unwrap_or_else(|| self.defaults.address.clone()),
        };

        MappedRow::Candidate {
            row_number: row.row_number,
            record,
        }
    }
}

/// 拆出表头与数据行（数据行已去掉空白行）
fn split_header(rows: Vec<RawRow>) -> Option<(HeaderIndex, Vec<RawRow>)> {
    let mut iter = rows.into_iter();
    let header = iter.next()?;
    let index = HeaderIndex::build(&header);
    Some((index, iter.filter(|row| !row.is_blank()).collect()))
}

impl FieldMapperTrait for FieldMapper {
    fn map_rows(&self, rows: Vec<RawRow>) -> Vec<MappedRow> {
        let Some((index, data_rows)) = split_header(rows) else {
            return Vec::new();
        };

        let mapped: Vec<MappedRow> = data_rows
            .iter()
            .map(|row| self.map_row(&index, row))
            .collect();

        tracing::debug!(rows = mapped.len(), "字段映射完成");
        mapped
    }

    fn preview(&self, rows: Vec<RawRow>) -> ImportPreview {
        let Some((index, data_rows)) = split_header(rows) else {
            return ImportPreview {
                total_rows: 0,
                rows: Vec::new(),
                missing_columns: Vec::new(),
                warnings: Vec::new(),
            };
        };

        let missing_columns: Vec<String> = StudentField::ALL
            .iter()
            .filter(|field| index.position_of(**field).is_none())
            .map(|field| field.label().to_string())
            .collect();

        let mut warnings: Vec<String> = missing_columns
            .iter()
            .map(|label| t_with_args("import.missing_column", &[("label", label)]))
            .collect();

        let mut mapped = Vec::with_capacity(data_rows.len());
        for row in &data_rows {
            let incomplete = StudentField::ALL
                .iter()
                .any(|field| self.get_string(&index, row, *field).is_none());
            if incomplete {
                warnings.push(t_with_args(
                    "import.incomplete_row",
                    &[("row", &row.row_number.to_string())],
                ));
            }
            mapped.push(self.map_row(&index, row));
        }

        ImportPreview {
            total_rows: mapped.len(),
            rows: mapped,
            missing_columns,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::import::Cell;

    const HEADER: [&str; 6] = [
        "NIM",
        "Nama",
        "Tanggal Lahir (YYYY-MM-DD)",
        "Gender",
        "Kota",
        "Alamat",
    ];

    fn row(row_number: usize, values: &[&str]) -> RawRow {
        RawRow::new(
            row_number,
            values
                .iter()
                .map(|v| {
                    if v.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(v.to_string())
                    }
                })
                .collect(),
        )
    }

    fn mapper() -> FieldMapper {
        FieldMapper::new(OptionalFieldDefaults::default())
    }

    fn candidate(mapped: &MappedRow) -> &CandidateStudentRecord {
        match mapped {
            MappedRow::Candidate { record, .. } => record,
            other => panic!("expected candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_canonicalize_date() {
        assert_eq!(canonicalize_date("2001-02-03").as_deref(), Some("2001-02-03"));
        assert_eq!(canonicalize_date("2001/2/3").as_deref(), Some("2001-02-03"));
        assert_eq!(canonicalize_date("03/02/2001").as_deref(), Some("2001-02-03"));
        assert_eq!(canonicalize_date("03-02-2001").as_deref(), Some("2001-02-03"));
        assert_eq!(canonicalize_date("20010203").as_deref(), Some("2001-02-03"));
        assert_eq!(canonicalize_date("kemarin"), None);
        assert_eq!(canonicalize_date("2001-02-30"), None);
    }

    #[test]
    fn test_canonicalize_date_rejects_partial_values() {
        // 纯数字不再当作序列日期
        assert_eq!(canonicalize_date("2001"), None);
        assert_eq!(canonicalize_date("12"), None);
        assert_eq!(canonicalize_date("43831"), None);
        // 两位年份
        assert_eq!(canonicalize_date("01-02-03"), None);
        assert_eq!(canonicalize_date("3/2/01"), None);
        // 月在前
        assert_eq!(canonicalize_date("5/13/2001"), None);
    }

    #[test]
    fn test_map_full_row() {
        let rows = vec![
            row(0, &HEADER),
            row(1, &["A1", "Budi", "2001/02/03", "Laki-laki", "Bandung", "Jl. Dago 1"]),
        ];

        let mapped = mapper().map_rows(rows);

        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].row_number(), 1);
        let record = candidate(&mapped[0]);
        assert_eq!(record.nim, "A1");
        assert_eq!(record.born_date, "2001-02-03");
        assert_eq!(record.gender, "Laki-laki");
        assert_eq!(record.address, "Jl. Dago 1");
    }

    #[test]
    fn test_columns_resolved_by_label_not_position() {
        let rows = vec![
            row(0, &["Kota", "Extra", "Nama", "NIM", "Tanggal Lahir (YYYY-MM-DD)"]),
            row(1, &["Medan", "x", "Sari", "B7", "2002-12-01"]),
        ];

        let mapped = mapper().map_rows(rows);
        let record = candidate(&mapped[0]);

        assert_eq!(record.nim, "B7");
        assert_eq!(record.city, "Medan");
        assert_eq!(record.gender, "Unknown");
        assert_eq!(record.address, "-");
    }

    #[test]
    fn test_blank_rows_dropped_and_row_numbers_kept() {
        let rows = vec![
            row(0, &HEADER),
            row(1, &["A1", "Budi", "2001-02-03", "", "Bandung", ""]),
            row(2, &["", "", "", "", "", ""]),
            row(3, &["  ", "", "", "", "", ""]),
            row(4, &["A2", "Sari", "2002-03-04", "", "Bogor", ""]),
        ];

        let mapped = mapper().map_rows(rows);

        let numbers: Vec<usize> = mapped.iter().map(MappedRow::row_number).collect();
        assert_eq!(numbers, vec![1, 4]);
    }

    #[test]
    fn test_missing_required_field_fails_row() {
        let rows = vec![
            row(0, &HEADER),
            row(1, &["A1", "", "2001-02-03", "", "", ""]),
            row(2, &["A2", "Sari", "2002-03-04", "", "Bogor", ""]),
        ];

        let mapped = mapper().map_rows(rows);

        assert_eq!(
            mapped[0],
            MappedRow::Failed(FailedRow {
                row_number: 1,
                nim: Some("A1".to_string()),
                failure: RowFailure::MissingField {
                    field: "name".to_string()
                },
            })
        );
        assert!(matches!(mapped[1], MappedRow::Candidate { .. }));
    }

    #[test]
    fn test_missing_required_column_fails_every_row() {
        let rows = vec![
            row(0, &["NIM", "Nama", "Tanggal Lahir (YYYY-MM-DD)"]),
            row(1, &["A1", "Budi", "2001-02-03"]),
        ];

        let mapped = mapper().map_rows(rows);

        match &mapped[0] {
            MappedRow::Failed(failed) => {
                assert_eq!(failed.failure, RowFailure::missing(StudentField::City));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        let rows = vec![
            row(0, &HEADER),
            row(1, &["A1", "Budi", "31 Februari", "", "Bandung", ""]),
        ];

        let mapped = mapper().map_rows(rows);
        assert_eq!(candidate(&mapped[0]).born_date, "31 Februari");
    }

    #[test]
    fn test_numeric_nim_cell() {
        let rows = vec![
            row(0, &HEADER),
            RawRow::new(
                1,
                vec![
                    Cell::Number(220411.0),
                    Cell::Text("Budi".to_string()),
                    Cell::Text("2001-02-03".to_string()),
                    Cell::Empty,
                    Cell::Text("Bandung".to_string()),
                ],
            ),
        ];

        let mapped = mapper().map_rows(rows);
        assert_eq!(candidate(&mapped[0]).nim, "220411");
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(mapper().map_rows(vec![row(0, &HEADER)]).is_empty());
        assert!(mapper().map_rows(Vec::new()).is_empty());
    }

    #[test]
    fn test_preview_warns_on_incomplete_rows() {
        let rows = vec![
            row(0, &["NIM", "Nama", "Tanggal Lahir (YYYY-MM-DD)", "Kota"]),
            row(1, &["A1", "Budi", "2001-02-03", "Bandung"]),
            row(2, &[]),
        ];

        let preview = mapper().preview(rows);

        assert_eq!(preview.total_rows, 1);
        assert_eq!(
            preview.missing_columns,
            vec!["Gender".to_string(), "Alamat".to_string()]
        );
        // 两个缺失列 + 第 1 行不完整
        assert_eq!(preview.warnings.len(), 3);
        assert!(preview.warnings[2].contains('1'));
    }
}
