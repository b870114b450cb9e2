// ==========================================
// 学生档案管理 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.xlsb) / OpenDocument (.ods) / CSV (.csv)
// 输入: 内存中的上传内容, 不落盘
// 输出: 第一张工作表的原始行, 行号 = 工作表中的位置（表头 = 0）
// ==========================================

use crate::domain::import::{Cell, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::student_importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::io::Cursor;
use std::path::Path;

/// 统计换行数（\n、\r\n、单独的 \r 各算一次）
fn count_line_breaks(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .enumerate()
        .filter(|(i, b)| match **b {
            b'\n' => true,
            b'\r' => bytes.get(i + 1) != Some(&b'\n'),
            _ => false,
        })
        .count()
}

/// 跳过记录前的空行, 返回记录内容起点
fn skip_line_breaks(payload: &[u8], from: usize) -> usize {
    payload[from.min(payload.len())..]
        .iter()
        .position(|b| *b != b'\n' && *b != b'\r')
        .map_or(payload.len(), |offset| from + offset)
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 行号 = 记录起点之前的物理换行数 - 之前记录引号内的换行数,
// 因此 csv 跳过的空行照样占一个行号, 引号内换行不占行号
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, payload: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头作为第 0 行返回
            .flexible(true) // 允许行长度不一致
            .from_reader(payload);

        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        let mut quoted_breaks = 0usize;

        loop {
            let read_from = reader.position().byte() as usize;
            if !reader.read_record(&mut record)? {
                break;
            }

            let start = skip_line_breaks(payload, read_from);
            let row_number = count_line_breaks(&payload[..start]).saturating_sub(quoted_breaks);
            quoted_breaks += record
                .iter()
                .map(|value| count_line_breaks(value.as_bytes()))
                .sum::<usize>();

            let first_row = rows.is_empty();
            let cells = record
                .iter()
                .enumerate()
                .map(|(col_idx, value)| {
                    // UTF-8 BOM（Excel 另存为 CSV 时常见）
                    let value = if first_row && col_idx == 0 {
                        value.trim_start_matches('\u{feff}')
                    } else {
                        value
                    };
                    if value.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(value.to_string())
                    }
                })
                .collect();
            rows.push(RawRow::new(row_number, cells));
        }

        if rows.is_empty() {
            return Err(ImportError::UnreadableFile("CSV 文件为空".to_string()));
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 按内容嗅探格式（xlsx/xls/xlsb/ods）, 只读第一张工作表
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_rows(&self, payload: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(payload.to_vec()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::UnreadableFile("工作簿无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        let rows = range_to_raw_rows(&range);

        if rows.is_empty() {
            return Err(ImportError::UnreadableFile(format!(
                "工作表为空: {}",
                sheet_name
            )));
        }

        tracing::debug!(sheet = %sheet_name, rows = rows.len(), "工作表读取完成");
        Ok(rows)
    }
}

/// 工作表区域 → 原始行
///
/// 行号相对区域起点计算: 区域首行即表头（第 0 行）
pub fn range_to_raw_rows(range: &Range<Data>) -> Vec<RawRow> {
    range
        .rows()
        .enumerate()
        .map(|(row_number, row)| RawRow::new(row_number, row.iter().map(cell_from_data).collect()))
        .collect()
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        // as_datetime 已按工作簿的 1900/1904 日期系统换算
        Data::DateTime(dt) if !dt.is_duration() => match dt.as_datetime() {
            Some(datetime) => Cell::Text(datetime.date().format("%Y-%m-%d").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => {
            let date_part = s.split('T').next().unwrap_or(s);
            match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
                Ok(date) => Cell::Text(date.format("%Y-%m-%d").to_string()),
                Err(_) => Cell::Text(s.clone()),
            }
        }
        other => Cell::Text(other.to_string()),
    }
}

// ==========================================
// Universal Parser（按扩展名分派）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 解析上传文件
    ///
    /// # 参数
    /// - file_name: 客户端提供的文件名（只用于判断格式）; 无扩展名时按内容嗅探
    /// - payload: 文件内容
    pub fn parse(&self, file_name: &str, payload: &[u8]) -> ImportResult<Vec<RawRow>> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => CsvParser.parse_to_raw_rows(payload),
            Some("xlsx") | Some("xlsm") | Some("xls") | Some("xlsb") | Some("ods") | None => {
                ExcelParser.parse_to_raw_rows(payload)
            }
            Some(other) => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_csv_keeps_header_and_blank_rows() {
        let payload = "\u{feff}NIM,Nama,Kota\nA1,Budi,Bandung\n,,\nA2,Sari,\n\nA3,Tono,Medan\n";
        let rows = CsvParser.parse_to_raw_rows(payload.as_bytes()).unwrap();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].cells[0], Cell::Text("NIM".to_string()));
        assert_eq!(rows[1].row_number, 1);
        assert!(rows[2].is_blank());
        assert_eq!(rows[3].row_number, 3);
        assert_eq!(rows[3].cells[2], Cell::Empty);
        // 空行被 csv 跳过, 但后续行号不前移
        assert_eq!(rows[4].row_number, 5);
    }

    #[test]
    fn test_csv_quoted_line_break_keeps_row_numbers() {
        let payload = "NIM,Nama,Alamat\nA1,Budi,\"Jl. A\nRT 1\"\nA2,Sari,Jl. B\n";
        let rows = CsvParser.parse_to_raw_rows(payload.as_bytes()).unwrap();

        let numbers: Vec<usize> = rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
        assert_eq!(rows[1].cells[2], Cell::Text("Jl. A\nRT 1".to_string()));
    }

    #[test]
    fn test_csv_crlf_and_blank_lines() {
        let payload = "NIM,Nama\r\nA1,Budi\r\n\r\n\r\nA2,Sari\r\n,\r\nA3,Tono";
        let rows = CsvParser.parse_to_raw_rows(payload.as_bytes()).unwrap();

        let numbers: Vec<usize> = rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![0, 1, 4, 5, 6]);
    }

    #[test]
    fn test_date_cell_respects_1904_system() {
        // 2001-02-03: 1900 系统序列 36925, 1904 系统序列 35463
        let cell_1900 = Data::DateTime(ExcelDateTime::new(36925.0, ExcelDateTimeType::DateTime, false));
        let cell_1904 = Data::DateTime(ExcelDateTime::new(35463.0, ExcelDateTimeType::DateTime, true));

        assert_eq!(cell_from_data(&cell_1900), Cell::Text("2001-02-03".to_string()));
        assert_eq!(cell_from_data(&cell_1904), Cell::Text("2001-02-03".to_string()));

        let duration = Data::DateTime(ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false));
        assert_eq!(cell_from_data(&duration), Cell::Number(1.5));
    }

    #[test]
    fn test_csv_empty_payload_is_unreadable() {
        let err = CsvParser.parse_to_raw_rows(b"").unwrap_err();
        assert!(matches!(err, ImportError::UnreadableFile(_)));
    }

    #[test]
    fn test_corrupt_workbook_is_unreadable() {
        let err = UniversalFileParser
            .parse("students.xlsx", b"definitely not a zip archive")
            .unwrap_err();
        assert!(matches!(err, ImportError::UnreadableFile(_)));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let err = UniversalFileParser.parse("students.pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ext) if ext == "pdf"));
    }

    #[test]
    fn test_xlsx_workbook_rows() {
        let payload = include_bytes!("../../tests/fixtures/students.xlsx");
        let rows = UniversalFileParser.parse("students.xlsx", payload).unwrap();

        let numbers: Vec<usize> = rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(rows[0].cells[0], Cell::Text("NIM".to_string()));
        assert_eq!(rows[1].cells[0].as_text().as_deref(), Some("12345"));
        assert_eq!(rows[1].cells[2], Cell::Text("2001-02-03".to_string()));
        assert!(rows[2].is_blank());
        assert_eq!(rows[3].cells[2], Cell::Text("2002-12-31".to_string()));
        assert_eq!(rows[4].cells[2], Cell::Text("2000/05/06".to_string()));
    }

    #[test]
    fn test_xlsx_1904_workbook_dates() {
        let payload = include_bytes!("../../tests/fixtures/students_1904.xlsx");
        let rows = ExcelParser.parse_to_raw_rows(payload).unwrap();

        assert_eq!(rows[1].cells[2], Cell::Text("2001-02-03".to_string()));
        assert_eq!(rows[3].cells[2], Cell::Text("2002-12-31".to_string()));
        assert_eq!(rows[5].cells[2], Cell::Text("2003-01-01".to_string()));
    }

    #[test]
    fn test_range_to_raw_rows_normalizes_cells() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("NIM".to_string()));
        range.set_value((0, 1), Data::String("Tanggal Lahir (YYYY-MM-DD)".to_string()));
        range.set_value((0, 2), Data::String("Aktif".to_string()));
        range.set_value((1, 0), Data::Float(12345.0));
        range.set_value((1, 1), Data::DateTimeIso("2001-02-03T00:00:00".to_string()));
        range.set_value((1, 2), Data::Bool(true));

        let rows = range_to_raw_rows(&range);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].cells[0].as_text().as_deref(), Some("12345"));
        assert_eq!(rows[1].cells[1], Cell::Text("2001-02-03".to_string()));
        assert_eq!(rows[1].cells[2], Cell::Text("true".to_string()));
        assert!(rows[2].is_blank());
    }
}
