use calamine::{Data, ExcelDateTime, Reader, Xlsx};
use chrono::NaiveTime;
use std::collections::HashMap;
use std::io::Cursor;
use tracing::debug;

use crate::files::UploadedFile;
use crate::utils::{Result, SweeperError};

use super::cell::{Cell, ColumnType};
use super::dataset::Dataset;

/// Tabular upload formats recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularKind {
    Csv,
    Xlsx,
}

impl TabularKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            ".csv" => Some(Self::Csv),
            ".xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// Parse an upload into a dataset, dispatching on its extension
pub fn parse(file: &UploadedFile) -> Result<Dataset> {
    let kind = TabularKind::from_extension(&file.extension)
        .ok_or_else(|| SweeperError::UnsupportedTypeError(file.extension.clone()))?;

    let dataset = match kind {
        TabularKind::Csv => parse_csv(&file.name, &file.bytes)?,
        TabularKind::Xlsx => parse_xlsx(&file.name, &file.bytes)?,
    };

    debug!(
        file = %file.name,
        rows = dataset.height(),
        columns = dataset.width(),
        "dataset parsed"
    );
    Ok(dataset)
}

/// Parse CSV bytes; the first record is the header
pub fn parse_csv(name: &str, bytes: &[u8]) -> Result<Dataset> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record.map_err(|e| SweeperError::parse(name, e))?,
        None => return Err(SweeperError::parse(name, "No columns to parse from file")),
    };
    let headers = unique_headers(header.iter().map(str::to_string).collect());
    let width = headers.len();

    let mut rows = Vec::new();
    for (line, record) in records.enumerate() {
        let record = record.map_err(|e| SweeperError::parse(name, e))?;
        if record.len() > width {
            return Err(SweeperError::parse(
                name,
                format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line + 2,
                    record.len()
                ),
            ));
        }
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    Ok(typed_from_text(headers, rows))
}

/// Parse the first worksheet of an XLSX workbook; the first row is the header
pub fn parse_xlsx(name: &str, bytes: &[u8]) -> Result<Dataset> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| SweeperError::parse(name, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SweeperError::parse(name, "Workbook has no worksheets"))?
        .map_err(|e| SweeperError::parse(name, e))?;

    let mut sheet_rows = range.rows();
    let header = sheet_rows
        .next()
        .ok_or_else(|| SweeperError::parse(name, "No columns to parse from file"))?;
    let headers = unique_headers(header.iter().map(header_text).collect());

    let rows = sheet_rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok(Dataset::new(headers, rows))
}

/// Build a dataset from raw text fields
///
/// Text columns keep each field verbatim so "1.50" is not rewritten as "1.5".
fn typed_from_text(headers: Vec<String>, rows: Vec<Vec<String>>) -> Dataset {
    let width = headers.len();
    let parsed: Vec<Vec<Cell>> = rows
        .iter()
        .map(|row| row.iter().map(|field| Cell::parse(field)).collect())
        .collect();

    let text_columns: Vec<bool> = (0..width)
        .map(|idx| {
            ColumnType::infer(parsed.iter().filter_map(|row| row.get(idx))) == ColumnType::Text
        })
        .collect();

    let cells = rows
        .iter()
        .zip(parsed)
        .map(|(raw_row, parsed_row)| {
            raw_row
                .iter()
                .zip(parsed_row)
                .enumerate()
                .map(|(idx, (raw, cell))| {
                    if text_columns[idx] {
                        Cell::text(raw)
                    } else {
                        cell
                    }
                })
                .collect()
        })
        .collect();

    Dataset::new(headers, cells)
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Cell::Int(*f as i64),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
        Data::DateTime(dt) => {
            Cell::Text(excel_datetime_text(dt).unwrap_or_else(|| data.to_string()))
        }
    }
}

/// Date cells as ISO text (date only at midnight), durations as "D days HH:MM:SS"
fn excel_datetime_text(dt: &ExcelDateTime) -> Option<String> {
    if dt.is_duration() {
        let total = dt.as_duration()?.num_seconds();
        let (days, secs) = (total.div_euclid(86_400), total.rem_euclid(86_400));
        return Some(format!(
            "{} days {:02}:{:02}:{:02}",
            days,
            secs / 3600,
            secs % 3600 / 60,
            secs % 60
        ));
    }

    let value = dt.as_datetime()?;
    if value.time() == NaiveTime::default() {
        Some(value.format("%Y-%m-%d").to_string())
    } else {
        Some(value.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

fn header_text(data: &Data) -> String {
    match spreadsheet_cell(data) {
        Cell::Missing => String::new(),
        cell => cell.to_field(),
    }
}

/// Blank names become "Unnamed: <idx>", repeats get ".1", ".2", ... suffixes
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());

    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name
        };

        let mut count = counts.get(&base).copied().unwrap_or(0);
        let mut candidate = base.clone();
        while headers.contains(&candidate) {
            count += 1;
            candidate = format!("{}.{}", base, count);
        }
        counts.insert(base, count);
        headers.push(candidate);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn upload(name: &str, content: &str) -> UploadedFile {
        UploadedFile::new(name, content.as_bytes().to_vec())
    }

    #[test]
    fn test_parse_csv_types() {
        let ds = parse(&upload(
            "data.csv",
            "id,score,name,active\n1,2.5,alpha,True\n2,,beta,False\n",
        ))
        .unwrap();

        assert_eq!(ds.column_names(), vec!["id", "score", "name", "active"]);
        assert_eq!(ds.column_type(0), Some(ColumnType::Integer));
        assert_eq!(ds.column_type(1), Some(ColumnType::Float));
        assert_eq!(ds.column_type(2), Some(ColumnType::Text));
        assert_eq!(ds.column_type(3), Some(ColumnType::Boolean));
        assert_eq!(ds.rows()[1][1], Cell::Missing);
    }

    #[test]
    fn test_text_columns_keep_raw_fields() {
        let ds = parse(&upload("mixed.csv", "code\n1.50\nA7\nNA\n")).unwrap();
        assert_eq!(ds.column_type(0), Some(ColumnType::Text));
        assert_eq!(
            ds.rows().to_vec(),
            vec![
                vec![Cell::Text("1.50".into())],
                vec![Cell::Text("A7".into())],
                vec![Cell::Missing],
            ]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse(&upload("notes.txt", "hello")).unwrap_err();
        assert!(matches!(err, SweeperError::UnsupportedTypeError(ref ext) if ext == ".txt"));
    }

    #[test]
    fn test_empty_csv_is_parse_error() {
        let err = parse(&upload("empty.csv", "")).unwrap_err();
        assert!(matches!(err, SweeperError::ParseError { ref file, .. } if file == "empty.csv"));
    }

    #[test]
    fn test_short_and_long_records() {
        let ds = parse(&upload("short.csv", "A,B\n1\n")).unwrap();
        assert_eq!(ds.rows()[0], vec![Cell::Int(1), Cell::Missing]);

        let err = parse(&upload("long.csv", "A,B\n1,2,3\n")).unwrap_err();
        assert!(matches!(err, SweeperError::ParseError { .. }));
    }

    #[test]
    fn test_byte_order_mark_and_headers() {
        let ds = parse(&upload("bom.csv", "\u{feff}A,,A,A\n1,2,3,4\n")).unwrap();
        assert_eq!(ds.column_names(), vec!["A", "Unnamed: 1", "A.1", "A.2"]);
    }

    #[test]
    fn test_header_only_csv() {
        let ds = parse(&upload("header.csv", "A,B\n")).unwrap();
        assert_eq!(ds.shape(), (0, 2));
        assert!(ds.numeric_columns().len() == 2);
    }

    #[test]
    fn test_spreadsheet_cells() {
        assert_eq!(spreadsheet_cell(&Data::Float(3.0)), Cell::Int(3));
        assert_eq!(spreadsheet_cell(&Data::Float(3.5)), Cell::Float(3.5));
        assert_eq!(spreadsheet_cell(&Data::Empty), Cell::Missing);
        assert_eq!(
            spreadsheet_cell(&Data::String("12".into())),
            Cell::Text("12".into())
        );
        assert_eq!(spreadsheet_cell(&Data::String("N/A".into())), Cell::Missing);
    }

    #[test]
    fn test_xlsx_dates_are_iso_text() {
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let stamp_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        sheet.write_string(0, 0, "when").unwrap();
        let day = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
        let stamp = ExcelDateTime::from_ymd(2024, 3, 16)
            .unwrap()
            .and_hms(8, 30, 0)
            .unwrap();
        sheet
            .write_datetime_with_format(1, 0, &day, &date_format)
            .unwrap();
        sheet
            .write_datetime_with_format(2, 0, &stamp, &stamp_format)
            .unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let ds = parse(&UploadedFile::new("report.xlsx", bytes)).unwrap();
        assert_eq!(ds.column_type(0), Some(ColumnType::Text));
        assert_eq!(
            ds.rows().to_vec(),
            vec![
                vec![Cell::Text("2024-03-15".into())],
                vec![Cell::Text("2024-03-16 08:30:00".into())],
            ]
        );
    }
}
