//! CSV, Excel and JSON export of page data
//!
//! Exports are written next to the user (working directory or `--output`)
//! as `<name>_<YYYYMMDD_HHMMSS>.csv|xlsx|json`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde::Serialize;
use serde_json::Value;

use crate::error::ExportError;
use crate::output::formatters::{format_date, numeric};

/// Byte order mark so spreadsheet tools detect UTF-8
pub const BOM: char = '\u{FEFF}';

/// Export file kind, selected with `--export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }
}

/// CSV rendering options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub separator: char,
    pub include_header: bool,
    /// Prefix the file with a UTF-8 BOM
    pub bom: bool,
    /// Apply column-aware number and date formatting
    pub format_values: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: ';',
            include_header: true,
            bom: true,
            format_values: true,
        }
    }
}

/// Render an array of objects as CSV.
///
/// Anything other than a non-empty array renders as an empty string.
/// Columns are the union of all object keys in first-seen order; a row
/// missing a column gets an empty cell.
pub fn convert_to_csv(data: &Value, options: &CsvOptions) -> String {
    let rows = match data.as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => return String::new(),
    };

    let columns = columns(rows);
    let sep = options.separator.to_string();
    let mut lines = Vec::with_capacity(rows.len() + 1);

    if options.include_header {
        lines.push(
            columns
                .iter()
                .map(|c| escape(c, options.separator))
                .collect::<Vec<_>>()
                .join(&sep),
        );
    }

    for row in rows {
        let line = columns
            .iter()
            .map(|col| {
                let cell = row
                    .get(*col)
                    .map(|v| render_cell(col, v, options.format_values))
                    .unwrap_or_default();
                escape(&cell, options.separator)
            })
            .collect::<Vec<_>>()
            .join(&sep);
        lines.push(line);
    }

    lines.join("\n")
}

/// Union of all object keys in first-seen order
fn columns(rows: &[Value]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        if let Some(obj) = row.as_object() {
            for key in obj.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
    }
    columns
}

/// Money and percentage columns whose value reads as a number; the backend
/// sends decimals as strings.
fn measure(column: &str, value: &Value) -> Option<f64> {
    if is_money_column(column) || is_percent_column(column) {
        numeric(value).filter(|v| v.is_finite())
    } else {
        None
    }
}

fn render_cell(column: &str, value: &Value, format_values: bool) -> String {
    if format_values {
        if let Some(v) = measure(column, value) {
            return if is_money_column(column) {
                format!("{:.2}", v)
            } else {
                format!("{:.1}%", v)
            };
        }
    }

    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if format_values => match format_date(s) {
            d if d != "N/A" && looks_like_date(s) => d,
            _ => s.clone(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_money_column(column: &str) -> bool {
    column.contains("prix") || column.contains("ca_") || column.contains("stock_valorise")
}

fn is_percent_column(column: &str) -> bool {
    column.contains("percent") || column.contains("marge")
}

// Only full ISO dates are reformatted; periods like "2024-03" stay as-is
fn looks_like_date(s: &str) -> bool {
    let s = s.trim();
    s.len() >= 10 && s.as_bytes().get(4) == Some(&b'-') && s.as_bytes().get(7) == Some(&b'-')
}

fn escape(cell: &str, separator: char) -> String {
    if cell.contains(separator) || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// `<name>_<YYYYMMDD_HHMMSS>.<ext>`
pub fn file_name(name: &str, format: ExportFormat, at: DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        name,
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn is_empty(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn write(path: &Path, content: &str) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::Write(e.to_string()))?;
    }
    fs::write(path, content).map_err(|e| ExportError::Write(e.to_string()))
}

/// Write `data` (an array of objects) as CSV into `dir`
pub fn export_csv(
    data: &Value,
    name: &str,
    dir: &Path,
    options: &CsvOptions,
) -> Result<PathBuf, ExportError> {
    if is_empty(data) {
        return Err(ExportError::Empty);
    }

    let mut content = String::new();
    if options.bom {
        content.push(BOM);
    }
    content.push_str(&convert_to_csv(data, options));

    let path = dir.join(file_name(name, ExportFormat::Csv, Local::now()));
    write(&path, &content)?;
    log::debug!("Exported CSV to {}", path.display());
    Ok(path)
}

/// Write `data` as pretty-printed JSON into `dir`
pub fn export_json<T: Serialize + ?Sized>(
    data: &T,
    name: &str,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let value = serde_json::to_value(data).map_err(|e| ExportError::Serialize(e.to_string()))?;
    if is_empty(&value) {
        return Err(ExportError::Empty);
    }

    let content =
        serde_json::to_string_pretty(&value).map_err(|e| ExportError::Serialize(e.to_string()))?;
    let path = dir.join(file_name(name, ExportFormat::Json, Local::now()));
    write(&path, &content)?;
    log::debug!("Exported JSON to {}", path.display());
    Ok(path)
}

/// One worksheet of an Excel export: a name and an array of objects
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Value,
}

impl Sheet {
    pub fn new<T: Serialize + ?Sized>(name: &str, rows: &T) -> Result<Self, ExportError> {
        let rows =
            serde_json::to_value(rows).map_err(|e| ExportError::Serialize(e.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            rows,
        })
    }

    fn rows(&self) -> &[Value] {
        self.rows.as_array().map_or(&[], Vec::as_slice)
    }
}

// Excel caps sheet names at 31 characters
const SHEET_NAME_MAX: usize = 31;
const MIN_COLUMN_WIDTH: usize = 8;
const MAX_COLUMN_WIDTH: usize = 50;

fn xlsx_error(e: XlsxError) -> ExportError {
    ExportError::Write(e.to_string())
}

fn column_index(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| ExportError::Write(format!("too many columns ({})", index)))
}

fn row_index(index: usize) -> Result<u32, ExportError> {
    u32::try_from(index).map_err(|_| ExportError::Write(format!("too many rows ({})", index)))
}

fn write_sheet(
    worksheet: &mut Worksheet,
    rows: &[Value],
    options: &CsvOptions,
) -> Result<(), ExportError> {
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");
    let percent = Format::new().set_num_format("0.0\"%\"");

    let columns = columns(rows);
    let first_row = usize::from(options.include_header);

    for (c, column) in columns.iter().enumerate() {
        let col = column_index(c)?;
        let mut width = column.chars().count();

        if options.include_header {
            worksheet
                .write_string_with_format(0, col, *column, &header)
                .map_err(xlsx_error)?;
        }

        for (r, row) in rows.iter().enumerate() {
            let Some(value) = row.get(*column) else {
                continue;
            };
            let at = row_index(r + first_row)?;
            width = width.max(render_cell(column, value, options.format_values).chars().count());

            if options.format_values {
                if let Some(v) = measure(column, value) {
                    let format = if is_money_column(column) { &money } else { &percent };
                    worksheet
                        .write_number_with_format(at, col, v, format)
                        .map_err(xlsx_error)?;
                    continue;
                }
            }

            match value {
                Value::Null => {}
                Value::Bool(b) => {
                    worksheet.write_boolean(at, col, *b).map_err(xlsx_error)?;
                }
                Value::Number(n) => match n.as_f64() {
                    Some(v) => {
                        worksheet.write_number(at, col, v).map_err(xlsx_error)?;
                    }
                    None => {
                        worksheet
                            .write_string(at, col, n.to_string())
                            .map_err(xlsx_error)?;
                    }
                },
                other => {
                    let text = render_cell(column, other, options.format_values);
                    worksheet.write_string(at, col, text).map_err(xlsx_error)?;
                }
            }
        }

        let width = (width + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet
            .set_column_width(col, width as f64)
            .map_err(xlsx_error)?;
    }
    Ok(())
}

/// Write one workbook with a worksheet per non-empty sheet into `dir`.
///
/// Cells keep their JSON type (numbers stay numbers). Column widths follow
/// the longest rendered value.
pub fn export_xlsx(
    sheets: &[Sheet],
    name: &str,
    dir: &Path,
    options: &CsvOptions,
) -> Result<PathBuf, ExportError> {
    let sheets: Vec<&Sheet> = sheets.iter().filter(|s| !s.rows().is_empty()).collect();
    if sheets.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    for sheet in sheets {
        let title: String = sheet.name.chars().take(SHEET_NAME_MAX).collect();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(title).map_err(xlsx_error)?;
        write_sheet(worksheet, sheet.rows(), options)?;
    }

    let path = dir.join(file_name(name, ExportFormat::Xlsx, Local::now()));
    fs::create_dir_all(dir).map_err(|e| ExportError::Write(e.to_string()))?;
    workbook.save(&path).map_err(xlsx_error)?;
    log::debug!("Exported workbook to {}", path.display());
    Ok(path)
}

/// Export `rows` in the requested format
pub fn export<T: Serialize + ?Sized>(
    rows: &T,
    name: &str,
    dir: &Path,
    format: ExportFormat,
    options: &CsvOptions,
) -> Result<PathBuf, ExportError> {
    match format {
        ExportFormat::Json => export_json(rows, name, dir),
        ExportFormat::Csv => {
            let value =
                serde_json::to_value(rows).map_err(|e| ExportError::Serialize(e.to_string()))?;
            export_csv(&value, name, dir, options)
        }
        ExportFormat::Xlsx => export_xlsx(&[Sheet::new(name, rows)?], name, dir, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    fn raw() -> CsvOptions {
        CsvOptions {
            bom: false,
            format_values: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_non_array_or_empty_is_empty_string() {
        assert_eq!(convert_to_csv(&json!({"a": 1}), &raw()), "");
        assert_eq!(convert_to_csv(&json!([]), &raw()), "");
        assert_eq!(convert_to_csv(&Value::Null, &raw()), "");
    }

    #[test]
    fn test_columns_are_union_in_first_seen_order() {
        let data = json!([
            {"cod_pro": 1, "refint": "A"},
            {"cod_pro": 2, "qualite": "OE"}
        ]);
        let csv = convert_to_csv(&data, &raw());
        assert_eq!(csv, "cod_pro;refint;qualite\n1;A;\n2;;OE");
    }

    #[test]
    fn test_csv_is_deterministic() {
        let data = json!([{"b": 1, "a": 2}, {"c": 3}]);
        assert_eq!(convert_to_csv(&data, &raw()), convert_to_csv(&data, &raw()));
    }

    #[test]
    fn test_quoting() {
        let data = json!([{"label": "a;b", "note": "say \"hi\""}]);
        let csv = convert_to_csv(&data, &raw());
        assert_eq!(csv, "label;note\n\"a;b\";\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_column_aware_formatting() {
        let data = json!([{
            "prix_achat": 12.5,
            "ca_total": 1000,
            "marge_percent_total": 33.333,
            "quantite": 4,
            "dat_deb": "2024-03-01",
            "periode": "2024-03"
        }]);
        let opts = CsvOptions {
            bom: false,
            ..Default::default()
        };
        let csv = convert_to_csv(&data, &opts);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "12.50;1000.00;33.3%;4;01/03/2024;2024-03");
    }

    #[test]
    fn test_without_header() {
        let opts = CsvOptions {
            include_header: false,
            ..raw()
        };
        assert_eq!(convert_to_csv(&json!([{"a": 1}]), &opts), "1");
    }

    #[test]
    fn test_file_name_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(
            file_name("dashboard", ExportFormat::Csv, at),
            "dashboard_20240506_070809.csv"
        );
    }

    #[test]
    fn test_export_csv_writes_bom() {
        let dir = TempDir::new().unwrap();
        let path = export_csv(
            &json!([{"cod_pro": 1}]),
            "products",
            dir.path(),
            &CsvOptions::default(),
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(BOM));
        assert!(content.contains("cod_pro"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("products_") && name.ends_with(".csv"));
    }

    #[test]
    fn test_export_empty_fails() {
        let dir = TempDir::new().unwrap();
        let err = export_csv(&json!([]), "x", dir.path(), &raw()).unwrap_err();
        assert!(matches!(err, ExportError::Empty));
        let err = export_json(&Vec::<i64>::new(), "x", dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::Empty));
    }

    #[test]
    fn test_decimal_strings_format_as_measures() {
        let data = json!([{"prix_achat": "12.5", "marge_percent": "40", "refint": "12.5"}]);
        let opts = CsvOptions {
            bom: false,
            ..Default::default()
        };
        let csv = convert_to_csv(&data, &opts);
        assert_eq!(csv.lines().nth(1).unwrap(), "12.50;40.0%;12.5");
    }

    fn is_zip(path: &Path) -> bool {
        fs::read(path).unwrap().starts_with(b"PK")
    }

    #[test]
    fn test_export_xlsx_single_sheet() {
        let dir = TempDir::new().unwrap();
        let rows = vec![
            json!({"cod_pro": 1, "prix_achat": 12.5, "refint": "A"}),
            json!({"cod_pro": 2, "qualite": "OE", "actif": true}),
        ];
        let path = export(&rows, "products", dir.path(), ExportFormat::Xlsx, &raw()).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("products_") && name.ends_with(".xlsx"));
        assert!(is_zip(&path));
    }

    #[test]
    fn test_export_xlsx_multi_sheet_skips_empty() {
        let dir = TempDir::new().unwrap();
        let sheets = vec![
            Sheet::new("Details", &json!([{"cod_pro": 1}])).unwrap(),
            Sheet::new("Sales", &json!([])).unwrap(),
            Sheet::new("Stock", &json!([{"cod_pro": 1, "stock": 4}])).unwrap(),
        ];
        let path = export_xlsx(&sheets, "dashboard", dir.path(), &CsvOptions::default()).unwrap();
        assert!(is_zip(&path));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_export_xlsx_without_rows_fails() {
        let dir = TempDir::new().unwrap();
        let sheets = vec![Sheet::new("Sales", &Vec::<Value>::new()).unwrap()];
        let err = export_xlsx(&sheets, "x", dir.path(), &raw()).unwrap_err();
        assert!(matches!(err, ExportError::Empty));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_columns_shared_with_csv() {
        let rows = vec![json!({"b": 1, "a": 2}), json!({"c": 3, "a": 4})];
        assert_eq!(columns(&rows), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_xlsx_extension() {
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
    }

    #[test]
    fn test_export_json_round_trips_rows() {
        let dir = TempDir::new().unwrap();
        let path = export(
            &vec![json!({"cod_pro": 7})],
            "sales",
            dir.path(),
            ExportFormat::Json,
            &raw(),
        )
        .unwrap();
        let value: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value[0]["cod_pro"], 7);
    }
}
