use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Local, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::DataUnavailable;
use super::model::{tenure_years, Cell, Employee, RecordSet};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

pub const COL_ID: &str = "EMPID";
pub const COL_FIRST_NAME: &str = "First Name";
pub const COL_LAST_NAME: &str = "Last Name";
pub const COL_JOB_TITLE: &str = "Job Title";
pub const COL_ZIP: &str = "Zip";
pub const COL_SALARY: &str = "Salary";
pub const COL_START_DATE: &str = "StartDate";

/// Columns every source table must carry. Names are case-sensitive.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_ID,
    COL_FIRST_NAME,
    COL_LAST_NAME,
    COL_JOB_TITLE,
    COL_ZIP,
    COL_SALARY,
    COL_START_DATE,
];

/// What to do with a row whose start date cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Fail the whole load.
    #[default]
    Strict,
    /// Skip the row, log it and count it in [`RecordSet::skipped_rows`].
    Lenient,
}

/// Header row plus cell rows, independent of the file format.
#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the employee table at `path`, measuring tenure against the current
/// local time and rejecting unparseable dates.
pub fn load_file(path: &Path) -> Result<RecordSet, DataUnavailable> {
    load_file_at(path, Local::now().naive_local(), DatePolicy::Strict)
}

/// Load the employee table at `path`.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet, header in row 1
/// * `.csv`     – header row with the required column names
/// * `.json`    – `[{ "EMPID": 1, "First Name": "...", ... }, ...]`
/// * `.parquet` – flat columns, `StartDate` as Date32/Date64/Timestamp or text
pub fn load_file_at(
    path: &Path,
    now: NaiveDateTime,
    policy: DatePolicy,
) -> Result<RecordSet, DataUnavailable> {
    let result = if path.is_file() {
        read_table(path).and_then(|table| build_record_set(table, path, now, policy))
    } else {
        Err(anyhow!("file not found"))
    };

    result.map_err(|e| {
        let err = DataUnavailable::from_chain(path, e);
        log::error!("{err}");
        err
    })
}

fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Row → Employee
// ---------------------------------------------------------------------------

/// Positions of the required columns within a header row.
struct ColumnIndex {
    id: usize,
    first_name: usize,
    last_name: usize,
    job_title: usize,
    zip: usize,
    salary: usize,
    start_date: usize,
}

impl ColumnIndex {
    fn locate(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("missing '{name}' column"))
        };
        Ok(Self {
            id: find(COL_ID)?,
            first_name: find(COL_FIRST_NAME)?,
            last_name: find(COL_LAST_NAME)?,
            job_title: find(COL_JOB_TITLE)?,
            zip: find(COL_ZIP)?,
            salary: find(COL_SALARY)?,
            start_date: find(COL_START_DATE)?,
        })
    }
}

fn build_record_set(
    table: RawTable,
    path: &Path,
    now: NaiveDateTime,
    policy: DatePolicy,
) -> Result<RecordSet> {
    let cols = ColumnIndex::locate(&table.headers)?;
    let mut employees = Vec::with_capacity(table.rows.len());
    let mut seen_ids = HashSet::new();
    let mut skipped = 0;

    for (i, row) in table.rows.iter().enumerate() {
        // Row 1 is the header.
        let row_no = i + 2;
        if row.iter().all(|c| *c == Cell::Empty) {
            continue;
        }
        let cell = |idx: usize| row.get(idx).unwrap_or(&Cell::Empty);

        let id = cell(cols.id)
            .as_label()
            .with_context(|| format!("row {row_no}: empty {COL_ID}"))?;
        let job_title = cell(cols.job_title)
            .as_label()
            .with_context(|| format!("row {row_no}: empty '{COL_JOB_TITLE}'"))?;
        let zip = cell(cols.zip)
            .as_label()
            .with_context(|| format!("row {row_no}: empty {COL_ZIP}"))?;

        let raw_salary = cell(cols.salary);
        let salary = raw_salary
            .as_f64()
            .filter(|v| v.is_finite())
            .with_context(|| format!("row {row_no}: {COL_SALARY} '{raw_salary}' is not a number"))?;
        if salary < 0.0 {
            bail!("row {row_no}: negative {COL_SALARY} {salary}");
        }

        let raw_date = cell(cols.start_date);
        let Some(start_date) = parse_start_date(raw_date) else {
            match policy {
                DatePolicy::Strict => {
                    bail!("row {row_no}: {COL_START_DATE} '{raw_date}' is not a date")
                }
                DatePolicy::Lenient => {
                    log::warn!("Skipping row {row_no} ({id}): {COL_START_DATE} '{raw_date}' is not a date");
                    skipped += 1;
                    continue;
                }
            }
        };

        if !seen_ids.insert(id.clone()) {
            bail!("row {row_no}: duplicate {COL_ID} '{id}'");
        }
        if start_date > now.date() {
            log::warn!("Row {row_no} ({id}): {COL_START_DATE} {start_date} is in the future, tenure set to 0");
        }

        employees.push(Employee {
            first_name: cell(cols.first_name).as_label().unwrap_or_default(),
            last_name: cell(cols.last_name).as_label().unwrap_or_default(),
            tenure_years: tenure_years(start_date, now),
            id,
            job_title,
            zip,
            salary,
            start_date,
        });
    }

    log::info!(
        "Loaded {} employees from {} ({skipped} skipped)",
        employees.len(),
        path.display()
    );
    Ok(RecordSet::from_employees(
        employees,
        now,
        path.to_path_buf(),
        skipped,
    ))
}

fn parse_start_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Text(s) => parse_date_str(s),
        _ => None,
    }
}

/// Parse a date or datetime string; the time of day is discarded.
pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

// ---------------------------------------------------------------------------
// Spreadsheet reader
// ---------------------------------------------------------------------------

/// Reads the first worksheet; row 1 holds the column names.
fn read_workbook(path: &Path) -> Result<RawTable> {
    use calamine::DataType as _;

    let mut workbook = open_workbook_auto(path).map_err(|e| anyhow!("opening workbook: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .map_err(|e| anyhow!("reading first worksheet: {e}"))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .context("worksheet is empty")?
        .iter()
        .map(|c| c.as_string().unwrap_or_else(|| c.to_string()))
        .collect();
    let rows = rows
        .map(|r| r.iter().map(workbook_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn workbook_cell(data: &Data) -> Cell {
    use calamine::DataType as _;

    match data {
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(_) => data
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(data.to_string())),
        Data::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Every CSV field is kept as text so labels such as `02134` survive;
/// numbers and dates are parsed when the row is built.
fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 2))?;
        rows.push(
            record
                .iter()
                .map(|v| {
                    if v.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(v.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records', date_format='iso')`):
///
/// ```json
/// [
///   { "EMPID": 1, "First Name": "Ada", "Last Name": "Byron", "Job Title": "Driver",
///     "Zip": 10001, "Salary": 52000, "StartDate": "2020-01-01" },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Record {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table. Works with files written by **Pandas**
/// (`df.to_parquet()`), **Polars** and the bundled `generate_sample` binary.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Empty;
    }
    let datetime = |dt: Option<NaiveDateTime>| dt.map(Cell::DateTime).unwrap_or(Cell::Empty);

    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Cell::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Cell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Cell::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Bool(col.as_boolean().value(row)),
        DataType::Date32 => datetime(col.as_primitive::<Date32Type>().value_as_datetime(row)),
        DataType::Date64 => datetime(col.as_primitive::<Date64Type>().value_as_datetime(row)),
        DataType::Timestamp(unit, _) => datetime(match unit {
            TimeUnit::Second => col.as_primitive::<TimestampSecondType>().value_as_datetime(row),
            TimeUnit::Millisecond => col
                .as_primitive::<TimestampMillisecondType>()
                .value_as_datetime(row),
            TimeUnit::Microsecond => col
                .as_primitive::<TimestampMicrosecondType>()
                .value_as_datetime(row),
            TimeUnit::Nanosecond => col
                .as_primitive::<TimestampNanosecondType>()
                .value_as_datetime(row),
        }),
        _ => arrow::util::display::array_value_to_string(col, row)
            .map(Cell::Text)
            .unwrap_or(Cell::Empty),
    }
}
