use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate};
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use hr_dashboard::data::loader::{
    COL_FIRST_NAME, COL_ID, COL_JOB_TITLE, COL_LAST_NAME, COL_SALARY, COL_START_DATE, COL_ZIP,
    REQUIRED_COLUMNS,
};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

struct Row {
    id: i64,
    first_name: &'static str,
    last_name: &'static str,
    job_title: &'static str,
    zip: i64,
    salary: f64,
    start_date: NaiveDate,
}

const FIRST_NAMES: [&str; 10] = [
    "Maria", "James", "Aisha", "Chen", "Olga", "Diego", "Priya", "Tom", "Fatima", "Lars",
];
const LAST_NAMES: [&str; 10] = [
    "Garcia", "Smith", "Okafor", "Wang", "Ivanova", "Lopez", "Patel", "Brown", "Haddad", "Nilsen",
];
const ZIPS: [i64; 6] = [10001, 10002, 10453, 11201, 11368, 7302];

/// (title, base salary, spread)
const JOBS: [(&str, f64, f64); 5] = [
    ("Bus Driver", 52_000.0, 9_000.0),
    ("Mechanic", 61_000.0, 11_000.0),
    ("Dispatcher", 48_000.0, 7_000.0),
    ("Route Supervisor", 74_000.0, 12_000.0),
    ("Fleet Manager", 98_000.0, 18_000.0),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let first_hire = NaiveDate::from_ymd_opt(2008, 1, 1).context("valid date")?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("valid date")?;

    let rows: Vec<Row> = (0..250)
        .map(|i| {
            // Drivers dominate the roster.
            let job = if rng.next_f64() < 0.6 {
                JOBS[0]
            } else {
                JOBS[1 + rng.below(JOBS.len() - 1)]
            };
            let (job_title, base, spread) = job;
            Row {
                id: 1000 + i,
                first_name: rng.pick(&FIRST_NAMES),
                last_name: rng.pick(&LAST_NAMES),
                job_title,
                zip: ZIPS[rng.below(ZIPS.len())],
                salary: (base + (rng.next_f64() - 0.5) * 2.0 * spread).round(),
                start_date: first_hire + Days::new(rng.below(365 * 16) as u64),
            }
        })
        .collect();

    // CSV
    let csv_path = "BusEmployeesInfo.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV")?;
    writer.write_record(REQUIRED_COLUMNS)?;
    for r in &rows {
        writer.write_record([
            r.id.to_string(),
            r.first_name.to_string(),
            r.last_name.to_string(),
            r.job_title.to_string(),
            r.zip.to_string(),
            r.salary.to_string(),
            r.start_date.to_string(),
        ])?;
    }
    writer.flush()?;

    // Workbook, the default source of the dashboard.
    let xlsx_path = "BusEmployeesInfo.xlsx";
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    for (col, name) in REQUIRED_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, r) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, r.id as f64)?;
        sheet.write_string(row, 1, r.first_name)?;
        sheet.write_string(row, 2, r.last_name)?;
        sheet.write_string(row, 3, r.job_title)?;
        sheet.write_number(row, 4, r.zip as f64)?;
        sheet.write_number(row, 5, r.salary)?;
        let start = ExcelDateTime::from_ymd(
            r.start_date.year() as u16,
            r.start_date.month() as u8,
            r.start_date.day() as u8,
        )?;
        sheet.write_datetime_with_format(row, 6, &start, &date_format)?;
    }
    workbook.save(xlsx_path).context("saving workbook")?;

    // Parquet, with Zip stored as a number the way spreadsheets hand it over.
    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_ID, DataType::Int64, false),
        Field::new(COL_FIRST_NAME, DataType::Utf8, false),
        Field::new(COL_LAST_NAME, DataType::Utf8, false),
        Field::new(COL_JOB_TITLE, DataType::Utf8, false),
        Field::new(COL_ZIP, DataType::Int64, false),
        Field::new(COL_SALARY, DataType::Float64, false),
        Field::new(COL_START_DATE, DataType::Date32, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.first_name))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.last_name))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.job_title))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.zip))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.salary))),
            Arc::new(Date32Array::from_iter_values(
                rows.iter().map(|r| (r.start_date - epoch).num_days() as i32),
            )),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "BusEmployeesInfo.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!(
        "Wrote {} employees to {xlsx_path}, {csv_path} and {parquet_path}",
        rows.len()
    );
    Ok(())
}
