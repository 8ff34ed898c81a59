use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Cell – a single raw value read from the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it comes out of a spreadsheet, CSV, JSON or
/// Parquet file, before it is coerced into an [`Employee`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Native date/datetime value (spreadsheet date, Arrow temporal column).
    DateTime(NaiveDateTime),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::DateTime(dt) => write!(f, "{dt}"),
            Cell::Empty => write!(f, "<empty>"),
        }
    }
}

impl Cell {
    /// Interpret the cell as a number (text is parsed after trimming).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Integer(i) => Some(*i as f64),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Render the cell as an opaque label.
    ///
    /// Whole floats drop their fraction so a ZIP stored as `10001.0` reads
    /// `"10001"`. Returns `None` for empty cells.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Cell::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Cell::Integer(i) => Some(i.to_string()),
            Cell::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(format!("{v:.0}")),
            Cell::Float(v) => Some(v.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::DateTime(dt) => Some(dt.to_string()),
            Cell::Empty => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Employee – one row of the source table
// ---------------------------------------------------------------------------

/// One employee row with its derived tenure.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    /// Opaque label, never compared numerically.
    pub zip: String,
    pub salary: f64,
    pub start_date: NaiveDate,
    /// Elapsed years from `start_date` to the observation instant of the load.
    pub tenure_years: f64,
}

/// Fractional years between `start_date` and `now`, counted in whole days.
/// Start dates after `now` yield `0.0`.
pub fn tenure_years(start_date: NaiveDate, now: NaiveDateTime) -> f64 {
    let days = (now.date() - start_date).num_days();
    days.max(0) as f64 / 365.0
}

// ---------------------------------------------------------------------------
// RecordSet – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed employee table with pre-computed indices for the UI.
#[derive(Debug, Clone)]
pub struct RecordSet {
    /// All employees, in source order.
    pub employees: Vec<Employee>,
    /// Sorted distinct job titles.
    pub job_titles: BTreeSet<String>,
    /// Sorted distinct ZIP labels.
    pub zips: BTreeSet<String>,
    /// Earliest and latest start date, if any rows were loaded.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Instant tenure was measured against.
    pub observed_at: NaiveDateTime,
    pub source: PathBuf,
    /// Rows dropped by a lenient load because their start date did not parse.
    pub skipped_rows: usize,
}

impl RecordSet {
    /// Build the column indices from the loaded employees.
    pub fn from_employees(
        employees: Vec<Employee>,
        observed_at: NaiveDateTime,
        source: PathBuf,
        skipped_rows: usize,
    ) -> Self {
        let job_titles = employees.iter().map(|e| e.job_title.clone()).collect();
        let zips = employees.iter().map(|e| e.zip.clone()).collect();
        let date_bounds = employees.iter().fold(None, |acc, e| match acc {
            None => Some((e.start_date, e.start_date)),
            Some((lo, hi)) => Some((lo.min(e.start_date), hi.max(e.start_date))),
        });

        RecordSet {
            employees,
            job_titles,
            zips,
            date_bounds,
            observed_at,
            source,
            skipped_rows,
        }
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Whether the record set is empty.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tenure_counts_whole_days_over_365() {
        let now = date(2021, 1, 1).and_hms_opt(15, 30, 0).unwrap();
        assert_eq!(tenure_years(date(2020, 1, 1), now), 366.0 / 365.0);
        assert_eq!(tenure_years(date(2021, 1, 1), now), 0.0);
    }

    #[test]
    fn tenure_never_negative() {
        let now = date(2021, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(tenure_years(date(2022, 6, 1), now), 0.0);
    }

    #[test]
    fn labels_drop_whole_float_fraction() {
        assert_eq!(Cell::Float(10001.0).as_label().as_deref(), Some("10001"));
        assert_eq!(Cell::Integer(2134).as_label().as_deref(), Some("2134"));
        assert_eq!(Cell::Text(" 02134 ".into()).as_label().as_deref(), Some("02134"));
        assert_eq!(Cell::Text("   ".into()).as_label(), None);
        assert_eq!(Cell::Empty.as_label(), None);
    }

    #[test]
    fn numbers_parse_from_text() {
        assert_eq!(Cell::Text(" 50000 ".into()).as_f64(), Some(50000.0));
        assert_eq!(Cell::Integer(7).as_f64(), Some(7.0));
        assert_eq!(Cell::Text("lots".into()).as_f64(), None);
    }

    #[test]
    fn record_set_indexes_distinct_values() {
        let now = date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        let make = |id: &str, job: &str, zip: &str, start: NaiveDate| Employee {
            id: id.into(),
            first_name: "A".into(),
            last_name: "B".into(),
            job_title: job.into(),
            zip: zip.into(),
            salary: 1.0,
            start_date: start,
            tenure_years: tenure_years(start, now),
        };
        let set = RecordSet::from_employees(
            vec![
                make("1", "Driver", "10001", date(2020, 1, 1)),
                make("2", "Mechanic", "10001", date(2018, 5, 2)),
                make("3", "Driver", "10002", date(2023, 3, 4)),
            ],
            now,
            PathBuf::from("mem"),
            0,
        );

        assert_eq!(set.len(), 3);
        assert_eq!(set.job_titles.len(), 2);
        assert_eq!(set.zips.len(), 2);
        assert_eq!(set.date_bounds, Some((date(2018, 5, 2), date(2023, 3, 4))));
    }
}
