use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::Employee;
use super::summary::Summary;

// ---------------------------------------------------------------------------
// Filter criteria: one optional predicate per filterable column
// ---------------------------------------------------------------------------

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the ends if they arrive reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// The user's filter selections.
///
/// `None` means "no constraint" for that column. A row is kept when it
/// satisfies every predicate that is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Exact match on the job title text.
    pub job_title: Option<String>,
    /// Exact match on the ZIP label (string comparison, never numeric).
    pub zip: Option<String>,
    /// Inclusive start-date range.
    pub start_date: Option<DateRange>,
}

impl FilterCriteria {
    /// Whether no predicate is present.
    pub fn is_empty(&self) -> bool {
        self.job_title.is_none() && self.zip.is_none() && self.start_date.is_none()
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.job_title
            .as_ref()
            .is_none_or(|title| employee.job_title == *title)
            && self.zip.as_ref().is_none_or(|zip| employee.zip == *zip)
            && self
                .start_date
                .is_none_or(|range| range.contains(employee.start_date))
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Return indices (source order) of employees that pass all active filters.
pub fn filtered_indices(employees: &[Employee], criteria: &FilterCriteria) -> Vec<usize> {
    employees
        .iter()
        .enumerate()
        .filter(|(_, e)| criteria.matches(e))
        .map(|(i, _)| i)
        .collect()
}

/// Owned copy of the employees that pass all active filters.
pub fn filter_records(employees: &[Employee], criteria: &FilterCriteria) -> Vec<Employee> {
    employees
        .iter()
        .filter(|e| criteria.matches(e))
        .cloned()
        .collect()
}

/// Filtered view plus the aggregates computed over it.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Indices into the evaluated slice, in source order.
    pub indices: Vec<usize>,
    pub summary: Summary,
}

impl FilterOutcome {
    /// Iterate the filtered employees of the slice this outcome was computed from.
    pub fn records<'a>(&'a self, employees: &'a [Employee]) -> impl Iterator<Item = &'a Employee> {
        self.indices.iter().map(move |&i| &employees[i])
    }
}

/// Apply `criteria` to `employees` and summarise the result. Never fails;
/// an empty match yields a zero-count summary.
pub fn evaluate(employees: &[Employee], criteria: &FilterCriteria) -> FilterOutcome {
    let indices = filtered_indices(employees, criteria);
    let summary = Summary::from_records(indices.iter().map(|&i| &employees[i]));
    FilterOutcome { indices, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee(id: &str, job: &str, zip: &str, salary: f64, start: NaiveDate) -> Employee {
        Employee {
            id: id.into(),
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            job_title: job.into(),
            zip: zip.into(),
            salary,
            start_date: start,
            tenure_years: 1.0,
        }
    }

    fn fleet() -> Vec<Employee> {
        vec![
            employee("1", "Driver", "10001", 50000.0, date(2020, 1, 1)),
            employee("2", "Driver", "10002", 60000.0, date(2022, 1, 1)),
            employee("3", "Mechanic", "10001", 70000.0, date(2023, 1, 1)),
        ]
    }

    fn all_criteria() -> Vec<FilterCriteria> {
        let mut out = vec![FilterCriteria::default()];
        for job in [None, Some("Driver"), Some("Mechanic"), Some("Pilot")] {
            for zip in [None, Some("10001"), Some("10002")] {
                for range in [
                    None,
                    Some(DateRange::new(date(2020, 1, 1), date(2022, 1, 1))),
                    Some(DateRange::new(date(2024, 1, 1), date(2025, 1, 1))),
                ] {
                    out.push(FilterCriteria {
                        job_title: job.map(String::from),
                        zip: zip.map(String::from),
                        start_date: range,
                    });
                }
            }
        }
        out
    }

    #[test]
    fn job_title_filter_scenario() {
        let records = fleet();
        let criteria = FilterCriteria {
            job_title: Some("Driver".into()),
            ..Default::default()
        };
        let outcome = evaluate(&records, &criteria);

        assert_eq!(outcome.indices, vec![0, 1]);
        assert_eq!(outcome.summary.count, 2);
        assert_eq!(outcome.summary.total_salary, 110000.0);
        assert_eq!(outcome.summary.by_zip.get("10001"), Some(&1));
        assert_eq!(outcome.summary.by_zip.get("10002"), Some(&1));
        assert_eq!(outcome.summary.by_zip.len(), 2);
    }

    #[test]
    fn empty_criteria_keeps_everything() {
        let records = fleet();
        assert!(FilterCriteria::default().is_empty());
        assert_eq!(filter_records(&records, &FilterCriteria::default()), records);
    }

    #[test]
    fn predicates_combine_with_and() {
        let records = fleet();
        let criteria = FilterCriteria {
            job_title: Some("Driver".into()),
            zip: Some("10001".into()),
            start_date: None,
        };
        assert_eq!(filtered_indices(&records, &criteria), vec![0]);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let records = fleet();
        let exact = FilterCriteria {
            start_date: Some(DateRange::new(date(2022, 1, 1), date(2022, 1, 1))),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&records, &exact), vec![1]);

        let span = FilterCriteria {
            start_date: Some(DateRange::new(date(2020, 1, 1), date(2023, 1, 1))),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&records, &span), vec![0, 1, 2]);
    }

    #[test]
    fn reversed_range_is_normalised() {
        let range = DateRange::new(date(2023, 1, 1), date(2020, 1, 1));
        assert_eq!(range.from, date(2020, 1, 1));
        assert!(range.contains(date(2021, 6, 1)));
    }

    #[test]
    fn zip_compares_as_text() {
        let records = vec![employee("1", "Driver", "02134", 1.0, date(2020, 1, 1))];
        let numeric_looking = FilterCriteria {
            zip: Some("2134".into()),
            ..Default::default()
        };
        assert!(filtered_indices(&records, &numeric_looking).is_empty());
    }

    #[test]
    fn filtering_never_grows_and_is_idempotent() {
        let records = fleet();
        for criteria in all_criteria() {
            let once = filter_records(&records, &criteria);
            assert!(once.len() <= records.len());
            assert_eq!(filter_records(&once, &criteria), once, "{criteria:?}");
        }
    }

    #[test]
    fn no_match_gives_zero_summary() {
        let records = fleet();
        let criteria = FilterCriteria {
            job_title: Some("Pilot".into()),
            ..Default::default()
        };
        let outcome = evaluate(&records, &criteria);
        assert!(outcome.indices.is_empty());
        assert_eq!(outcome.summary.count, 0);
        assert_eq!(outcome.summary.total_salary, 0.0);
        assert_eq!(outcome.summary.mean_salary, None);
        assert_eq!(outcome.records(&records).count(), 0);
    }

    #[test]
    fn outcome_records_follow_indices() {
        let records = fleet();
        let criteria = FilterCriteria {
            zip: Some("10001".into()),
            ..Default::default()
        };
        let outcome = evaluate(&records, &criteria);
        let ids: Vec<_> = outcome.records(&records).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn criteria_round_trip_through_json() {
        let criteria = FilterCriteria {
            job_title: Some("Driver".into()),
            zip: None,
            start_date: Some(DateRange::new(date(2020, 1, 1), date(2021, 12, 31))),
        };
        let json = serde_json::to_string(&criteria).unwrap();
        assert!(json.contains("\"2020-01-01\""));
        let back: FilterCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(back, criteria);
    }
}
