use std::collections::BTreeMap;

use super::model::Employee;

/// Aggregates over a filtered set of employees.
///
/// Means are `None` for an empty set; totals and counts are zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean_salary: Option<f64>,
    pub mean_tenure: Option<f64>,
    pub total_salary: f64,
    pub by_job_title: BTreeMap<String, usize>,
    pub by_zip: BTreeMap<String, usize>,
}

impl Summary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Employee>) -> Self {
        let mut count = 0usize;
        let mut total_salary = 0.0;
        let mut total_tenure = 0.0;
        let mut by_job_title = BTreeMap::new();
        let mut by_zip = BTreeMap::new();

        for e in records {
            count += 1;
            total_salary += e.salary;
            total_tenure += e.tenure_years;
            *by_job_title.entry(e.job_title.clone()).or_insert(0) += 1;
            *by_zip.entry(e.zip.clone()).or_insert(0) += 1;
        }

        let mean = |total: f64| (count > 0).then(|| total / count as f64);
        Summary {
            count,
            mean_salary: mean(total_salary),
            mean_tenure: mean(total_tenure),
            total_salary,
            by_job_title,
            by_zip,
        }
    }

    /// Groups ordered by count (descending), ties broken by key.
    pub fn ranked(groups: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = groups.iter().map(|(k, &n)| (k.as_str(), n)).collect();
        // BTreeMap iteration is key-ordered and the sort is stable.
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn employee(job: &str, zip: &str, salary: f64, tenure_years: f64) -> Employee {
        Employee {
            id: format!("{job}-{zip}-{salary}"),
            first_name: String::new(),
            last_name: String::new(),
            job_title: job.into(),
            zip: zip.into(),
            salary,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            tenure_years,
        }
    }

    #[test]
    fn empty_set_has_zero_totals_and_no_means() {
        let summary = Summary::from_records(&Vec::<Employee>::new());
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.mean_tenure, None);
    }

    #[test]
    fn means_and_totals_are_consistent() {
        let records = vec![
            employee("Driver", "10001", 50000.0, 4.0),
            employee("Driver", "10002", 60000.0, 2.0),
            employee("Mechanic", "10001", 70001.5, 1.0),
        ];
        let s = Summary::from_records(&records);

        assert_eq!(s.count, 3);
        assert_eq!(s.total_salary, 180001.5);
        let mean = s.mean_salary.unwrap();
        assert!((mean * s.count as f64 - s.total_salary).abs() < 1e-6);
        assert!((s.mean_tenure.unwrap() - 7.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.by_job_title["Driver"], 2);
        assert_eq!(s.by_job_title["Mechanic"], 1);
        assert_eq!(s.by_zip["10001"], 2);
    }

    #[test]
    fn ranked_orders_by_count_then_key() {
        let groups: BTreeMap<String, usize> = [("b", 1), ("c", 3), ("a", 1), ("d", 2)]
            .into_iter()
            .map(|(k, n)| (k.to_string(), n))
            .collect();
        assert_eq!(
            Summary::ranked(&groups),
            vec![("c", 3), ("d", 2), ("a", 1), ("b", 1)]
        );
    }
}
