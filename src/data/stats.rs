use std::collections::BTreeMap;

use super::model::Employee;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins over `[min, max]` of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` buckets. The maximum lands in the last bin.
    /// Non-finite values are ignored; all-equal input yields one bin and
    /// empty input yields none.
    pub fn from_values(values: impl IntoIterator<Item = f64>, bins: usize) -> Self {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        if values.is_empty() || bins == 0 {
            return Self {
                start: 0.0,
                bin_width: 0.0,
                counts: Vec::new(),
            };
        }
        if max == min {
            return Self {
                start: min,
                bin_width: 0.0,
                counts: vec![values.len()],
            };
        }

        let bin_width = (max - min) / bins as f64;
        let mut counts = vec![0; bins];
        for v in values {
            let idx = (((v - min) / bin_width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Self {
            start: min,
            bin_width,
            counts,
        }
    }

    /// Centre of each bin paired with its count.
    pub fn centers(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &n)| (self.start + (i as f64 + 0.5) * self.bin_width, n))
    }
}

// ---------------------------------------------------------------------------
// Box statistics
// ---------------------------------------------------------------------------

/// Five-number summary for a box plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// Quartiles use linear interpolation between order statistics.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let quantile = |q: f64| {
            let pos = q * (sorted.len() - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        };

        Some(Self {
            min: sorted[0],
            q1: quantile(0.25),
            median: quantile(0.5),
            q3: quantile(0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Salary spread for each job title present in `records`.
pub fn salary_by_job_title<'a>(
    records: impl IntoIterator<Item = &'a Employee>,
) -> BTreeMap<String, BoxStats> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for e in records {
        groups.entry(e.job_title.clone()).or_default().push(e.salary);
    }
    groups
        .into_iter()
        .filter_map(|(title, salaries)| Some((title, BoxStats::from_values(salaries)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn histogram_puts_max_in_last_bin() {
        let h = Histogram::from_values([0.0, 1.0, 2.5, 9.9, 10.0], 5);
        assert_eq!(h.start, 0.0);
        assert_eq!(h.bin_width, 2.0);
        assert_eq!(h.counts, vec![2, 1, 0, 0, 2]);
        assert_eq!(h.counts.iter().sum::<usize>(), 5);
    }

    #[test]
    fn histogram_edge_cases() {
        assert!(Histogram::from_values([], 20).counts.is_empty());
        assert!(Histogram::from_values([1.0], 0).counts.is_empty());
        assert_eq!(Histogram::from_values([3.0, 3.0, 3.0], 20).counts, vec![3]);
        assert_eq!(Histogram::from_values([f64::NAN, 1.0], 4).counts, vec![1]);
    }

    #[test]
    fn histogram_centers() {
        let h = Histogram::from_values([0.0, 4.0], 2);
        let centers: Vec<_> = h.centers().collect();
        assert_eq!(centers, vec![(1.0, 1), (3.0, 1)]);
    }

    #[test]
    fn box_stats_interpolate_quartiles() {
        let b = BoxStats::from_values([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(
            b,
            BoxStats {
                min: 1.0,
                q1: 2.0,
                median: 3.0,
                q3: 4.0,
                max: 5.0
            }
        );

        let even = BoxStats::from_values([1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.q1, 1.75);
        assert!(BoxStats::from_values([]).is_none());
    }

    #[test]
    fn salary_spread_groups_by_title() {
        let make = |job: &str, salary: f64| Employee {
            id: format!("{job}{salary}"),
            first_name: String::new(),
            last_name: String::new(),
            job_title: job.into(),
            zip: "1".into(),
            salary,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            tenure_years: 0.0,
        };
        let records = vec![make("Driver", 10.0), make("Driver", 30.0), make("Clerk", 5.0)];
        let spread = salary_by_job_title(&records);
        assert_eq!(spread.len(), 2);
        assert_eq!(spread["Driver"].median, 20.0);
        assert_eq!(spread["Clerk"].max, 5.0);
    }
}
