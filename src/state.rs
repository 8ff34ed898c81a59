use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::cache::MemoizedLoader;
use crate::data::filter::{evaluate, DateRange, FilterCriteria, FilterOutcome};
use crate::data::model::RecordSet;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Chart tab shown in the central panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Salary,
    Team,
    Tenure,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub loader: MemoizedLoader,

    /// Loaded record set (None until a load succeeds).
    pub records: Option<Arc<RecordSet>>,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Filtered indices and summary for `criteria` (cached).
    pub outcome: FilterOutcome,

    /// Edit buffer for the date-range pickers; applied only while
    /// `date_filter_enabled` is set.
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub date_filter_enabled: bool,

    /// Colours per job title / ZIP, stable across filter changes.
    pub job_colors: ColorMap,
    pub zip_colors: ColorMap,

    pub tab: Tab,
    pub histogram_bins: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        let today = chrono::Local::now().date_naive();
        let mut state = Self {
            loader: MemoizedLoader::new(&config.source_path, config.date_policy),
            records: None,
            criteria: FilterCriteria::default(),
            outcome: FilterOutcome::default(),
            date_from: today,
            date_to: today,
            date_filter_enabled: false,
            job_colors: ColorMap::default(),
            zip_colors: ColorMap::default(),
            tab: Tab::default(),
            histogram_bins: config.histogram_bins,
            status_message: None,
        };
        state.reload();
        state
    }

    /// Fetch the record set through the memoized loader.
    ///
    /// Filters are kept when the same file is reloaded and reset when a
    /// different file comes in. On failure all dependent data is cleared.
    pub fn reload(&mut self) {
        match self.loader.get() {
            Ok(records) => {
                let same = self
                    .records
                    .as_ref()
                    .is_some_and(|r| Arc::ptr_eq(r, &records));
                if !same {
                    self.set_records(records);
                }
            }
            Err(e) => {
                self.records = None;
                self.outcome = FilterOutcome::default();
                self.status_message = Some(format!("Error: {}", e.detail));
            }
        }
    }

    /// Switch to a different source file.
    pub fn open(&mut self, path: PathBuf) {
        self.loader.set_path(path);
        self.criteria = FilterCriteria::default();
        self.date_filter_enabled = false;
        self.reload();
    }

    /// Ingest a newly loaded record set and recompute the view.
    fn set_records(&mut self, records: Arc<RecordSet>) {
        let source_changed = self
            .records
            .as_ref()
            .is_none_or(|old| old.source != records.source);
        if source_changed {
            self.criteria = FilterCriteria::default();
            self.date_filter_enabled = false;
        }
        if let Some((lo, hi)) = records.date_bounds {
            if !self.date_filter_enabled {
                self.date_from = lo;
                self.date_to = hi;
            }
        }
        self.job_colors = ColorMap::new(&records.job_titles);
        self.zip_colors = ColorMap::new(&records.zips);

        self.status_message = (records.skipped_rows > 0).then(|| {
            format!(
                "{} row(s) skipped: unparseable StartDate",
                records.skipped_rows
            )
        });
        self.records = Some(records);
        self.recompute();
    }

    /// Recompute `outcome` after a filter change, picking up edits made to
    /// the source file since the last interaction.
    pub fn refilter(&mut self) {
        self.reload();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.criteria.start_date = self
            .date_filter_enabled
            .then(|| DateRange::new(self.date_from, self.date_to));
        if let Some(records) = &self.records {
            self.outcome = evaluate(&records.employees, &self.criteria);
        }
    }

    pub fn set_job_title(&mut self, job_title: Option<String>) {
        self.criteria.job_title = job_title;
        self.refilter();
    }

    pub fn set_zip(&mut self, zip: Option<String>) {
        self.criteria.zip = zip;
        self.refilter();
    }

    /// Clear every filter and reset the date pickers to the data's range.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.date_filter_enabled = false;
        if let Some((lo, hi)) = self.records.as_ref().and_then(|r| r.date_bounds) {
            self.date_from = lo;
            self.date_to = hi;
        }
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::data::loader::DatePolicy;

    use super::*;

    fn state_for(body: &str) -> (tempfile::NamedTempFile, AppState) {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        let config = DashboardConfig {
            source_path: file.path().to_path_buf(),
            date_policy: DatePolicy::Strict,
            histogram_bins: 20,
        };
        let state = AppState::new(&config);
        (file, state)
    }

    const BODY: &str = "EMPID,First Name,Last Name,Job Title,Zip,Salary,StartDate\n\
                        1,A,B,Driver,10001,50000,2020-01-01\n\
                        2,C,D,Driver,10002,60000,2022-01-01\n\
                        3,E,F,Mechanic,10001,70000,2023-01-01\n";

    #[test]
    fn startup_loads_and_shows_everything() {
        let (_file, state) = state_for(BODY);
        assert!(state.status_message.is_none());
        assert_eq!(state.outcome.summary.count, 3);
        assert_eq!(state.date_from, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(state.date_to, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn filter_changes_recompute_summary() {
        let (_file, mut state) = state_for(BODY);
        state.set_job_title(Some("Driver".into()));
        assert_eq!(state.outcome.summary.count, 2);
        assert_eq!(state.outcome.summary.total_salary, 110000.0);

        state.date_from = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        state.date_filter_enabled = true;
        state.refilter();
        assert_eq!(state.outcome.indices, vec![1]);

        state.reset_filters();
        assert!(state.criteria.is_empty());
        assert_eq!(state.outcome.summary.count, 3);
    }

    #[test]
    fn reload_of_unchanged_file_keeps_filters() {
        let (_file, mut state) = state_for(BODY);
        state.set_zip(Some("10001".into()));
        state.reload();
        assert_eq!(state.criteria.zip.as_deref(), Some("10001"));
        assert_eq!(state.outcome.summary.count, 2);
    }

    #[test]
    fn filter_change_picks_up_edited_source() {
        let (mut file, mut state) = state_for(BODY);
        state.set_job_title(Some("Driver".into()));
        assert_eq!(state.outcome.summary.count, 2);

        file.write_all(b"4,G,H,Driver,10003,65000,2023-06-01\n").unwrap();
        file.flush().unwrap();
        state.set_zip(None);

        assert!(state.loader.is_fresh());
        assert_eq!(state.records.as_ref().unwrap().len(), 4);
        assert_eq!(state.criteria.job_title.as_deref(), Some("Driver"));
        assert_eq!(state.outcome.summary.count, 3);
        assert_eq!(state.outcome.summary.total_salary, 175000.0);
    }

    #[test]
    fn load_failure_suppresses_data() {
        let (_file, mut state) = state_for(BODY);
        state.open(PathBuf::from("/nonexistent/staff.csv"));
        assert!(state.records.is_none());
        assert_eq!(state.outcome.summary.count, 0);
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }
}
