use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::DatePolicy;

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "hr-dashboard.json";

/// Dashboard settings. Every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Employee table opened at startup. `generate_sample` writes the
    /// default `BusEmployeesInfo.xlsx` (plus `.csv` and `.parquet`) to the
    /// working directory.
    pub source_path: PathBuf,
    /// How unparseable start dates are handled.
    pub date_policy: DatePolicy,
    /// Bins for the salary and tenure histograms.
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("BusEmployeesInfo.xlsx"),
            date_policy: DatePolicy::Strict,
            histogram_bins: 20,
        }
    }
}

impl DashboardConfig {
    /// Read `path`; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.histogram_bins = config.histogram_bins.max(1);
        Ok(config)
    }

    /// Load [`CONFIG_FILE`], logging and falling back to defaults when it is malformed.
    pub fn load_or_default() -> Self {
        match Self::from_file(Path::new(CONFIG_FILE)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring {CONFIG_FILE}: {e:#}");
                Self::default()
            }
        }
    }
}
