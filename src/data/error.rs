use std::path::{Path, PathBuf};

use thiserror::Error;

/// The source table could not be turned into a record set.
///
/// Covers a missing or unreadable file, an unsupported format, a missing
/// column and unparseable values. Callers show `detail` and skip rendering.
#[derive(Debug, Error)]
#[error("Data unavailable ({}): {detail}", path.display())]
pub struct DataUnavailable {
    pub path: PathBuf,
    pub detail: String,
}

impl DataUnavailable {
    /// Collapse an `anyhow` context chain into a single diagnostic.
    pub fn from_chain(path: &Path, err: anyhow::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            detail: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn chain_is_flattened_into_detail() {
        let err = Err::<(), _>(anyhow::anyhow!("column 'Zip' missing"))
            .context("reading header")
            .unwrap_err();
        let e = DataUnavailable::from_chain(Path::new("staff.csv"), err);
        assert_eq!(e.detail, "reading header: column 'Zip' missing");
        assert_eq!(
            e.to_string(),
            "Data unavailable (staff.csv): reading header: column 'Zip' missing"
        );
    }
}
