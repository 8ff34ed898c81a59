use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::Local;

use super::error::DataUnavailable;
use super::loader::{load_file_at, DatePolicy};
use super::model::RecordSet;

/// Modification time and size of the source file at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Load-once cache for the employee table.
///
/// `get` hands out the cached record set until the source file's
/// fingerprint (mtime + size) changes, `invalidate` is called or the path is
/// replaced with `set_path`. Tenure is measured when the file is (re)loaded.
/// A failed load drops the cached set.
#[derive(Debug)]
pub struct MemoizedLoader {
    path: PathBuf,
    policy: DatePolicy,
    cached: Option<(Fingerprint, Arc<RecordSet>)>,
}

impl MemoizedLoader {
    pub fn new(path: impl Into<PathBuf>, policy: DatePolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point the loader at a different file; the next `get` reloads.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.cached = None;
    }

    /// Drop the cached record set; the next `get` reloads.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Whether a record set is cached and still matches the source file.
    pub fn is_fresh(&self) -> bool {
        matches!(&self.cached, Some((fp, _)) if Fingerprint::of(&self.path) == Some(*fp))
    }

    /// Return the cached record set, reloading if the source changed.
    pub fn get(&mut self) -> Result<Arc<RecordSet>, DataUnavailable> {
        let current = Fingerprint::of(&self.path);
        if let Some((fp, records)) = &self.cached {
            if current == Some(*fp) {
                return Ok(Arc::clone(records));
            }
            log::info!("{} changed on disk, reloading", self.path.display());
        }

        self.cached = None;
        let records = Arc::new(load_file_at(
            &self.path,
            Local::now().naive_local(),
            self.policy,
        )?);
        if let Some(fp) = current {
            self.cached = Some((fp, Arc::clone(&records)));
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const BODY: &str = "EMPID,First Name,Last Name,Job Title,Zip,Salary,StartDate\n\
                        1,A,B,Driver,10001,50000,2020-01-01\n";

    fn temp_csv() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(BODY.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn repeated_gets_share_one_load() {
        let file = temp_csv();
        let mut loader = MemoizedLoader::new(file.path(), DatePolicy::Strict);
        assert!(!loader.is_fresh());

        let first = loader.get().unwrap();
        let second = loader.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(loader.is_fresh());
    }

    #[test]
    fn source_change_triggers_reload() {
        let mut file = temp_csv();
        let mut loader = MemoizedLoader::new(file.path(), DatePolicy::Strict);
        let first = loader.get().unwrap();

        file.write_all(b"2,C,D,Mechanic,10002,70000,2023-01-01\n").unwrap();
        file.flush().unwrap();
        assert!(!loader.is_fresh());

        let second = loader.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn invalidate_forces_reload() {
        let file = temp_csv();
        let mut loader = MemoizedLoader::new(file.path(), DatePolicy::Strict);
        let first = loader.get().unwrap();
        loader.invalidate();
        let second = loader.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_load_clears_cache() {
        let file = temp_csv();
        let mut loader = MemoizedLoader::new(file.path(), DatePolicy::Strict);
        loader.get().unwrap();

        loader.set_path("/nonexistent/staff.csv");
        assert!(loader.get().is_err());
        assert!(!loader.is_fresh());
    }
}
