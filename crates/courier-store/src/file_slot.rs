//! File-backed slot backend

use crate::StoreError;
use courier_domain::DurableSlot;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// [`DurableSlot`] that keeps each key in `<dir>/<key>.json`
///
/// Writes go to a temporary file in the same directory, are synced, and
/// then renamed over the target. A reader sees either the previous value or
/// the new one, never a torn write.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
    max_bytes: Option<usize>,
}

impl FileSlot {
    /// Create a slot rooted at `dir`
    ///
    /// The directory is created lazily on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            max_bytes: None,
        }
    }

    /// Reject values longer than `max_bytes`
    pub fn with_quota(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Directory holding the slot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl DurableSlot for FileSlot {
    type Error = StoreError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        if let Some(limit) = self.max_bytes {
            if value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    needed: value.len(),
                    limit,
                });
            }
        }

        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "Slot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path());
        assert!(slot.read("courier_records").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut slot = FileSlot::new(dir.path().join("nested"));

        slot.write("courier_records", "[]").unwrap();
        assert_eq!(slot.read("courier_records").unwrap().as_deref(), Some("[]"));

        slot.write("courier_records", "[1]").unwrap();
        assert_eq!(slot.read("courier_records").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let mut slot = FileSlot::new(dir.path());
        slot.write("a", "1").unwrap();
        slot.write("a", "2").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_invalid_keys() {
        let slot = FileSlot::new("/tmp");
        assert!(matches!(slot.path_for(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(slot.path_for("../etc/passwd"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(slot.path_for(".hidden"), Err(StoreError::InvalidKey(_))));
        assert!(slot.path_for("courier_records").is_ok());
    }

    #[test]
    fn test_quota_leaves_previous_value() {
        let dir = TempDir::new().unwrap();
        let mut slot = FileSlot::new(dir.path()).with_quota(3);
        slot.write("k", "ok").unwrap();

        let result = slot.write("k", "too long");
        assert!(matches!(result, Err(StoreError::QuotaExceeded { .. })));
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("ok"));
    }
}
