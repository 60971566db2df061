use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use resume_form::{KeyValueStore, StoreError};
use tempfile::NamedTempFile;
use tracing::{debug, trace, warn};

/// Local-storage stand-in: one JSON object on disk.
///
/// Every mutation rewrites the whole file through a temporary sibling that is
/// renamed over the target, so a failed write leaves the old file in place.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl FileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    ///
    /// A file that does not parse is renamed to `<name>.corrupt` and the store
    /// starts empty, so a damaged record never blocks the wizard.
    pub fn open(path: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&raw) {
                    Ok(entries) => entries,
                    Err(err) => {
                        let aside = corrupt_path(&path);
                        warn!(
                            path = %path.display(),
                            moved_to = %aside.display(),
                            %err,
                            "storage file is corrupt; starting empty"
                        );
                        fs::rename(&path, &aside)?;
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "storage opened");
        Ok(Self {
            path,
            entries,
            quota,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn usage(&self) -> usize {
        usage(&self.entries)
    }

    fn commit(&mut self, next: BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let needed = usage(&next);
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        let payload = serde_json::to_string_pretty(&next)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(payload.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        trace!(path = %self.path.display(), bytes = payload.len(), "storage written");
        self.entries = next;
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

fn usage(entries: &BTreeMap<String, String>) -> usize {
    entries
        .iter()
        .map(|(key, value)| key.len() + value.len())
        .sum()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.commit(next)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.commit(next)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.commit(BTreeMap::new())
    }
}
