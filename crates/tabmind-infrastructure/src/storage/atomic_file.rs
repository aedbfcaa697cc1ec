//! Atomic whole-file replacement with an exclusive lock.
//!
//! Writes go to a hidden temp file in the same directory, are synced, then
//! renamed over the target. Read-modify-write cycles hold an `fs2` lock on a
//! sibling `.lock` file for their whole duration.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use tabmind_core::error::{Result, TabMindError};

/// A file that is only ever replaced as a whole.
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, `None` when it is missing or blank.
    pub fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    /// Replaces the file contents atomically.
    pub fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Reads, transforms and writes back under the file lock.
    ///
    /// `f` receives the current contents (`None` if missing) and returns the
    /// new contents. Nothing is written when `f` fails.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(Option<String>) -> Result<String>,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let next = f(self.read()?)?;
        self.write(&next)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| TabMindError::io(format!("{} has no parent directory", self.path.display())))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| TabMindError::io(format!("{} has no file name", self.path.display())))?;
        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock, released when the handle is dropped.
///
/// The lock file is never deleted, so every waiter locks the same inode.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()
            .map_err(|e| TabMindError::io(format!("Failed to lock {}: {}", lock_path.display(), e)))?;

        Ok(Self { _file: file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let dir = TempDir::new().unwrap();
        let file = AtomicFile::new(dir.path().join("nested").join("state.json"));

        file.write("{\"a\": 1}").unwrap();

        assert_eq!(file.read().unwrap().as_deref(), Some("{\"a\": 1}"));
        assert!(!dir.path().join("nested").join(".state.json.tmp").exists());
    }

    #[test]
    fn test_missing_and_blank_read_as_none() {
        let dir = TempDir::new().unwrap();
        let file = AtomicFile::new(dir.path().join("state.json"));
        assert!(file.read().unwrap().is_none());

        fs::write(file.path(), "  \n").unwrap();
        assert!(file.read().unwrap().is_none());
    }

    #[test]
    fn test_update_sees_previous_contents() {
        let dir = TempDir::new().unwrap();
        let file = AtomicFile::new(dir.path().join("counter.txt"));

        for _ in 0..3 {
            file.update(|current| {
                let n: u32 = current.map(|s| s.trim().parse().unwrap()).unwrap_or(0);
                Ok((n + 1).to_string())
            })
            .unwrap();
        }

        assert_eq!(file.read().unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let file = AtomicFile::new(dir.path().join("state.json"));
        file.write("before").unwrap();

        let result = file.update(|_| Err(TabMindError::internal("rejected")));

        assert!(result.is_err());
        assert_eq!(file.read().unwrap().as_deref(), Some("before"));
    }
}
