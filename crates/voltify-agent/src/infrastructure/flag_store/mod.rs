//! Persisted boolean flags written by the Voltify application.
//!
//! The application records whether monitoring is switched on by writing a
//! small file: `<dir>/<key>.txt` holding `1` while active.  The agent only
//! reads it, once per handled event, and never caches the value.
//!
//! | file content (first line, trimmed) | flag    |
//! |------------------------------------|---------|
//! | `1` or `true` (any case)           | `true`  |
//! | anything else, including empty     | `false` |
//! | file missing                       | absent  |

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::application::ports::{FlagError, FlagReader};

pub mod memory;

/// Key under which the application stores its "monitoring active" flag.
pub const DEFAULT_FLAG_KEY: &str = "state";

/// [`FlagReader`] storing one flag per file in a directory.
#[derive(Debug, Clone)]
pub struct KeyFileFlagStore {
    dir: PathBuf,
}

impl KeyFileFlagStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl FlagReader for KeyFileFlagStore {
    fn read_flag(&self, key: &str) -> Result<Option<bool>, FlagError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let value = parse_flag(&content);
                trace!("flag {key:?} at {} = {value}", path.display());
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FlagError::Io {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }
}

/// Interprets the first line of a flag file.
fn parse_flag(content: &str) -> bool {
    let first = content.lines().next().unwrap_or("").trim();
    first == "1" || first.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> KeyFileFlagStore {
        let dir = std::env::temp_dir().join(format!("voltify_flags_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        KeyFileFlagStore::new(dir)
    }

    #[test]
    fn test_parse_flag_accepts_one_and_true() {
        assert!(parse_flag("1"));
        assert!(parse_flag("1\n"));
        assert!(parse_flag("  TRUE \n"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag("\n1"));
    }

    #[test]
    fn test_path_for_appends_txt_extension() {
        let store = KeyFileFlagStore::new("/data/voltify");
        assert_eq!(store.path_for("state"), PathBuf::from("/data/voltify/state.txt"));
    }

    #[test]
    fn test_missing_file_reads_as_absent() {
        // Arrange
        let store = temp_store();

        // Act
        let value = store.read_flag(DEFAULT_FLAG_KEY).expect("read");

        // Assert
        assert_eq!(value, None);
        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_written_flag_is_read_fresh_each_time() {
        // Arrange
        let store = temp_store();
        let path = store.path_for(DEFAULT_FLAG_KEY);

        // Act / Assert: no caching between reads
        fs::write(&path, "1").unwrap();
        assert_eq!(store.read_flag(DEFAULT_FLAG_KEY).unwrap(), Some(true));

        fs::write(&path, "0").unwrap();
        assert_eq!(store.read_flag(DEFAULT_FLAG_KEY).unwrap(), Some(false));

        fs::remove_file(&path).unwrap();
        assert_eq!(store.read_flag(DEFAULT_FLAG_KEY).unwrap(), None);

        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_unreadable_entry_is_an_io_error() {
        // A directory where the flag file should be cannot be read as a file.
        let store = temp_store();
        fs::create_dir_all(store.path_for("broken")).unwrap();

        let err = store.read_flag("broken").expect_err("directory must not read as flag");

        assert!(matches!(err, FlagError::Io { ref key, .. } if key == "broken"));
        fs::remove_dir_all(store.dir()).ok();
    }
}
