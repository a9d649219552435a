//! Per-week file triple and its integrity check.
//!
//! A week lives in three sibling files named after its Monday:
//!
//! ```text
//! <root>/[<group>/]<YYYY-MM-DD>.todolist
//! <root>/[<group>/]<YYYY-MM-DD>.memo
//! <root>/[<group>/]<YYYY-MM-DD>.checksum
//! ```
//!
//! The checksum file holds the decimal CRC-32 of the memo bytes followed by
//! the task-list bytes. It only exists once a task list has been written.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::calendar::CalendarDate;
use crate::checksum::{crc32, crc32_file};
use crate::config::StoreConfig;
use crate::error::StoreError;

pub const EXT_TODOLIST: &str = "todolist";
pub const EXT_MEMO: &str = "memo";
pub const EXT_CHECKSUM: &str = "checksum";

/// Storage backing one week of a weekly store.
///
/// Reads return `None` for an absent artifact. Absence is never an error.
pub trait WeekFiles {
    /// Human-readable identity used in error messages and logs.
    fn location(&self) -> PathBuf;

    fn read_todolist(&self) -> Result<Option<String>, StoreError>;

    fn read_memo(&self) -> Result<Option<String>, StoreError>;

    fn write_todolist(&mut self, contents: &str) -> Result<(), StoreError>;

    fn write_memo(&mut self, contents: &str) -> Result<(), StoreError>;

    /// Delete the memo. Deleting an absent memo succeeds.
    fn remove_memo(&mut self) -> Result<(), StoreError>;

    /// `true` when there is no task list, or when the stored digest matches
    /// the current memo and task-list bytes.
    ///
    /// # Errors
    ///
    /// [`StoreError::ChecksumUnreadable`] when a task list exists but the
    /// checksum record is missing or not a decimal `u32`.
    fn check_consistency(&self) -> Result<bool, StoreError>;

    /// Recompute and store the digest. Does nothing without a task list.
    fn update_on_changes(&mut self) -> Result<(), StoreError>;
}

/// Digest over a week's contents: memo bytes first, then the task list.
#[must_use]
pub fn week_digest(memo: &[u8], todolist: &[u8]) -> u32 {
    crc32(crc32(0, memo), todolist)
}

/// Parse a stored checksum record.
pub(crate) fn parse_checksum(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

/// The on-disk file triple for one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    todolist: PathBuf,
    memo: PathBuf,
    checksum: PathBuf,
}

impl FileLocation {
    /// Paths for the week starting on `week_start` under `config`.
    ///
    /// `week_start` is expected to be a Monday; it is used verbatim.
    #[must_use]
    pub fn new(config: &StoreConfig, week_start: CalendarDate) -> Self {
        let stem = config.week_dir().join(week_start.to_string());
        Self {
            todolist: stem.with_extension(EXT_TODOLIST),
            memo: stem.with_extension(EXT_MEMO),
            checksum: stem.with_extension(EXT_CHECKSUM),
        }
    }

    #[must_use]
    pub fn todolist_path(&self) -> &Path {
        &self.todolist
    }

    #[must_use]
    pub fn memo_path(&self) -> &Path {
        &self.memo
    }

    #[must_use]
    pub fn checksum_path(&self) -> &Path {
        &self.checksum
    }

    fn digest(&self) -> Result<u32, StoreError> {
        let seed = crc32_file(0, &self.memo)?;
        let digest = crc32_file(seed, &self.todolist)?;
        trace!(path = %self.todolist.display(), digest, "computed week digest");
        Ok(digest)
    }

    fn write(path: &Path, contents: &str) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Read a week file, or `None` when it does not exist.
///
/// The digest covers raw bytes, so content that is not UTF-8 still loads;
/// invalid sequences become U+FFFD.
fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

impl WeekFiles for FileLocation {
    fn location(&self) -> PathBuf {
        self.checksum.clone()
    }

    fn read_todolist(&self) -> Result<Option<String>, StoreError> {
        read_optional(&self.todolist)
    }

    fn read_memo(&self) -> Result<Option<String>, StoreError> {
        read_optional(&self.memo)
    }

    fn write_todolist(&mut self, contents: &str) -> Result<(), StoreError> {
        debug!(path = %self.todolist.display(), bytes = contents.len(), "writing task list");
        Self::write(&self.todolist, contents)
    }

    fn write_memo(&mut self, contents: &str) -> Result<(), StoreError> {
        debug!(path = %self.memo.display(), bytes = contents.len(), "writing memo");
        Self::write(&self.memo, contents)
    }

    fn remove_memo(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.memo) {
            Ok(()) => {
                debug!(path = %self.memo.display(), "removed memo");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn check_consistency(&self) -> Result<bool, StoreError> {
        if !self.todolist.exists() {
            return Ok(true);
        }

        let raw = fs::read_to_string(&self.checksum).map_err(|err| {
            StoreError::ChecksumUnreadable {
                path: self.checksum.clone(),
                reason: err.to_string(),
            }
        })?;
        let stored = parse_checksum(&raw).ok_or_else(|| StoreError::ChecksumUnreadable {
            path: self.checksum.clone(),
            reason: format!("'{}' is not a decimal u32", raw.trim()),
        })?;

        Ok(stored == self.digest()?)
    }

    fn update_on_changes(&mut self) -> Result<(), StoreError> {
        if !self.todolist.exists() {
            return Ok(());
        }
        let digest = self.digest()?;
        debug!(path = %self.checksum.display(), digest, "updating checksum");
        fs::write(&self.checksum, digest.to_string())?;
        Ok(())
    }
}

/// Sorted names of the group subdirectories under `root`.
///
/// A missing root has no groups.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the root exists but cannot be listed.
pub fn list_groups(root: &Path) -> Result<Vec<String>, StoreError> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut groups = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            groups.push(name.to_string());
        }
    }
    groups.sort();
    Ok(groups)
}
