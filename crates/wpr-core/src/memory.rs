use std::path::PathBuf;

use crate::error::StoreError;
use crate::location::{WeekFiles, parse_checksum, week_digest};

/// In-memory [`WeekFiles`] for exercising a weekly store without a
/// filesystem. Follows the same absence and checksum rules as the on-disk
/// layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFiles {
    pub todolist: Option<String>,
    pub memo: Option<String>,
    pub checksum: Option<String>,
}

impl MemoryFiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn digest(&self) -> u32 {
        week_digest(
            self.memo.as_deref().unwrap_or_default().as_bytes(),
            self.todolist.as_deref().unwrap_or_default().as_bytes(),
        )
    }
}

impl WeekFiles for MemoryFiles {
    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }

    fn read_todolist(&self) -> Result<Option<String>, StoreError> {
        Ok(self.todolist.clone())
    }

    fn read_memo(&self) -> Result<Option<String>, StoreError> {
        Ok(self.memo.clone())
    }

    fn write_todolist(&mut self, contents: &str) -> Result<(), StoreError> {
        self.todolist = Some(contents.to_string());
        Ok(())
    }

    fn write_memo(&mut self, contents: &str) -> Result<(), StoreError> {
        self.memo = Some(contents.to_string());
        Ok(())
    }

    fn remove_memo(&mut self) -> Result<(), StoreError> {
        self.memo = None;
        Ok(())
    }

    fn check_consistency(&self) -> Result<bool, StoreError> {
        if self.todolist.is_none() {
            return Ok(true);
        }
        let unreadable = |reason: String| StoreError::ChecksumUnreadable {
            path: self.location(),
            reason,
        };
        let raw = self
            .checksum
            .as_deref()
            .ok_or_else(|| unreadable("checksum record is missing".to_string()))?;
        let stored =
            parse_checksum(raw).ok_or_else(|| unreadable(format!("'{raw}' is not a decimal u32")))?;
        Ok(stored == self.digest())
    }

    fn update_on_changes(&mut self) -> Result<(), StoreError> {
        if self.todolist.is_some() {
            self.checksum = Some(self.digest().to_string());
        }
        Ok(())
    }
}
