//! The weekly store: tasks and memo of one calendar week.
//!
//! A store is identified by its week-start Monday and an optional group.
//! Construction loads the week's files and refuses to hand back a store
//! whose checksum does not match or whose task list cannot be parsed.
//!
//! Mutations are only allowed while the store's week is the current week.
//! Editability is evaluated against the store's [`Clock`] on every call, so
//! a store opened just before midnight on Sunday becomes read-only once
//! the clock crosses into the next week.
//!
//! # Sync protocol
//!
//! Every successful mutation sets a dirty flag. [`WeeklyStore::sync`] then
//! either writes the week back (dirty) or reloads it from storage (clean),
//! which picks up external edits made since the store was opened.

use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::calendar::{CalendarDate, Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::location::{FileLocation, WeekFiles};
use crate::model::TodoTask;

/// Tasks and memo of one week, backed by a [`WeekFiles`] implementation.
#[derive(Debug)]
pub struct WeeklyStore<F = FileLocation, C = SystemClock> {
    week_start: CalendarDate,
    group: Option<String>,
    tasks: Vec<TodoTask>,
    memo: String,
    dirty: bool,
    files: F,
    clock: C,
}

impl WeeklyStore<FileLocation, SystemClock> {
    /// Open the week containing `date` (today when `None`) on disk.
    ///
    /// Creates the store root if it is missing.
    ///
    /// # Errors
    ///
    /// Fails when the root cannot be created or the week does not load
    /// (see [`WeeklyStore::load_with`]).
    pub fn open(config: &StoreConfig, date: Option<CalendarDate>) -> Result<Self, StoreError> {
        Self::open_with_clock(config, date, SystemClock)
    }
}

impl<C: Clock> WeeklyStore<FileLocation, C> {
    /// Like [`WeeklyStore::open`], with an explicit source of "today".
    ///
    /// # Errors
    ///
    /// Fails when the root cannot be created or the week does not load.
    pub fn open_with_clock(
        config: &StoreConfig,
        date: Option<CalendarDate>,
        clock: C,
    ) -> Result<Self, StoreError> {
        config.ensure_root()?;
        let week_start = date.unwrap_or_else(|| clock.today()).week_start();
        let files = FileLocation::new(config, week_start);
        Self::load_with(week_start, config.group.clone(), files, clock)
    }

    /// On-disk location of the task list.
    #[must_use]
    pub fn todolist_path(&self) -> &Path {
        self.files.todolist_path()
    }
}

impl<F: WeekFiles, C: Clock> WeeklyStore<F, C> {
    /// Build a store for the week containing `date` over `files` and load it.
    ///
    /// `files` must describe that week.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ChecksumMismatch`] when the stored digest does not
    ///   match the files.
    /// - [`StoreError::ChecksumUnreadable`] when a task list exists without
    ///   a readable checksum.
    /// - [`StoreError::CorruptTaskRecord`] when a task line is malformed.
    /// - [`StoreError::Io`] on storage failures.
    pub fn load_with(
        date: CalendarDate,
        group: Option<String>,
        files: F,
        clock: C,
    ) -> Result<Self, StoreError> {
        let mut store = Self {
            week_start: date.week_start(),
            group,
            tasks: Vec::new(),
            memo: String::new(),
            dirty: false,
            files,
            clock,
        };
        store.load()?;
        Ok(store)
    }

    /// The Monday identifying this week.
    #[must_use]
    pub const fn week_start(&self) -> CalendarDate {
        self.week_start
    }

    /// The Sunday closing this week.
    #[must_use]
    pub fn week_end(&self) -> CalendarDate {
        self.week_start.shift(6)
    }

    #[must_use]
    pub fn week_number(&self) -> u32 {
        self.week_start.week_number()
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Tasks in insertion order. Task ids are 1-based positions here.
    #[must_use]
    pub fn tasks(&self) -> &[TodoTask] {
        &self.tasks
    }

    /// Task by 1-based id.
    #[must_use]
    pub fn task(&self, id: usize) -> Option<&TodoTask> {
        id.checked_sub(1).and_then(|index| self.tasks.get(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Whether there are local changes not yet synced.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub const fn files(&self) -> &F {
        &self.files
    }

    /// `true` while this store's week is the clock's current week.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.week_start == self.clock.today().week_start()
    }

    /// Append a new active task dated today.
    ///
    /// When the week is not editable nothing changes. Returns the dirty
    /// flag after the call.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidDescription`] when `description` is blank or
    /// spans several lines.
    pub fn add_task(&mut self, description: &str) -> Result<bool, StoreError> {
        validate_description(description)?;
        if !self.is_editable() {
            return Ok(self.dirty);
        }
        self.tasks
            .push(TodoTask::new(description, self.clock.today()));
        self.dirty = true;
        Ok(self.dirty)
    }

    /// Replace the memo text.
    ///
    /// When the week is not editable nothing changes. Returns the dirty
    /// flag after the call.
    pub fn set_memo(&mut self, text: impl Into<String>) -> bool {
        if self.is_editable() {
            self.memo = text.into();
            self.dirty = true;
        }
        self.dirty
    }

    /// Complete the task with 1-based `id`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotEditable`] when this is not the current week.
    /// - [`StoreError::TaskNotFound`] when `id` is out of range.
    /// - [`StoreError::AlreadyCompleted`] when the task is already done.
    ///   Neither the task nor the dirty flag is touched.
    pub fn complete_task(&mut self, id: usize) -> Result<(), StoreError> {
        if !self.is_editable() {
            return Err(StoreError::NotEditable {
                week_start: self.week_start.to_string(),
            });
        }
        let len = self.tasks.len();
        let task = id
            .checked_sub(1)
            .and_then(|index| self.tasks.get_mut(index))
            .ok_or(StoreError::TaskNotFound { id, len })?;
        if !task.mark_completed() {
            return Err(StoreError::AlreadyCompleted { id });
        }
        self.dirty = true;
        Ok(())
    }

    /// Write back local changes, or reload when there are none.
    ///
    /// # Errors
    ///
    /// Storage failures while saving, or any load failure when reloading.
    /// After a failed reload the store must be discarded.
    pub fn sync(&mut self) -> Result<(), StoreError> {
        if self.dirty {
            self.save()?;
            self.files.update_on_changes()?;
            self.dirty = false;
            debug!(week = %self.week_start, "synced local changes");
        } else {
            self.load()?;
            debug!(week = %self.week_start, "reloaded unchanged week");
        }
        Ok(())
    }

    fn load(&mut self) -> Result<(), StoreError> {
        if !self.files.check_consistency()? {
            let path = self.files.location();
            warn!(week = %self.week_start, path = %path.display(), "checksum mismatch");
            return Err(StoreError::ChecksumMismatch { path });
        }

        let memo = self.files.read_memo()?.unwrap_or_default();
        let tasks = match self.files.read_todolist()? {
            Some(contents) => parse_tasks(&contents)?,
            None => Vec::new(),
        };

        debug!(
            week = %self.week_start,
            tasks = tasks.len(),
            memo_bytes = memo.len(),
            "loaded week"
        );
        self.tasks = tasks;
        self.memo = memo;
        self.dirty = false;
        Ok(())
    }

    fn save(&mut self) -> Result<(), StoreError> {
        if self.memo.is_empty() {
            self.files.remove_memo()?;
        } else {
            self.files.write_memo(&self.memo)?;
        }

        // An empty list leaves any existing task-list file untouched.
        if !self.tasks.is_empty() {
            let contents: String = self
                .tasks
                .iter()
                .map(|task| format!("{task}\n"))
                .collect();
            self.files.write_todolist(&contents)?;
        }
        Ok(())
    }
}

fn validate_description(description: &str) -> Result<(), StoreError> {
    if description.trim().is_empty() {
        return Err(StoreError::InvalidDescription("description is empty"));
    }
    if description.contains(['\n', '\r']) {
        return Err(StoreError::InvalidDescription(
            "description must fit on one line",
        ));
    }
    Ok(())
}

/// Parse a task-list file. Empty lines are skipped.
fn parse_tasks(contents: &str) -> Result<Vec<TodoTask>, StoreError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(index, line)| {
            TodoTask::from_str(line).map_err(|_| StoreError::CorruptTaskRecord {
                line_no: index + 1,
                line: line.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::memory::MemoryFiles;

    fn day(text: &str) -> CalendarDate {
        CalendarDate::parse(text).expect("valid date")
    }

    // Wednesday of the week starting 2024-03-18.
    fn wednesday() -> FixedClock {
        FixedClock(day("2024-03-20"))
    }

    fn open(files: MemoryFiles) -> WeeklyStore<MemoryFiles, FixedClock> {
        WeeklyStore::load_with(day("2024-03-20"), None, files, wednesday()).expect("load")
    }

    #[test]
    fn identity_is_normalised_to_monday() {
        let store = open(MemoryFiles::new());
        assert_eq!(store.week_start(), day("2024-03-18"));
        assert_eq!(store.week_end(), day("2024-03-24"));
        assert_eq!(store.week_number(), 12);
        assert!(store.is_empty());
        assert_eq!(store.memo(), "");
        assert!(!store.is_dirty());
    }

    #[test]
    fn add_task_dates_it_today_and_marks_dirty() {
        let mut store = open(MemoryFiles::new());
        assert!(store.add_task("write report").expect("add"));
        let task = store.task(1).expect("task 1");
        assert_eq!(task.description(), "write report");
        assert_eq!(task.originated_on(), day("2024-03-20"));
        assert!(!task.is_completed());
        assert!(store.task(0).is_none());
        assert!(store.task(2).is_none());
    }

    #[test]
    fn add_task_rejects_unrepresentable_descriptions() {
        let mut store = open(MemoryFiles::new());
        for bad in ["", "   ", "two\nlines", "cr\rhere"] {
            assert!(matches!(
                store.add_task(bad),
                Err(StoreError::InvalidDescription(_))
            ));
        }
        assert!(store.is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn past_week_is_read_only() {
        let clock = FixedClock(day("2024-03-27"));
        let mut store =
            WeeklyStore::load_with(day("2024-03-20"), None, MemoryFiles::new(), clock)
                .expect("load");
        assert!(!store.is_editable());

        assert!(!store.add_task("late").expect("no-op"));
        assert!(!store.set_memo("late memo"));
        assert!(store.is_empty());
        assert_eq!(store.memo(), "");
        assert!(!store.is_dirty());
        assert!(matches!(
            store.complete_task(1),
            Err(StoreError::NotEditable { .. })
        ));
    }

    #[test]
    fn sunday_still_belongs_to_the_week() {
        let clock = FixedClock(day("2024-03-24"));
        let store = WeeklyStore::load_with(day("2024-03-18"), None, MemoryFiles::new(), clock)
            .expect("load");
        assert!(store.is_editable());
    }

    #[test]
    fn completing_twice_is_rejected_without_side_effects() {
        let mut files = MemoryFiles::new();
        files.todolist = Some("2024-03-18:C:done already\n".to_string());
        files.update_on_changes().expect("checksum");

        let mut store = open(files);
        assert!(!store.is_dirty());
        assert!(matches!(
            store.complete_task(1),
            Err(StoreError::AlreadyCompleted { id: 1 })
        ));
        assert!(store.tasks()[0].is_completed());
        assert!(!store.is_dirty());
    }

    #[test]
    fn complete_task_checks_the_id_range() {
        let mut store = open(MemoryFiles::new());
        store.add_task("only").expect("add");
        assert!(matches!(
            store.complete_task(0),
            Err(StoreError::TaskNotFound { id: 0, len: 1 })
        ));
        assert!(matches!(
            store.complete_task(2),
            Err(StoreError::TaskNotFound { id: 2, len: 1 })
        ));
        store.complete_task(1).expect("complete");
        assert!(store.tasks()[0].is_completed());
    }

    #[test]
    fn sync_writes_tasks_memo_and_checksum() {
        let mut store = open(MemoryFiles::new());
        store.add_task("a").expect("add");
        store.add_task("b: with colon").expect("add");
        store.set_memo("weekly notes");
        store.sync().expect("sync");
        assert!(!store.is_dirty());

        let files = store.files();
        assert_eq!(
            files.todolist.as_deref(),
            Some("2024-03-20:A:a\n2024-03-20:A:b: with colon\n")
        );
        assert_eq!(files.memo.as_deref(), Some("weekly notes"));
        assert!(files.check_consistency().expect("check"));
    }

    #[test]
    fn clearing_the_memo_removes_it() {
        let mut store = open(MemoryFiles::new());
        store.add_task("a").expect("add");
        store.set_memo("temporary");
        store.sync().expect("sync");
        store.set_memo("");
        store.sync().expect("sync");
        assert_eq!(store.files().memo, None);
        assert!(store.files().check_consistency().expect("check"));
    }

    #[test]
    fn memo_only_week_has_no_task_list_or_checksum() {
        let mut store = open(MemoryFiles::new());
        store.set_memo("just a note");
        store.sync().expect("sync");
        assert_eq!(store.files().todolist, None);
        assert_eq!(store.files().checksum, None);
    }

    #[test]
    fn clean_sync_reloads_external_edits() {
        let mut store = open(MemoryFiles::new());
        store.add_task("a").expect("add");
        store.sync().expect("sync");

        // Another writer appends a task and refreshes the checksum.
        let mut external = store.files().clone();
        external.todolist = Some("2024-03-20:A:a\n2024-03-21:A:b\n".to_string());
        external.update_on_changes().expect("checksum");
        store.files = external;

        store.sync().expect("reload");
        assert_eq!(store.len(), 2);
        assert_eq!(store.task(2).map(TodoTask::description), Some("b"));
    }

    #[test]
    fn reload_replaces_rather_than_appends() {
        let mut store = open(MemoryFiles::new());
        store.add_task("a").expect("add");
        store.sync().expect("sync");
        store.sync().expect("reload");
        store.sync().expect("reload again");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn tampered_week_fails_to_load() {
        let mut files = MemoryFiles::new();
        files.todolist = Some("2024-03-18:A:x\n".to_string());
        files.update_on_changes().expect("checksum");
        files.todolist = Some("2024-03-18:C:x\n".to_string());

        let err = WeeklyStore::load_with(day("2024-03-20"), None, files, wednesday())
            .expect_err("must fail");
        assert!(matches!(err, StoreError::ChecksumMismatch { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn corrupt_line_fails_to_load() {
        let mut files = MemoryFiles::new();
        files.todolist = Some("2024-03-18:A:ok\nnot a task\n".to_string());
        files.update_on_changes().expect("checksum");

        let err = WeeklyStore::load_with(day("2024-03-20"), None, files, wednesday())
            .expect_err("must fail");
        assert!(matches!(
            err,
            StoreError::CorruptTaskRecord { line_no: 2, ref line } if line == "not a task"
        ));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut files = MemoryFiles::new();
        files.todolist = Some("2024-03-18:A:one\n\n2024-03-19:C:two\n".to_string());
        files.update_on_changes().expect("checksum");

        let store = open(files);
        assert_eq!(store.len(), 2);
        assert!(store.tasks()[1].is_completed());
    }

    #[test]
    fn memo_is_read_verbatim() {
        let mut files = MemoryFiles::new();
        files.memo = Some("line one\r\n\r\nline three".to_string());
        let store = open(files);
        assert_eq!(store.memo(), "line one\r\n\r\nline three");
    }

    #[test]
    fn empty_task_list_never_overwrites_existing_file() {
        // A task list on storage that the in-memory store does not hold.
        let mut store = open(MemoryFiles::new());
        store.files.todolist = Some("2024-03-18:A:kept\n".to_string());
        store.set_memo("memo");
        store.sync().expect("sync");

        assert_eq!(
            store.files().todolist.as_deref(),
            Some("2024-03-18:A:kept\n")
        );
        assert!(store.files().check_consistency().expect("check"));
    }

    #[test]
    fn group_is_carried() {
        let store =
            WeeklyStore::load_with(day("2024-03-18"), Some("work".into()), MemoryFiles::new(), wednesday())
                .expect("load");
        assert_eq!(store.group(), Some("work"));
    }
}
