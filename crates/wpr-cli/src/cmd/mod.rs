pub mod add;
pub mod completions;
pub mod complete;
pub mod groups;
pub mod memo;
pub mod unknown;
pub mod week;

use serde::Serialize;
use wpr_core::{CalendarDate, StoreConfig, StoreError, TodoTask, WeeklyStore};

use crate::output::{OutputMode, fail_store};

/// Everything a command needs to open the selected week.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: StoreConfig,
    /// Day inside the selected week; `None` selects the current week.
    pub date: Option<CalendarDate>,
    /// Day the `today` and `daily` reports treat as today.
    pub reference_day: CalendarDate,
    pub verbose: bool,
    pub output: OutputMode,
}

impl Session {
    /// Open the selected week, rendering load failures.
    pub fn open(&self) -> anyhow::Result<WeeklyStore> {
        let store =
            WeeklyStore::open(&self.config, self.date).map_err(|err| fail_store(self.output, &err))?;
        if self.verbose {
            eprintln!(
                "notice: week {} ({}) from {}",
                store.week_start(),
                store.group().unwrap_or("default group"),
                store.todolist_path().display()
            );
            if !store.is_editable() {
                eprintln!("notice: this week is read-only");
            }
        }
        Ok(store)
    }

    /// Fail with `NotEditable` unless the store's week is the current week.
    pub fn require_editable(&self, store: &WeeklyStore) -> anyhow::Result<()> {
        if store.is_editable() {
            return Ok(());
        }
        Err(fail_store(
            self.output,
            &StoreError::NotEditable {
                week_start: store.week_start().to_string(),
            },
        ))
    }

    pub fn sync(&self, store: &mut WeeklyStore) -> anyhow::Result<()> {
        store.sync().map_err(|err| fail_store(self.output, &err))
    }
}

/// A task as shown to users: its 1-based id plus its fields.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub id: usize,
    pub description: String,
    pub originated: CalendarDate,
    pub completed: bool,
}

impl TaskView {
    pub fn new(id: usize, task: &TodoTask) -> Self {
        Self {
            id,
            description: task.description().to_string(),
            originated: task.originated_on(),
            completed: task.is_completed(),
        }
    }

    /// Status column used by text output: `A` active, `C` completed.
    pub const fn status(&self) -> char {
        if self.completed { 'C' } else { 'A' }
    }

    /// Checkbox used by pretty output.
    pub const fn checkbox(&self) -> &'static str {
        if self.completed { "[x]" } else { "[ ]" }
    }
}

/// All tasks of `store` matching `keep`, with their ids.
pub fn task_views(store: &WeeklyStore, keep: impl Fn(&TodoTask) -> bool) -> Vec<TaskView> {
    store
        .tasks()
        .iter()
        .enumerate()
        .filter(|(_, task)| keep(task))
        .map(|(index, task)| TaskView::new(index + 1, task))
        .collect()
}

/// Join free-form words given on the command line.
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}
