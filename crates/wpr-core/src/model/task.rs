use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::calendar::CalendarDate;

const STATUS_ACTIVE: &str = "A";
const STATUS_COMPLETED: &str = "C";

/// One to-do item of a weekly store.
///
/// Persisted as a single line `<originated>:<A|C>:<description>`. Colons in
/// the description are written verbatim and dropped on parse (every field
/// after the second colon is rejoined with no separator), so descriptions
/// containing `:` do not round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoTask {
    description: String,
    originated: CalendarDate,
    completed: bool,
}

impl TodoTask {
    /// Create an active task originated on `today`.
    #[must_use]
    pub fn new(description: impl Into<String>, today: CalendarDate) -> Self {
        Self {
            description: description.into(),
            originated: today,
            completed: false,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn originated_on(&self) -> CalendarDate {
        self.originated
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Still open and originated on or before `date`.
    #[must_use]
    pub fn is_open_on(&self, date: CalendarDate) -> bool {
        !self.completed && self.originated <= date
    }

    /// One-way transition to completed.
    ///
    /// Returns `false` (and changes nothing) when already completed.
    pub(crate) fn mark_completed(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        true
    }

    const fn status(&self) -> &'static str {
        if self.completed {
            STATUS_COMPLETED
        } else {
            STATUS_ACTIVE
        }
    }
}

impl fmt::Display for TodoTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.originated, self.status(), self.description)
    }
}

/// Error returned when a persisted task line cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTaskError {
    pub line: String,
    pub reason: &'static str,
}

impl fmt::Display for ParseTaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid task record '{}': {}", self.line, self.reason)
    }
}

impl std::error::Error for ParseTaskError {}

impl FromStr for TodoTask {
    type Err = ParseTaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason| ParseTaskError {
            line: s.to_string(),
            reason,
        };

        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() < 3 {
            return Err(fail("expected <date>:<status>:<description>"));
        }

        let originated =
            CalendarDate::parse(fields[0]).map_err(|_| fail("origination date is not YYYY-MM-DD"))?;
        let completed = match fields[1] {
            STATUS_ACTIVE => false,
            STATUS_COMPLETED => true,
            _ => return Err(fail("status must be A or C")),
        };

        let description = fields[2..].concat();
        if description.trim().is_empty() {
            return Err(fail("description is empty"));
        }

        Ok(Self {
            description,
            originated,
            completed,
        })
    }
}
