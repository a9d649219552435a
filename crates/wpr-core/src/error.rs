use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidDateFormat,
    ConfigParseError,
    InvalidGroupName,
    ChecksumMismatch,
    ChecksumUnreadable,
    CorruptTaskRecord,
    TaskNotFound,
    AlreadyCompleted,
    NotEditable,
    InvalidDescription,
    StoreIoFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidDateFormat => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidGroupName => "E1003",
            Self::TaskNotFound => "E2001",
            Self::AlreadyCompleted => "E2002",
            Self::NotEditable => "E2003",
            Self::InvalidDescription => "E2004",
            Self::ChecksumMismatch => "E3001",
            Self::ChecksumUnreadable => "E3002",
            Self::CorruptTaskRecord => "E3003",
            Self::StoreIoFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidDateFormat => "Invalid date format",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidGroupName => "Invalid group name",
            Self::ChecksumMismatch => "Checksum mismatch",
            Self::ChecksumUnreadable => "Checksum file unreadable",
            Self::CorruptTaskRecord => "Corrupt task record",
            Self::TaskNotFound => "Task not found",
            Self::AlreadyCompleted => "Task already completed",
            Self::NotEditable => "Week is not editable",
            Self::InvalidDescription => "Invalid task description",
            Self::StoreIoFailed => "Store file I/O failed",
        }
    }

    /// Optional remediation hint that can be surfaced to the user.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidDateFormat => Some("Use the YYYY-MM-DD format, e.g. 2024-03-18."),
            Self::ConfigParseError => Some("Fix syntax in the wpr config.toml and retry."),
            Self::InvalidGroupName => Some("Use a plain directory name without path separators."),
            Self::ChecksumMismatch => {
                Some("The week files were changed outside wpr; inspect them before editing.")
            }
            Self::ChecksumUnreadable => {
                Some("Restore or remove the .checksum file next to the .todolist file.")
            }
            Self::CorruptTaskRecord => {
                Some("Each task line must look like YYYY-MM-DD:A:description.")
            }
            Self::TaskNotFound => Some("Run `wpr weekly` to see valid task ids."),
            Self::AlreadyCompleted => None,
            Self::NotEditable => Some("Only the current week can be edited."),
            Self::InvalidDescription => {
                Some("Use a non-empty, single-line description.")
            }
            Self::StoreIoFailed => Some("Check disk space and permissions of the store directory."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors surfaced by the task store and its helpers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Date text did not split into three numeric components naming a real day.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    /// Stored digest disagrees with the week files on disk.
    #[error("checksum mismatch for week files at {path}")]
    ChecksumMismatch { path: PathBuf },

    /// The checksum file is missing, unreadable or not a decimal integer.
    #[error("cannot read checksum {path}: {reason}")]
    ChecksumUnreadable { path: PathBuf, reason: String },

    /// A persisted task line could not be parsed.
    #[error("corrupt task record at line {line_no}: '{line}'")]
    CorruptTaskRecord { line_no: usize, line: String },

    /// 1-based task id outside the task list.
    #[error("no task with id {id} (week has {len} tasks)")]
    TaskNotFound { id: usize, len: usize },

    /// One-way completion was attempted twice.
    #[error("task {id} is already completed")]
    AlreadyCompleted { id: usize },

    /// Mutation attempted on a week other than the current one.
    #[error("week starting {week_start} is not editable")]
    NotEditable { week_start: String },

    /// Description is empty or would break the one-line record format.
    #[error("invalid task description: {0}")]
    InvalidDescription(&'static str),

    /// Group name cannot be used as a single directory under the store root.
    #[error("invalid group name '{0}'")]
    InvalidGroup(String),

    /// Configuration file could not be read or parsed.
    #[error("config error in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// Underlying filesystem failure.
    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidDateFormat(_) => ErrorCode::InvalidDateFormat,
            Self::ChecksumMismatch { .. } => ErrorCode::ChecksumMismatch,
            Self::ChecksumUnreadable { .. } => ErrorCode::ChecksumUnreadable,
            Self::CorruptTaskRecord { .. } => ErrorCode::CorruptTaskRecord,
            Self::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            Self::AlreadyCompleted { .. } => ErrorCode::AlreadyCompleted,
            Self::NotEditable { .. } => ErrorCode::NotEditable,
            Self::InvalidDescription(_) => ErrorCode::InvalidDescription,
            Self::InvalidGroup(_) => ErrorCode::InvalidGroupName,
            Self::Config { .. } => ErrorCode::ConfigParseError,
            Self::Io(_) => ErrorCode::StoreIoFailed,
        }
    }

    /// Optional remediation hint for the user.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }

    /// Whether the store instance that produced this error must be discarded.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ChecksumMismatch { .. }
                | Self::ChecksumUnreadable { .. }
                | Self::CorruptTaskRecord { .. }
        )
    }
}
