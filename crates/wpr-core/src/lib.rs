//! wpr-core library.
//!
//! Weekly task store for the `wpr` planner: calendar-week resolution, the
//! per-week file triple with its CRC-32 integrity check, the task model and
//! the "did you mean" command matcher.
//!
//! # Conventions
//!
//! - **Errors**: fallible operations return [`error::StoreError`].
//! - **Logging**: use `tracing` macros (`debug!`, `warn!`, `trace!`).
//! - **Configuration**: pass a [`config::StoreConfig`] explicitly; there is
//!   no process-wide state.

pub mod calendar;
pub mod checksum;
pub mod config;
pub mod error;
pub mod location;
pub mod memory;
pub mod model;
pub mod suggest;
pub mod weekly;

pub use calendar::{CalendarDate, Clock, FixedClock, SystemClock, Weekday};
pub use config::StoreConfig;
pub use error::{ErrorCode, StoreError};
pub use location::{FileLocation, WeekFiles, list_groups};
pub use memory::MemoryFiles;
pub use model::TodoTask;
pub use weekly::WeeklyStore;
