pub mod task;

pub use task::{ParseTaskError, TodoTask};
