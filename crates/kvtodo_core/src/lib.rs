//! Core domain logic for kvtodo.
//! This crate is the single source of truth for todo list invariants.

pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod service;
pub mod view;

pub use gateway::memory::MemoryKvGateway;
pub use gateway::sqlite::SqliteKvGateway;
pub use gateway::{GatewayError, GatewayResult, KvGateway, STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::codec::{decode_tasks, encode_tasks, CodecError};
pub use model::task::{
    normalize_task_text, now_iso8601, ParseFilterError, Task, TaskFilter, TaskId,
    TaskValidationError,
};
pub use service::status::{StatusLevel, StatusNotice};
pub use service::todo_service::{ClearOutcome, SyncError, TodoController};
pub use view::list_view::{ListView, LiteralText, TaskRow};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
