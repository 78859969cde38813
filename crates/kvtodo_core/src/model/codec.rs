//! Wire format for the stored task list.
//!
//! The whole list is one JSON array of task objects written under a single
//! storage key. There is no version marker; anything that is not such an
//! array is rejected as malformed. Records only need `id` and `text`; older
//! ones without `completed` or `createdAt` still load.

use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure to encode or decode the stored list.
#[derive(Debug)]
pub struct CodecError(serde_json::Error);

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed task list: {}", self.0)
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self(value)
    }
}

/// Serializes the full list in its current order.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(tasks)?)
}

/// Parses a stored blob back into a list, preserving order.
pub fn decode_tasks(blob: &str) -> Result<Vec<Task>, CodecError> {
    Ok(serde_json::from_str(blob)?)
}
