//! Presentation snapshot of the todo list.
//!
//! # Responsibility
//! - Select the rows shown under the active filter.
//! - Derive counters and action availability from the full list.
//! - Carry task text as [`LiteralText`] so renderers cannot interpret it.
//!
//! # Invariants
//! - Row order equals list order; nothing is re-sorted.
//! - Counters are computed over the full list, not the filtered rows.

use crate::model::task::{Task, TaskFilter, TaskId};
use std::fmt::{Display, Formatter, Write};

/// User text that renders as inert characters.
///
/// Control characters (ESC included) are written as visible escapes, so a
/// task can never smuggle terminal control sequences into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralText(String);

impl LiteralText {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Original unescaped text, e.g. to prefill an edit field.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl Display for LiteralText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for ch in self.0.chars() {
            if ch.is_control() {
                for escaped in ch.escape_default() {
                    f.write_char(escaped)?;
                }
            } else {
                f.write_char(ch)?;
            }
        }
        Ok(())
    }
}

/// One interactive row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: LiteralText,
    pub completed: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub filter: TaskFilter,
    pub rows: Vec<TaskRow>,
    /// Tasks with `completed == false` across the full list.
    pub remaining: usize,
    /// Tasks with `completed == true` across the full list.
    pub completed: usize,
}

impl ListView {
    pub fn build(tasks: &[Task], filter: TaskFilter) -> Self {
        let rows = tasks
            .iter()
            .filter(|task| filter.matches(task))
            .map(|task| TaskRow {
                id: task.id,
                text: LiteralText::new(task.text.as_str()),
                completed: task.completed,
            })
            .collect();
        let completed = tasks.iter().filter(|task| task.completed).count();

        Self {
            filter,
            rows,
            remaining: tasks.len() - completed,
            completed,
        }
    }

    /// True when the filtered selection is empty and the empty state shows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the clear-completed action is enabled.
    pub fn clear_enabled(&self) -> bool {
        self.completed > 0
    }

    pub fn remaining_label(&self) -> String {
        format!(
            "{} item{} left",
            self.remaining,
            if self.remaining == 1 { "" } else { "s" }
        )
    }
}
