//! Todo list controller.
//!
//! # Responsibility
//! - Keep the in-memory task list, active filter and id counter.
//! - Apply list mutations and persist the whole list after each one.
//! - Turn every outcome into a transient [`StatusNotice`].
//!
//! # Invariants
//! - Task ids are unique; `next_id` is always greater than every id in the list.
//! - Ids are never reused: once the id space is exhausted, `add` is rejected.
//! - New tasks are prepended (newest first).
//! - Validation runs before any mutation or persistence attempt.
//! - A failed save keeps the mutation; memory stays the source of truth and
//!   `is_dirty()` reports the divergence until a later save succeeds.
//! - No operation returns an error or panics on gateway/codec failure.

use crate::gateway::{GatewayError, KvGateway, STORAGE_KEY};
use crate::model::codec::{decode_tasks, encode_tasks, CodecError};
use crate::model::task::{normalize_task_text, now_iso8601, Task, TaskFilter, TaskId};
use crate::service::status::StatusNotice;
use crate::view::list_view::ListView;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const MSG_LOADED: &str = "Todos loaded from cloud";
const MSG_NOTHING_STORED: &str = "No saved todos found";
const MSG_LOAD_FAILED: &str = "Failed to load todos from cloud";
const MSG_SAVED: &str = "Todos saved to cloud";
const MSG_SAVE_FAILED: &str = "Failed to save todos to cloud";
const MSG_ADD_EMPTY: &str = "Please enter a todo item";
const MSG_ADDED: &str = "Todo added successfully";
const MSG_DELETED: &str = "Todo deleted";
const MSG_EDIT_EMPTY: &str = "Todo text cannot be empty";
const MSG_UPDATED: &str = "Todo updated";
const MSG_NOTHING_TO_CLEAR: &str = "No completed todos to clear";
const MSG_IDS_EXHAUSTED: &str = "No more todo ids available";

/// Failure while moving the list to or from the gateway.
#[derive(Debug)]
pub enum SyncError {
    Gateway(GatewayError),
    Codec(CodecError),
    /// Stored list holds the largest possible id; no fresh id follows it.
    IdSpaceExhausted(TaskId),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gateway(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::IdSpaceExhausted(max) => write!(f, "no task id left after {max}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gateway(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::IdSpaceExhausted(_) => None,
        }
    }
}

impl From<GatewayError> for SyncError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<CodecError> for SyncError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Result of a bulk clear of completed tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Number of tasks removed; zero when nothing was completed.
    pub cleared: usize,
    pub notice: StatusNotice,
}

/// Controller coupling one gateway key with the in-memory task list.
pub struct TodoController<G: KvGateway> {
    gateway: G,
    tasks: Vec<Task>,
    filter: TaskFilter,
    /// `None` once every id has been handed out.
    next_id: Option<TaskId>,
    dirty: bool,
}

impl<G: KvGateway> TodoController<G> {
    /// Creates an empty controller; call [`Self::load`] to pull stored state.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            tasks: Vec::new(),
            filter: TaskFilter::default(),
            next_id: Some(1),
            dirty: false,
        }
    }

    /// Replaces the list with the stored one.
    ///
    /// Absent, empty, unreadable or malformed stored values all leave an
    /// empty list; only the notice differs. A stored list whose largest id
    /// leaves no fresh id is treated as malformed.
    pub fn load(&mut self) -> StatusNotice {
        let started_at = Instant::now();
        let loaded = self.fetch().and_then(|stored| match stored {
            Some(tasks) => first_free_id(&tasks).map(|next_id| Some((tasks, next_id))),
            None => Ok(None),
        });

        match loaded {
            Ok(Some((tasks, next_id))) => {
                self.tasks = tasks;
                self.next_id = Some(next_id);
                self.dirty = false;
                info!(
                    "event=todos_load module=service status=ok count={} next_id={} duration_ms={}",
                    self.tasks.len(),
                    next_id,
                    started_at.elapsed().as_millis()
                );
                StatusNotice::success(MSG_LOADED)
            }
            Ok(None) => {
                self.reset();
                info!(
                    "event=todos_load module=service status=ok count=0 stored=false duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                StatusNotice::success(MSG_NOTHING_STORED)
            }
            Err(err) => {
                self.reset();
                error!(
                    "event=todos_load module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                StatusNotice::error(MSG_LOAD_FAILED)
            }
        }
    }

    /// Prepends a new task built from trimmed `raw_text`.
    pub fn add(&mut self, raw_text: &str) -> StatusNotice {
        let Ok(text) = normalize_task_text(raw_text) else {
            warn!("event=todo_add module=service status=rejected reason=empty_text");
            return StatusNotice::error(MSG_ADD_EMPTY);
        };

        let Some(id) = self.next_id else {
            warn!("event=todo_add module=service status=rejected reason=ids_exhausted");
            return StatusNotice::error(MSG_IDS_EXHAUSTED);
        };
        self.next_id = id.checked_add(1);
        self.tasks.insert(0, Task::new(id, text, now_iso8601()));
        debug!("event=todo_add module=service status=applied task_id={id}");
        self.save_with("todo_add", MSG_ADDED)
    }

    /// Flips completion of task `id`.
    ///
    /// Returns `None` without persisting when no task matches.
    pub fn toggle(&mut self, id: TaskId) -> Option<StatusNotice> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.toggle();
        debug!(
            "event=todo_toggle module=service status=applied task_id={id} completed={}",
            task.completed
        );
        Some(self.save_with("todo_toggle", MSG_SAVED))
    }

    /// Removes task `id` and persists, whether or not it existed.
    pub fn remove(&mut self, id: TaskId) -> StatusNotice {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        debug!(
            "event=todo_delete module=service status=applied task_id={id} removed={}",
            before - self.tasks.len()
        );
        self.save_with("todo_delete", MSG_DELETED)
    }

    /// Replaces the text of task `id` with trimmed `raw_text`.
    ///
    /// Blank text is rejected before lookup. Returns `None` when no task
    /// matches a valid edit.
    pub fn edit(&mut self, id: TaskId, raw_text: &str) -> Option<StatusNotice> {
        let Ok(text) = normalize_task_text(raw_text) else {
            warn!("event=todo_edit module=service status=rejected reason=empty_text task_id={id}");
            return Some(StatusNotice::error(MSG_EDIT_EMPTY));
        };

        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.text = text;
        debug!("event=todo_edit module=service status=applied task_id={id}");
        Some(self.save_with("todo_edit", MSG_UPDATED))
    }

    /// Removes every completed task in one pass.
    pub fn clear_completed(&mut self) -> ClearOutcome {
        let cleared = self.completed_count();
        if cleared == 0 {
            warn!("event=todos_clear module=service status=rejected reason=nothing_completed");
            return ClearOutcome {
                cleared,
                notice: StatusNotice::error(MSG_NOTHING_TO_CLEAR),
            };
        }

        self.tasks.retain(|task| !task.completed);
        debug!("event=todos_clear module=service status=applied cleared={cleared}");
        let message = format!(
            "Cleared {cleared} completed todo{}",
            if cleared == 1 { "" } else { "s" }
        );
        ClearOutcome {
            cleared,
            notice: self.save_with("todos_clear", message),
        }
    }

    /// Changes the active filter. Nothing is persisted.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    /// Tasks matching the active filter, in list order.
    pub fn filtered_view(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    /// Presentation snapshot for the active filter.
    pub fn view(&self) -> ListView {
        ListView::build(&self.tasks, self.filter)
    }

    /// Full list, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Id the next added task will receive; `None` when ids are exhausted.
    pub fn next_id(&self) -> Option<TaskId> {
        self.next_id
    }

    /// Whether the last save failed and storage lags behind memory.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn fetch(&self) -> Result<Option<Vec<Task>>, SyncError> {
        match self.gateway.get(STORAGE_KEY)? {
            Some(blob) if !blob.is_empty() => Ok(Some(decode_tasks(&blob)?)),
            _ => Ok(None),
        }
    }

    fn reset(&mut self) {
        self.tasks.clear();
        self.next_id = Some(1);
        self.dirty = false;
    }

    fn persist(&mut self) -> Result<(), SyncError> {
        let blob = encode_tasks(&self.tasks)?;
        self.gateway.set(STORAGE_KEY, &blob)?;
        Ok(())
    }

    fn save_with(&mut self, event: &str, success: impl Into<String>) -> StatusNotice {
        match self.persist() {
            Ok(()) => {
                self.dirty = false;
                info!(
                    "event={event} module=service status=ok count={}",
                    self.tasks.len()
                );
                StatusNotice::success(success)
            }
            Err(err) => {
                self.dirty = true;
                error!(
                    "event={event} module=service status=error error_code=save_failed error={err}"
                );
                StatusNotice::error(MSG_SAVE_FAILED)
            }
        }
    }
}

fn first_free_id(tasks: &[Task]) -> Result<TaskId, SyncError> {
    let max = tasks.iter().map(|task| task.id).max().unwrap_or(0);
    max.checked_add(1).ok_or(SyncError::IdSpaceExhausted(max))
}

#[cfg(test)]
mod tests {
    use super::TodoController;
    use crate::gateway::memory::MemoryKvGateway;
    use crate::gateway::STORAGE_KEY;
    use crate::model::task::TaskFilter;

    #[test]
    fn add_assigns_increasing_ids_newest_first() {
        let mut controller = TodoController::new(MemoryKvGateway::new());
        controller.add("Buy milk");
        controller.add("Walk dog");

        let ids: Vec<u64> = controller.tasks().iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(controller.next_id(), Some(3));
    }

    #[test]
    fn blank_add_is_rejected_without_write() {
        let gateway = MemoryKvGateway::new();
        let mut controller = TodoController::new(gateway.clone());

        let notice = controller.add("   ");
        assert!(notice.is_error());
        assert_eq!(notice.message, "Please enter a todo item");
        assert!(controller.tasks().is_empty());
        assert_eq!(gateway.write_count(), 0);
        assert_eq!(controller.next_id(), Some(1));
    }

    #[test]
    fn toggle_unknown_id_does_not_persist() {
        let gateway = MemoryKvGateway::new();
        let mut controller = TodoController::new(gateway.clone());
        controller.add("one");

        assert!(controller.toggle(99).is_none());
        assert_eq!(gateway.write_count(), 1);
    }

    #[test]
    fn toggle_reports_persistence_status() {
        let mut controller = TodoController::new(MemoryKvGateway::new());
        controller.add("one");

        let notice = controller.toggle(1).expect("task 1 exists");
        assert!(!notice.is_error());
        assert_eq!(notice.message, "Todos saved to cloud");
        assert!(controller.tasks()[0].completed);
    }

    #[test]
    fn edit_blank_reports_error_and_keeps_text() {
        let mut controller = TodoController::new(MemoryKvGateway::new());
        controller.add("keep me");

        let notice = controller.edit(1, " ").expect("blank edit reports");
        assert_eq!(notice.message, "Todo text cannot be empty");
        assert_eq!(controller.tasks()[0].text, "keep me");
    }

    #[test]
    fn edit_unknown_id_returns_none() {
        let mut controller = TodoController::new(MemoryKvGateway::new());
        assert!(controller.edit(5, "text").is_none());
    }

    #[test]
    fn save_failure_keeps_mutation_and_marks_dirty() {
        let gateway = MemoryKvGateway::new();
        let mut controller = TodoController::new(gateway.clone());
        controller.add("stored");

        gateway.set_fail_writes(true);
        let notice = controller.add("unsaved");
        assert!(notice.is_error());
        assert_eq!(notice.message, "Failed to save todos to cloud");
        assert_eq!(controller.tasks().len(), 2);
        assert!(controller.is_dirty());
        let stored = gateway.peek(STORAGE_KEY).expect("first save landed");
        assert!(!stored.contains("unsaved"));

        gateway.set_fail_writes(false);
        let notice = controller.toggle(1).expect("task 1 exists");
        assert!(!notice.is_error());
        assert!(!controller.is_dirty());
        let stored = gateway.peek(STORAGE_KEY).expect("second save landed");
        assert!(stored.contains("unsaved"));
    }

    #[test]
    fn borrowed_gateway_is_usable() {
        let gateway = MemoryKvGateway::new();
        let mut controller = TodoController::new(&gateway);
        controller.add("through a reference");
        assert_eq!(gateway.write_count(), 1);
    }

    #[test]
    fn filter_change_does_not_persist() {
        let gateway = MemoryKvGateway::new();
        let mut controller = TodoController::new(gateway.clone());
        controller.set_filter(TaskFilter::Completed);
        assert_eq!(controller.filter(), TaskFilter::Completed);
        assert_eq!(gateway.write_count(), 0);
    }
}
