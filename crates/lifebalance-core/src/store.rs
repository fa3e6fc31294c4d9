use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::reminder::{self, ReminderScheduler, ReminderTemplate};
use crate::task::{Task, TaskDraft, TaskId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please enter an activity: title must not be empty")]
    EmptyTitle,
}

/// In-memory task collection, kept in insertion order.
///
/// The store is the only mutable entity in the core. It is not internally
/// synchronized; callers drive it from one thread.
pub struct TaskStore {
    tasks: Vec<Task>,
    scheduler: Arc<dyn ReminderScheduler>,
    template: ReminderTemplate,
}

impl TaskStore {
    pub fn new(scheduler: Arc<dyn ReminderScheduler>) -> Self {
        Self::with_template(scheduler, ReminderTemplate::default())
    }

    pub fn with_template(scheduler: Arc<dyn ReminderScheduler>, template: ReminderTemplate) -> Self {
        Self {
            tasks: Vec::new(),
            scheduler,
            template,
        }
    }

    /// Validates and appends a new task, then requests its reminder.
    ///
    /// A scheduling failure is logged and does not affect the returned task.
    #[instrument(skip(self, draft, now), fields(category = %draft.category_id, priority = %draft.priority_id))]
    pub fn add_task(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Result<Task, ValidationError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            debug!("rejected task with empty title");
            return Err(ValidationError::EmptyTitle);
        }

        let task = Task::from_draft(draft, title, now);
        self.tasks.push(task.clone());
        info!(id = %task.id, due_at = %task.due_at, "added task");

        self.request_reminder(&task, now);
        Ok(task)
    }

    /// Flips `done` for `id` and returns the new value. Unknown ids are ignored.
    #[instrument(skip(self), fields(id = %id))]
    pub fn toggle_done(&mut self, id: TaskId) -> Option<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!("toggle ignored for unknown task id");
            return None;
        };
        task.done = !task.done;
        info!(done = task.done, "toggled task");
        Some(task.done)
    }

    pub fn snapshot(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Resolves an id prefix. Returns `None` when nothing or more than one task
    /// matches.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Task> {
        let mut matches = self.tasks.iter().filter(|t| t.id.matches_prefix(prefix));
        let first = matches.next()?;
        if matches.next().is_some() {
            None
        } else {
            Some(first)
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn request_reminder(&self, task: &Task, now: DateTime<Utc>) {
        let Some(request) = reminder::plan_reminder(task, now, &self.template) else {
            debug!(id = %task.id, "task not due in the future; no reminder");
            return;
        };

        match self
            .scheduler
            .schedule_one_shot(request.fire_at, request.payload)
        {
            Ok(handle) => {
                debug!(id = %task.id, fire_at = %request.fire_at, ?handle, "reminder scheduled");
            }
            Err(err) => {
                warn!(id = %task.id, error = %err, "failed to schedule reminder");
            }
        }
    }
}
