//! Reminder planning and the scheduling boundary.
//!
//! A reminder is requested once, when a task is created, and only when the
//! task is due strictly after the creation moment. Issued reminders are
//! fire-and-forget: handles are returned but never tracked or cancelled.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::task::Task;

pub const DEFAULT_REMINDER_TITLE: &str = "Activity reminder";
pub const DEFAULT_REMINDER_BODY: &str = "Time to do: {title}";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("notification permission denied")]
    PermissionDenied,

    #[error("no scheduler runtime is available")]
    RuntimeUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderPayload {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub fire_at: DateTime<Utc>,
    pub payload: ReminderPayload,
}

/// Opaque handle for an issued reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReminderHandle(Uuid);

impl ReminderHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReminderHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Title and body template for reminder payloads. `{title}` in the body is
/// replaced with the task title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderTemplate {
    pub title: String,
    pub body: String,
}

impl Default for ReminderTemplate {
    fn default() -> Self {
        Self {
            title: DEFAULT_REMINDER_TITLE.to_string(),
            body: DEFAULT_REMINDER_BODY.to_string(),
        }
    }
}

impl ReminderTemplate {
    pub fn payload_for(&self, task: &Task) -> ReminderPayload {
        ReminderPayload {
            title: self.title.clone(),
            body: self.body.replace("{title}", &task.title),
        }
    }
}

/// The external notification capability.
pub trait ReminderScheduler: Send + Sync {
    /// One-time initialization; asks the host for permission to notify.
    fn request_permission(&self) -> NotificationPermission;

    /// Submits a one-shot reminder. Must not block until the reminder fires.
    fn schedule_one_shot(
        &self,
        fire_at: DateTime<Utc>,
        payload: ReminderPayload,
    ) -> Result<ReminderHandle, SchedulingError>;
}

/// Scheduler used when reminders are switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledScheduler;

impl ReminderScheduler for DisabledScheduler {
    fn request_permission(&self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    fn schedule_one_shot(
        &self,
        _fire_at: DateTime<Utc>,
        _payload: ReminderPayload,
    ) -> Result<ReminderHandle, SchedulingError> {
        Err(SchedulingError::PermissionDenied)
    }
}

pub fn plan_reminder(
    task: &Task,
    now: DateTime<Utc>,
    template: &ReminderTemplate,
) -> Option<ReminderRequest> {
    if task.due_at <= now {
        return None;
    }
    Some(ReminderRequest {
        fire_at: task.due_at,
        payload: template.payload_for(task),
    })
}
