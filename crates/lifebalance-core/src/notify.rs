//! Reminder delivery on a tokio runtime.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::reminder::{
    NotificationPermission, ReminderHandle, ReminderPayload, ReminderScheduler, SchedulingError,
};

/// Where fired reminders end up.
pub trait NotificationSink: Send + Sync + 'static {
    fn deliver(&self, payload: &ReminderPayload) -> anyhow::Result<()>;
}

/// Prints fired reminders on stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSink {
    pub sound: bool,
}

impl NotificationSink for TerminalSink {
    fn deliver(&self, payload: &ReminderPayload) -> anyhow::Result<()> {
        let mut err = io::stderr().lock();
        let bell = if self.sound && io::stderr().is_terminal() {
            "\x07"
        } else {
            ""
        };
        writeln!(err, "{bell}[reminder] {}: {}", payload.title, payload.body)?;
        err.flush()?;
        Ok(())
    }
}

/// Spawns one detached timer task per reminder.
pub struct TokioScheduler {
    handle: Handle,
    sink: Arc<dyn NotificationSink>,
}

impl TokioScheduler {
    pub fn new(handle: Handle, sink: Arc<dyn NotificationSink>) -> Self {
        Self { handle, sink }
    }
}

impl ReminderScheduler for TokioScheduler {
    fn request_permission(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    fn schedule_one_shot(
        &self,
        fire_at: DateTime<Utc>,
        payload: ReminderPayload,
    ) -> Result<ReminderHandle, SchedulingError> {
        let delay = (fire_at - Utc::now())
            .to_std()
            .unwrap_or_default();
        let handle = ReminderHandle::new();
        let sink = Arc::clone(&self.sink);
        let started = Arc::new(AtomicBool::new(false));
        let polled = Arc::clone(&started);

        debug!(%fire_at, delay_ms = delay.as_millis() as u64, ?handle, "spawning reminder timer");
        let join = self.handle.spawn(async move {
            polled.store(true, Ordering::Release);
            tokio::time::sleep(delay).await;
            info!(?handle, title = %payload.title, "reminder fired");
            if let Err(err) = sink.deliver(&payload) {
                warn!(?handle, error = %err, "failed to deliver reminder");
            }
        });

        // A shut-down runtime cancels the task before it is ever polled.
        if join.is_finished() && !started.load(Ordering::Acquire) {
            return Err(SchedulingError::RuntimeUnavailable);
        }

        Ok(handle)
    }
}
