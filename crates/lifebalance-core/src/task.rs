use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::{self, Category, Priority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// First 8 hex digits, enough to address a task from the command session.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let prefix = prefix.trim().to_ascii_lowercase().replace('-', "");
        !prefix.is_empty() && self.0.simple().to_string().starts_with(&prefix)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Input for [`crate::store::TaskStore::add_task`].
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub due_at: DateTime<Utc>,
    pub category_id: String,
    pub priority_id: String,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, due_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            due_at,
            category_id: registry::DEFAULT_CATEGORY_ID.to_string(),
            priority_id: registry::DEFAULT_PRIORITY_ID.to_string(),
        }
    }

    pub fn category(mut self, id: impl Into<String>) -> Self {
        self.category_id = id.into();
        self
    }

    pub fn priority(mut self, id: impl Into<String>) -> Self {
        self.priority_id = id.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    pub title: String,

    pub due_at: DateTime<Utc>,

    pub category_id: String,

    pub priority_id: String,

    #[serde(default)]
    pub done: bool,

    pub created_at: DateTime<Utc>,
}

impl Task {
    pub(crate) fn from_draft(draft: TaskDraft, title: String, now: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::new(),
            title,
            due_at: draft.due_at,
            category_id: draft.category_id,
            priority_id: draft.priority_id,
            done: false,
            created_at: now,
        }
    }

    pub fn category(&self) -> &'static Category {
        registry::category(&self.category_id)
    }

    pub fn priority(&self) -> &'static Priority {
        registry::priority(&self.priority_id)
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.done && self.due_at < now
    }
}

#[cfg(test)]
mod tests {
    use super::TaskId;

    #[test]
    fn prefix_matching_ignores_case_and_hyphens() {
        let id: TaskId = "67e55044-10b1-426f-9247-bb680e5fe0c8"
            .parse()
            .expect("valid uuid");
        assert!(id.matches_prefix("67E55044"));
        assert!(id.matches_prefix("67e55044-10b1"));
        assert!(!id.matches_prefix("67e55045"));
        assert!(!id.matches_prefix("  "));
        assert_eq!(id.short(), "67e55044");
    }
}
