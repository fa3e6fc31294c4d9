//! Static category and priority tables.
//!
//! Lookups are total: an id that is not in a table resolves to that table's
//! default entry instead of failing.

use serde::Serialize;
use tracing::debug;

pub const DEFAULT_CATEGORY_ID: &str = "general";
pub const DEFAULT_PRIORITY_ID: &str = "medium";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Priority {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

pub static CATEGORIES: [Category; 5] = [
    Category {
        id: "work",
        name: "Work",
        color: "#3b82f6",
        icon: "briefcase",
        emoji: "💼",
    },
    Category {
        id: "personal",
        name: "Personal",
        color: "#10b981",
        icon: "home",
        emoji: "🏠",
    },
    Category {
        id: "health",
        name: "Health",
        color: "#f59e0b",
        icon: "run",
        emoji: "🏃",
    },
    Category {
        id: "study",
        name: "Study",
        color: "#8b5cf6",
        icon: "book",
        emoji: "📚",
    },
    Category {
        id: DEFAULT_CATEGORY_ID,
        name: "General",
        color: "#6b7280",
        icon: "note",
        emoji: "📝",
    },
];

pub static PRIORITIES: [Priority; 3] = [
    Priority {
        id: "high",
        name: "High",
        color: "#ef4444",
        icon: "alert",
    },
    Priority {
        id: DEFAULT_PRIORITY_ID,
        name: "Medium",
        color: "#f59e0b",
        icon: "warning",
    },
    Priority {
        id: "low",
        name: "Low",
        color: "#10b981",
        icon: "checkmark",
    },
];

/// Returns the category for `id`, or the "general" entry when `id` is unknown.
pub fn category(id: &str) -> &'static Category {
    lookup_category(id).unwrap_or_else(|| {
        debug!(id, fallback = DEFAULT_CATEGORY_ID, "unknown category id");
        default_category()
    })
}

/// Returns the priority for `id`, or the "medium" entry when `id` is unknown.
pub fn priority(id: &str) -> &'static Priority {
    lookup_priority(id).unwrap_or_else(|| {
        debug!(id, fallback = DEFAULT_PRIORITY_ID, "unknown priority id");
        default_priority()
    })
}

pub fn is_known_category(id: &str) -> bool {
    lookup_category(id).is_some()
}

pub fn is_known_priority(id: &str) -> bool {
    lookup_priority(id).is_some()
}

pub fn default_category() -> &'static Category {
    &CATEGORIES[CATEGORIES.len() - 1]
}

pub fn default_priority() -> &'static Priority {
    &PRIORITIES[1]
}

fn lookup_category(id: &str) -> Option<&'static Category> {
    let id = id.trim();
    CATEGORIES.iter().find(|c| c.id.eq_ignore_ascii_case(id))
}

fn lookup_priority(id: &str) -> Option<&'static Priority> {
    let id = id.trim();
    PRIORITIES.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_resolves_to_general() {
        assert_eq!(category("gardening").id, "general");
        assert_eq!(category("").id, "general");
    }

    #[test]
    fn unknown_priority_resolves_to_medium() {
        assert_eq!(priority("urgent").id, "medium");
    }

    #[test]
    fn known_ids_resolve_case_insensitively() {
        assert_eq!(category("Study").emoji, "📚");
        assert_eq!(priority(" HIGH ").color, "#ef4444");
        assert!(is_known_category("work"));
        assert!(!is_known_priority("critical"));
    }

    #[test]
    fn defaults_match_declared_ids() {
        assert_eq!(default_category().id, DEFAULT_CATEGORY_ID);
        assert_eq!(default_priority().id, DEFAULT_PRIORITY_ID);
    }
}
