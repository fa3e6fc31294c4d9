//! Derived task lists. Nothing here holds state; every projection is
//! recomputed from the snapshot it is given.

use serde::Serialize;

use crate::registry::{Category, Priority};
use crate::task::Task;

/// A task paired with its resolved display metadata.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TaskView<'a> {
    pub task: &'a Task,
    pub category: &'static Category,
    pub priority: &'static Priority,
}

pub fn annotate(task: &Task) -> TaskView<'_> {
    TaskView {
        task,
        category: task.category(),
        priority: task.priority(),
    }
}

pub fn pending(snapshot: &[Task]) -> Vec<&Task> {
    sorted_by_due(snapshot, false)
}

pub fn completed(snapshot: &[Task]) -> Vec<&Task> {
    sorted_by_due(snapshot, true)
}

fn sorted_by_due(snapshot: &[Task], done: bool) -> Vec<&Task> {
    let mut out: Vec<&Task> = snapshot.iter().filter(|t| t.done == done).collect();
    // stable: equal due times keep insertion order
    out.sort_by_key(|t| t.due_at);
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::task::{TaskDraft, TaskId};

    fn build(specs: &[(i64, bool)]) -> Vec<Task> {
        let base = Utc
            .with_ymd_and_hms(2026, 5, 1, 8, 0, 0)
            .single()
            .expect("valid base");
        specs
            .iter()
            .enumerate()
            .map(|(idx, (hours, done))| {
                let draft = TaskDraft::new(format!("t{idx}"), base + Duration::hours(*hours));
                let title = draft.title.clone();
                let mut task = Task::from_draft(draft, title, base);
                task.done = *done;
                task
            })
            .collect()
    }

    #[test]
    fn projections_partition_the_snapshot() {
        let snapshot = build(&[(3, false), (1, true), (2, false), (0, true), (5, false)]);
        let p = pending(&snapshot);
        let c = completed(&snapshot);

        let p_ids: HashSet<TaskId> = p.iter().map(|t| t.id).collect();
        let c_ids: HashSet<TaskId> = c.iter().map(|t| t.id).collect();
        let all: HashSet<TaskId> = snapshot.iter().map(|t| t.id).collect();

        assert!(p_ids.is_disjoint(&c_ids));
        assert_eq!(p_ids.union(&c_ids).copied().collect::<HashSet<_>>(), all);
        assert!(p.iter().all(|t| !t.done));
        assert!(c.iter().all(|t| t.done));
    }

    #[test]
    fn projections_ascend_by_due_time() {
        let snapshot = build(&[(3, false), (-2, false), (7, true), (1, false), (4, true)]);
        for list in [pending(&snapshot), completed(&snapshot)] {
            assert!(list.windows(2).all(|w| w[0].due_at <= w[1].due_at));
        }
        let titles: Vec<_> = pending(&snapshot).iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, ["t1", "t3", "t0"]);
    }

    #[test]
    fn equal_due_times_keep_insertion_order() {
        let snapshot = build(&[(2, false), (1, false), (2, false), (2, false)]);
        let titles: Vec<_> = pending(&snapshot).iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, ["t1", "t0", "t2", "t3"]);
    }

    #[test]
    fn annotate_falls_back_for_unknown_ids() {
        let mut snapshot = build(&[(0, false)]);
        snapshot[0].category_id = "hobby".to_string();
        snapshot[0].priority_id = "asap".to_string();

        let view = annotate(&snapshot[0]);
        assert_eq!(view.category.id, "general");
        assert_eq!(view.priority.id, "medium");
    }
}
