use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub due_today: usize,
    /// Whole percent, 0 when there are no tasks.
    pub completion_rate: u32,
}

impl Stats {
    /// `due_today` compares calendar dates in `now`'s timezone.
    pub fn compute<Tz: TimeZone>(snapshot: &[Task], now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        let total = snapshot.len();
        let completed = snapshot.iter().filter(|t| t.done).count();
        let due_today = snapshot
            .iter()
            .filter(|t| t.due_at.with_timezone(&tz).date_naive() == today)
            .count();

        Self {
            total,
            completed,
            pending: total - completed,
            due_today,
            completion_rate: completion_rate(completed, total),
        }
    }
}

/// `round(100 * completed / total)` with halves rounded up.
fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (200 * completed + total) / (2 * total);
    u32::try_from(rate).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone, Utc};

    use super::*;
    use crate::task::TaskDraft;

    fn task(due: DateTime<Utc>, done: bool) -> Task {
        let draft = TaskDraft::new("x", due);
        let mut task = Task::from_draft(draft, "x".to_string(), due);
        task.done = done;
        task
    }

    #[test]
    fn empty_store_has_zero_rate() {
        let now = Utc::now();
        assert_eq!(Stats::compute(&[], &now), Stats::default());
    }

    #[test]
    fn half_done_is_fifty_percent() {
        let now = Utc
            .with_ymd_and_hms(2026, 4, 10, 12, 0, 0)
            .single()
            .expect("valid now");
        let tasks: Vec<Task> = [true, false, true, false]
            .into_iter()
            .map(|done| task(now, done))
            .collect();

        let stats = Stats::compute(&tasks, &now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completion_rate, 50);
    }

    #[test]
    fn rate_rounds_half_up() {
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(completion_rate(3, 3), 100);
    }

    #[test]
    fn due_today_uses_the_clock_timezone() {
        let bangkok = FixedOffset::east_opt(7 * 3600).expect("valid offset");
        let now = bangkok
            .with_ymd_and_hms(2026, 4, 10, 9, 0, 0)
            .single()
            .expect("valid now");
        let now_utc = now.with_timezone(&Utc);

        let tasks = vec![
            // 2026-04-10 06:30 local
            task(now_utc - Duration::minutes(150), false),
            // 2026-04-10 23:59 local
            task(now_utc + Duration::minutes(899), true),
            // 2026-04-11 00:00 local
            task(now_utc + Duration::hours(15), false),
            // 2026-04-09 23:00 local
            task(now_utc - Duration::hours(10), false),
        ];

        let stats = Stats::compute(&tasks, &now);
        assert_eq!(stats.due_today, 2);
        assert_eq!(stats.completion_rate, 25);
    }
}
