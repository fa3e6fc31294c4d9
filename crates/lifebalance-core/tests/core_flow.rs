use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use lifebalance_core::commands::Flow;
use lifebalance_core::config::Config;
use lifebalance_core::reminder::{
    DisabledScheduler, NotificationPermission, ReminderHandle, ReminderPayload, ReminderScheduler,
    SchedulingError,
};
use lifebalance_core::render::Renderer;
use lifebalance_core::session::Session;
use lifebalance_core::stats::Stats;
use lifebalance_core::store::TaskStore;
use lifebalance_core::task::TaskDraft;
use lifebalance_core::views;
use parking_lot::Mutex;

#[derive(Default)]
struct RecordingScheduler {
    requests: Mutex<Vec<(DateTime<Utc>, ReminderPayload)>>,
}

impl ReminderScheduler for RecordingScheduler {
    fn request_permission(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    fn schedule_one_shot(
        &self,
        fire_at: DateTime<Utc>,
        payload: ReminderPayload,
    ) -> Result<ReminderHandle, SchedulingError> {
        self.requests.lock().push((fire_at, payload));
        Ok(ReminderHandle::new())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0)
        .single()
        .expect("valid now")
}

#[test]
fn store_views_stats_and_reminders_together() {
    let scheduler = Arc::new(RecordingScheduler::default());
    let mut store = TaskStore::new(scheduler.clone());
    let now = now();

    let dentist = store
        .add_task(
            TaskDraft::new("Dentist", now + Duration::hours(3))
                .category("health")
                .priority("high"),
            now,
        )
        .expect("add dentist");
    let report = store
        .add_task(
            TaskDraft::new("Write report", now - Duration::hours(1)).category("work"),
            now,
        )
        .expect("add report");
    let hobby = store
        .add_task(
            TaskDraft::new("Paint", now + Duration::hours(1)).category("hobbies"),
            now,
        )
        .expect("add paint");
    assert!(store.add_task(TaskDraft::new("  ", now), now).is_err());

    assert_eq!(store.len(), 3);
    assert_eq!(scheduler.requests.lock().len(), 2);

    store.toggle_done(report.id);

    let pending: Vec<_> = views::pending(store.snapshot()).iter().map(|t| t.id).collect();
    let completed: Vec<_> = views::completed(store.snapshot()).iter().map(|t| t.id).collect();
    assert_eq!(pending, vec![hobby.id, dentist.id]);
    assert_eq!(completed, vec![report.id]);

    let paint = store.get(hobby.id).expect("paint exists");
    assert_eq!(views::annotate(paint).category.id, "general");

    let stats = Stats::compute(store.snapshot(), &now);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.due_today, 3);
    assert_eq!(stats.completion_rate, 33);
}

#[test]
fn session_commands_drive_the_store() {
    let store = TaskStore::new(Arc::new(DisabledScheduler));
    let mut session = Session::new(store, Config::default());
    let mut renderer = Renderer::plain(Vec::new());
    let now = now();

    let tokens = |line: &str| line.split_whitespace().map(str::to_string).collect::<Vec<_>>();

    session
        .execute(tokens("add morning run due:+1h cat:health"), &mut renderer, now)
        .expect("add");
    session
        .execute(tokens("add due:+2h"), &mut renderer, now)
        .expect("blank add is reported, not fatal");
    assert_eq!(session.store().len(), 1);

    let id = session.store().snapshot()[0].id.short();
    session
        .execute(tokens(&format!("done {id}")), &mut renderer, now)
        .expect("toggle");
    assert!(session.store().snapshot()[0].done);

    session
        .execute(tokens("sta"), &mut renderer, now)
        .expect("stats");
    session
        .execute(tokens("bogus"), &mut renderer, now)
        .expect("unknown command is reported, not fatal");
    let flow = session
        .execute(tokens("quit"), &mut renderer, now)
        .expect("quit");
    assert_eq!(flow, Flow::Quit);

    let output = String::from_utf8(renderer.into_inner()).expect("utf8 output");
    assert!(output.contains("added activity"));
    assert!(output.contains("please enter an activity"));
    assert!(output.contains("marked done"));
    assert!(output.contains("success    100%"));
    assert!(output.contains("error: unknown command: bogus"));
}

#[test]
fn huge_relative_due_is_reported_not_fatal() {
    let store = TaskStore::new(Arc::new(DisabledScheduler));
    let mut session = Session::new(store, Config::default());
    let mut renderer = Renderer::plain(Vec::new());

    for line in [["add", "run", "due:+100000000d"], ["add", "run", "due:-100000000d"]] {
        let flow = session
            .execute(line.map(str::to_string).to_vec(), &mut renderer, now())
            .expect("overflow is reported, not fatal");
        assert_eq!(flow, Flow::Continue);
    }
    assert!(session.store().is_empty());

    let output = String::from_utf8(renderer.into_inner()).expect("utf8 output");
    assert_eq!(output.matches("error: relative offset out of range").count(), 2);
}

#[test]
fn session_reads_lines_until_quit() {
    let store = TaskStore::new(Arc::new(DisabledScheduler));
    let mut session = Session::new(store, Config::default());
    let mut renderer = Renderer::plain(Vec::new());

    let input = "add \"stretch legs\" pri:low\npending\nquit\nadd never reached\n";
    session
        .run_lines(input.as_bytes(), &mut renderer)
        .expect("run lines");

    assert_eq!(session.store().len(), 1);
    let output = String::from_utf8(renderer.into_inner()).expect("utf8 output");
    assert!(output.contains("stretch legs"));
    assert!(output.contains("Low"));
}
