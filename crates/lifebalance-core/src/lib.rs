pub mod cli;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod notify;
pub mod registry;
pub mod reminder;
pub mod render;
pub mod session;
pub mod stats;
pub mod store;
pub mod task;
pub mod views;

use std::ffi::OsString;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{
  debug,
  info,
  warn
};

use crate::commands::Flow;
use crate::notify::{
  TerminalSink,
  TokioScheduler
};
use crate::reminder::{
  DisabledScheduler,
  NotificationPermission,
  ReminderScheduler
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting life balance session"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.rc_file.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let runtime =
    tokio::runtime::Builder::new_multi_thread()
      .worker_threads(1)
      .thread_name("reminders")
      .enable_time()
      .build()
      .context(
        "failed to start reminder \
         runtime"
      )?;

  let scheduler = build_scheduler(
    &cfg,
    runtime.handle().clone()
  );
  let mut renderer =
    render::Renderer::stdout(&cfg)?;
  let store =
    store::TaskStore::with_template(
      scheduler,
      cfg.reminder_template()
    );
  let mut session =
    session::Session::new(store, cfg);

  let initial: Vec<String> = cli
    .rest
    .into_iter()
    .map(|arg| {
      arg.to_string_lossy().to_string()
    })
    .collect();
  if !initial.is_empty()
    && session.execute(
      initial,
      &mut renderer,
      Utc::now()
    )? == Flow::Quit
  {
    return Ok(());
  }

  session.run_lines(
    std::io::stdin().lock(),
    &mut renderer
  )?;

  info!(
    tasks = session.store().len(),
    "done"
  );
  Ok(())
}

fn build_scheduler(
  cfg: &config::Config,
  handle: tokio::runtime::Handle
) -> Arc<dyn ReminderScheduler> {
  if !cfg.reminders_enabled() {
    info!(
      "reminders disabled by config"
    );
    return Arc::new(DisabledScheduler);
  }

  let scheduler: Arc<
    dyn ReminderScheduler
  > = Arc::new(TokioScheduler::new(
    handle,
    Arc::new(TerminalSink {
      sound: cfg.notify_sound()
    })
  ));

  match scheduler.request_permission() {
    | NotificationPermission::Granted => {
      debug!(
        "notification permission \
         granted"
      );
    }
    | NotificationPermission::Denied => {
      warn!(
        "notification permission \
         denied; reminders will not \
         fire"
      );
    }
  }
  scheduler
}
