mod modifiers;

use std::io::Write;

use anyhow::anyhow;
use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::render::Renderer;
use crate::stats::Stats;
use crate::store::{TaskStore, ValidationError};
use crate::task::Task;
use crate::views;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Returns `Ok(None)` for an empty line.
    pub fn parse(tokens: Vec<String>) -> anyhow::Result<Option<Self>> {
        let mut iter = tokens.into_iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };

        let lowered = first.to_ascii_lowercase();
        let command = expand_command_abbrev(&lowered, &known_command_names())
            .ok_or_else(|| anyhow!("unknown command: {first} (try `help`)"))?;
        debug!(token = %first, expanded = %command, "resolved command token");

        Ok(Some(Self {
            command: command.to_string(),
            args: iter.collect(),
        }))
    }
}

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add",
        "done",
        "toggle",
        "list",
        "pending",
        "completed",
        "stats",
        "info",
        "categories",
        "priorities",
        "export",
        "clock",
        "help",
        "version",
        "quit",
        "exit",
    ]
}

pub fn expand_command_abbrev<'a>(token: &str, known: &[&'a str]) -> Option<&'a str> {
    if let Some(exact) = known.iter().copied().find(|name| *name == token) {
        return Some(exact);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(store, cfg, renderer, inv, now), fields(command = %inv.command))]
pub fn dispatch<W: Write>(
    store: &mut TaskStore,
    cfg: &Config,
    renderer: &mut Renderer<W>,
    inv: Invocation,
    now: DateTime<Utc>,
) -> anyhow::Result<Flow> {
    debug!(args = ?inv.args, "dispatching command");

    match inv.command.as_str() {
        "add" => cmd_add(store, cfg, renderer, &inv.args, now)?,
        "done" | "toggle" => cmd_toggle(store, renderer, &inv.args)?,
        "list" | "pending" => renderer.print_task_table(&views::pending(store.snapshot()), now)?,
        "completed" => renderer.print_task_table(&views::completed(store.snapshot()), now)?,
        "stats" => {
            let stats = Stats::compute(store.snapshot(), &now.with_timezone(&Local));
            renderer.print_stats(&stats)?;
        }
        "info" => {
            let task = resolve_task(store, &inv.args)?;
            renderer.print_task_info(task)?;
        }
        "categories" => renderer.print_categories()?,
        "priorities" => renderer.print_priorities()?,
        "export" => {
            let json = serde_json::to_string_pretty(store.snapshot())?;
            renderer.line(&json)?;
        }
        "clock" => renderer.print_clock(now.with_timezone(&Local))?,
        "help" => cmd_help(renderer)?,
        "version" => renderer.line(env!("CARGO_PKG_VERSION"))?,
        "quit" | "exit" => return Ok(Flow::Quit),
        other => return Err(anyhow!("unknown command: {other}")),
    }

    Ok(Flow::Continue)
}

fn cmd_add<W: Write>(
    store: &mut TaskStore,
    cfg: &Config,
    renderer: &mut Renderer<W>,
    args: &[String],
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let (title, mods) = modifiers::parse_title_and_mods(args, now)?;
    let draft = modifiers::build_draft(cfg, title, &mods, now)?;

    match store.add_task(draft, now) {
        Ok(task) => {
            info!(id = %task.id, "command add");
            renderer.line(&format!("added activity {} ({})", task.id.short(), task.title))
        }
        Err(ValidationError::EmptyTitle) => renderer.line("please enter an activity"),
    }
}

fn cmd_toggle<W: Write>(
    store: &mut TaskStore,
    renderer: &mut Renderer<W>,
    args: &[String],
) -> anyhow::Result<()> {
    let id = resolve_task(store, args)?.id;
    match store.toggle_done(id) {
        Some(true) => renderer.line(&format!("activity {} marked done", id.short())),
        Some(false) => renderer.line(&format!("activity {} marked pending", id.short())),
        None => Ok(()),
    }
}

fn resolve_task<'a>(store: &'a TaskStore, args: &[String]) -> anyhow::Result<&'a Task> {
    let prefix = args
        .first()
        .ok_or_else(|| anyhow!("an activity id is required"))?;
    store
        .find_by_prefix(prefix)
        .ok_or_else(|| anyhow!("no single activity matches id {prefix}"))
}

fn cmd_help<W: Write>(renderer: &mut Renderer<W>) -> anyhow::Result<()> {
    for line in [
        "add <title> [due:<when>] [cat:<category>] [pri:<priority>]",
        "done <id>           toggle an activity between pending and done",
        "pending | list      activities still to do, soonest first",
        "completed           finished activities, soonest first",
        "stats               totals and completion rate",
        "info <id>           details for one activity",
        "categories          known categories",
        "priorities          known priorities",
        "export              all activities as JSON",
        "clock               current local time",
        "quit                leave the session",
    ] {
        renderer.line(line)?;
    }
    Ok(())
}
