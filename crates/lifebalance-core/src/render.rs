use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::{DateTime, Local, Utc};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::datetime::format_local;
use crate::registry::{CATEGORIES, PRIORITIES};
use crate::stats::Stats;
use crate::task::Task;
use crate::views;

pub const EMPTY_LIST_MESSAGE: &str = "no activities";

pub struct Renderer<W: Write> {
    out: W,
    color: bool,
}

impl Renderer<io::Stdout> {
    pub fn stdout(cfg: &Config) -> anyhow::Result<Self> {
        let color = parse_color(cfg)? && io::stdout().is_terminal();
        Ok(Self {
            out: io::stdout(),
            color,
        })
    }
}

impl<W: Write> Renderer<W> {
    /// Renderer over an arbitrary writer; never emits colors.
    pub fn plain(out: W) -> Self {
        Self { out, color: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    #[tracing::instrument(skip(self, tasks, now), fields(count = tasks.len()))]
    pub fn print_task_table(&mut self, tasks: &[&Task], now: DateTime<Utc>) -> anyhow::Result<()> {
        if tasks.is_empty() {
            writeln!(self.out, "{EMPTY_LIST_MESSAGE}")?;
            return Ok(());
        }

        let headers = vec![
            "ID".to_string(),
            "Due".to_string(),
            "Category".to_string(),
            "Priority".to_string(),
            "Title".to_string(),
        ];

        let mut rows = Vec::with_capacity(tasks.len());
        for task in tasks {
            let view = views::annotate(task);
            let id = self.paint(&task.id.short(), "33");

            let due = format_local(task.due_at);
            let due = if task.is_overdue(now) {
                self.paint(&due, "31")
            } else {
                due
            };

            let category = format!("{} {}", view.category.emoji, view.category.name);
            let priority = self.paint(view.priority.name, priority_color_code(view.priority.id));

            rows.push(vec![id, due, category, priority, task.title.clone()]);
        }

        write_table(&mut self.out, headers, rows)?;
        Ok(())
    }

    pub fn print_stats(&mut self, stats: &Stats) -> anyhow::Result<()> {
        writeln!(self.out, "total      {}", stats.total)?;
        writeln!(self.out, "completed  {}", stats.completed)?;
        writeln!(self.out, "pending    {}", stats.pending)?;
        writeln!(self.out, "today      {}", stats.due_today)?;
        writeln!(self.out, "success    {}%", stats.completion_rate)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, task), fields(id = %task.id))]
    pub fn print_task_info(&mut self, task: &Task) -> anyhow::Result<()> {
        let view = views::annotate(task);
        writeln!(self.out, "id        {}", task.id)?;
        writeln!(self.out, "title     {}", task.title)?;
        writeln!(self.out, "status    {}", if task.done { "done" } else { "pending" })?;
        writeln!(self.out, "due       {}", format_local(task.due_at))?;
        writeln!(
            self.out,
            "category  {} {} ({})",
            view.category.emoji, view.category.name, task.category_id
        )?;
        writeln!(
            self.out,
            "priority  {} ({})",
            view.priority.name, task.priority_id
        )?;
        writeln!(self.out, "created   {}", format_local(task.created_at))?;
        Ok(())
    }

    pub fn print_categories(&mut self) -> anyhow::Result<()> {
        let headers = vec![
            "ID".to_string(),
            "Name".to_string(),
            "Icon".to_string(),
            "Color".to_string(),
        ];
        let rows = CATEGORIES
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    format!("{} {}", c.emoji, c.name),
                    c.icon.to_string(),
                    c.color.to_string(),
                ]
            })
            .collect();
        write_table(&mut self.out, headers, rows)
    }

    pub fn print_priorities(&mut self) -> anyhow::Result<()> {
        let headers = vec![
            "ID".to_string(),
            "Name".to_string(),
            "Icon".to_string(),
            "Color".to_string(),
        ];
        let rows = PRIORITIES
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    self.paint(p.name, priority_color_code(p.id)),
                    p.icon.to_string(),
                    p.color.to_string(),
                ]
            })
            .collect();
        write_table(&mut self.out, headers, rows)
    }

    pub fn print_clock(&mut self, now: DateTime<Local>) -> anyhow::Result<()> {
        writeln!(self.out, "{}", now.format("%A %Y-%m-%d %H:%M:%S"))?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn parse_color(cfg: &Config) -> anyhow::Result<bool> {
    let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
    match color_cfg.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        other => Err(anyhow!("invalid color setting: {other}")),
    }
}

fn priority_color_code(id: &str) -> &'static str {
    match id {
        "high" => "31",
        "low" => "32",
        _ => "33",
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
