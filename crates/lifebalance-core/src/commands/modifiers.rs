use anyhow::Context;
use chrono::{
  DateTime,
  Utc
};
use tracing::{
  instrument,
  warn
};

use crate::config::Config;
use crate::datetime::parse_date_expr;
use crate::registry;
use crate::task::TaskDraft;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Mod {
  Category(String),
  Priority(String),
  Due(DateTime<Utc>)
}

/// Splits `add` arguments into title
/// words and `key:value` modifiers.
/// Everything after `--` is title text.
#[instrument(skip(args, now))]
pub(crate) fn parse_title_and_mods(
  args: &[String],
  now: DateTime<Utc>
) -> anyhow::Result<(String, Vec<Mod>)>
{
  let mut title_parts = Vec::new();
  let mut mods = Vec::new();

  let mut literal = false;
  for arg in args {
    if !literal && arg == "--" {
      literal = true;
      continue;
    }

    if !literal
      && let Some(one_mod) =
        parse_one_mod(arg, now)?
    {
      mods.push(one_mod);
      continue;
    }

    title_parts.push(arg.clone());
  }

  Ok((title_parts.join(" "), mods))
}

fn parse_one_mod(
  tok: &str,
  now: DateTime<Utc>
) -> anyhow::Result<Option<Mod>> {
  let Some((key, value)) =
    tok.split_once(':')
  else {
    return Ok(None);
  };

  let key = key.to_ascii_lowercase();

  match key.as_str() {
    | "cat" | "category" => {
      Ok(Some(Mod::Category(
        value.trim().to_ascii_lowercase()
      )))
    }
    | "pri" | "priority" => {
      Ok(Some(Mod::Priority(
        value.trim().to_ascii_lowercase()
      )))
    }
    | "due" => {
      Ok(Some(Mod::Due(
        parse_date_expr(value, now)?
      )))
    }
    | _ => Ok(None)
  }
}

/// Builds a draft from the parsed
/// title and modifiers, filling gaps
/// from the `default.*` config keys.
pub(crate) fn build_draft(
  cfg: &Config,
  title: String,
  mods: &[Mod],
  now: DateTime<Utc>
) -> anyhow::Result<TaskDraft> {
  let explicit_due =
    mods.iter().rev().find_map(|m| {
      match m {
        | Mod::Due(dt) => Some(*dt),
        | _ => None
      }
    });
  let due = match (
    explicit_due,
    cfg.get("default.due")
  ) {
    | (Some(dt), _) => dt,
    | (None, Some(expr)) => {
      parse_date_expr(&expr, now)
        .context(
          "invalid default.due in \
           config"
        )?
    }
    | (None, None) => now
  };
  let mut draft = TaskDraft::new(
    title, due
  )
  .category(
    cfg
      .get("default.category")
      .unwrap_or_else(|| {
        registry::DEFAULT_CATEGORY_ID
          .to_string()
      })
  )
  .priority(
    cfg
      .get("default.priority")
      .unwrap_or_else(|| {
        registry::DEFAULT_PRIORITY_ID
          .to_string()
      })
  );

  for one_mod in mods {
    match one_mod {
      | Mod::Category(id) => {
        draft.category_id = id.clone();
      }
      | Mod::Priority(id) => {
        draft.priority_id = id.clone();
      }
      | Mod::Due(dt) => {
        draft.due_at = *dt;
      }
    }
  }

  if !registry::is_known_category(
    &draft.category_id
  ) {
    warn!(
      category = %draft.category_id,
      "unknown category; it will show as general"
    );
  }
  if !registry::is_known_priority(
    &draft.priority_id
  ) {
    warn!(
      priority = %draft.priority_id,
      "unknown priority; it will show as medium"
    );
  }

  Ok(draft)
}
