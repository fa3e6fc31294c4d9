use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

use crate::reminder::{
  DEFAULT_REMINDER_BODY,
  DEFAULT_REMINDER_TITLE,
  ReminderTemplate
};

const RC_ENV_VAR: &str = "LIFEBALANCERC";
const RC_FILE_NAME: &str =
  ".lifebalancerc";

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let mut map = HashMap::new();
    for (k, v) in [
      ("color", "on"),
      ("reminders", "on"),
      (
        "reminder.title",
        DEFAULT_REMINDER_TITLE
      ),
      (
        "reminder.body",
        DEFAULT_REMINDER_BODY
      ),
      ("notify.sound", "off"),
      (
        "default.category",
        crate::registry::DEFAULT_CATEGORY_ID
      ),
      (
        "default.priority",
        crate::registry::DEFAULT_PRIORITY_ID
      ),
      ("default.due", "now")
    ] {
      map.insert(
        k.to_string(),
        v.to_string()
      );
    }

    Self {
      map,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let rc = resolve_rc_path(
      rc_override
    )?;
    if let Some(path) = rc {
      info!(rc = %path.display(), "loading rc file");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no rc file found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self
      .map
      .get(key)
      .map(|v| parse_bool(v))
  }

  pub fn reminders_enabled(
    &self
  ) -> bool {
    self
      .get_bool("reminders")
      .unwrap_or(true)
  }

  pub fn notify_sound(&self) -> bool {
    self
      .get_bool("notify.sound")
      .unwrap_or(false)
  }

  pub fn reminder_template(
    &self
  ) -> ReminderTemplate {
    let defaults =
      ReminderTemplate::default();
    ReminderTemplate {
      title: self
        .get("reminder.title")
        .unwrap_or(defaults.title),
      body:  self
        .get("reminder.body")
        .unwrap_or(defaults.body)
    }
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if self
          .loaded_files
          .contains(&include_path)
        {
          warn!(include = %include_path.display(), "include cycle; skipping");
        } else if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) =
    std::env::var(RC_ENV_VAR)
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory; skipping rc file"
    );
    return Ok(None);
  };
  let candidate =
    home.join(RC_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::Config;

  #[test]
  fn defaults_without_rc_file() {
    let cfg = Config::default();
    assert!(cfg.reminders_enabled());
    assert!(!cfg.notify_sound());
    assert_eq!(
      cfg.reminder_template().body,
      "Time to do: {title}"
    );
    assert_eq!(
      cfg
        .get("default.category")
        .as_deref(),
      Some("general")
    );
  }

  #[test]
  fn loads_file_with_comments_and_includes()
  {
    let dir = tempdir().expect("tempdir");
    let extra = dir.path().join("extra");
    fs::write(
      &extra,
      "notify.sound = yes\n"
    )
    .expect("write include");
    let rc = dir.path().join("rc");
    fs::write(
      &rc,
      "# reminders\nreminder.title = \
       Wake up # trailing\ninclude \
       extra\ndefault.priority=high\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(rc.as_path()))
      .expect("load rc");
    assert_eq!(
      cfg.reminder_template().title,
      "Wake up"
    );
    assert!(cfg.notify_sound());
    assert_eq!(
      cfg
        .get("default.priority")
        .as_deref(),
      Some("high")
    );
    assert_eq!(cfg.loaded_files.len(), 2);
  }

  #[test]
  fn invalid_line_reports_location() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("rc");
    fs::write(&rc, "color=on\nbogus\n")
      .expect("write rc");

    let err = Config::load(Some(rc.as_path()))
      .expect_err("bogus line");
    assert!(
      err.to_string().contains(":2:")
    );
  }

  #[test]
  fn overrides_strip_rc_prefix() {
    let mut cfg = Config::default();
    cfg.apply_overrides([(
      "rc.reminders".to_string(),
      "off".to_string()
    )]);
    assert!(!cfg.reminders_enabled());
  }
}
