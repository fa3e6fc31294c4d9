use std::io::{BufRead, Write};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::cli::split_line;
use crate::commands::{self, Flow, Invocation};
use crate::config::Config;
use crate::render::Renderer;
use crate::store::TaskStore;

/// One interactive run of the tool: the store plus the settings that shape
/// how commands are interpreted.
pub struct Session {
    store: TaskStore,
    cfg: Config,
}

impl Session {
    pub fn new(store: TaskStore, cfg: Config) -> Self {
        Self { store, cfg }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Runs one tokenized command. Command errors are printed and the session
    /// carries on.
    pub fn execute<W: Write>(
        &mut self,
        tokens: Vec<String>,
        renderer: &mut Renderer<W>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Flow> {
        let outcome = Invocation::parse(tokens).and_then(|inv| match inv {
            Some(inv) => commands::dispatch(&mut self.store, &self.cfg, renderer, inv, now),
            None => Ok(Flow::Continue),
        });

        match outcome {
            Ok(flow) => Ok(flow),
            Err(err) => {
                warn!(error = %err, "command failed");
                renderer.line(&format!("error: {err:#}"))?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Reads commands line by line until EOF or `quit`.
    #[tracing::instrument(skip_all)]
    pub fn run_lines<R: BufRead, W: Write>(
        &mut self,
        input: R,
        renderer: &mut Renderer<W>,
    ) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line?;
            let tokens = split_line(&line);
            debug!(?tokens, "read session line");
            if self.execute(tokens, renderer, Utc::now())? == Flow::Quit {
                info!("session ended by command");
                return Ok(());
            }
        }
        info!("session ended at end of input");
        Ok(())
    }
}
