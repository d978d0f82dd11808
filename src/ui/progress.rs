//! Spinner shown while a command's producers run

use super::context::UiContext;
use crate::store::MergeAction;
use console::style;
use std::path::Path;
use std::time::{Duration, Instant};

/// Progress of one `haetae run`, ending in a line describing the merge
pub struct RunProgress {
    command: String,
    started: Instant,
    spinner: Option<cliclack::ProgressBar>,
}

impl RunProgress {
    pub fn start(ctx: &UiContext, command: &str) -> Self {
        let message = format!("Running {}", command);
        let spinner = if ctx.use_fancy_output() {
            let spinner = cliclack::spinner();
            spinner.start(&message);
            Some(spinner)
        } else {
            println!("{} {}", style("...").dim(), message);
            None
        };

        Self {
            command: command.to_string(),
            started: Instant::now(),
            spinner,
        }
    }

    /// Report where the record went
    pub fn finish(self, action: MergeAction, store_file: &Path) {
        let line = format!(
            "{}: {} in {} ({})",
            self.command,
            action_text(action),
            store_file.display(),
            format_elapsed(self.started.elapsed())
        );
        match self.spinner {
            Some(spinner) => spinner.stop(line),
            None => println!("{} {}", style("[OK]").green(), line),
        }
    }

    /// Report a failed run; the error itself is printed by the caller
    pub fn fail(self) {
        let line = format!(
            "{} failed after {}, store left unchanged",
            self.command,
            format_elapsed(self.started.elapsed())
        );
        match self.spinner {
            Some(spinner) => spinner.error(line),
            None => println!("{} {}", style("[FAIL]").red(), line),
        }
    }
}

/// Human-readable merge outcome, e.g. `replaced record #0`
fn action_text(action: MergeAction) -> String {
    match action {
        MergeAction::Replaced(index) => format!("replaced record #{}", index),
        MergeAction::Appended(index) => format!("appended record #{}", index),
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}
