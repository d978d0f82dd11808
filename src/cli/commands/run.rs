//! Run command - track a command and persist its record

use crate::cli::args::RunArgs;
use crate::error::HaetaeResult;
use crate::tracker::Tracker;
use crate::ui::{RunProgress, UiContext};
use std::path::Path;

/// Execute the run command
pub async fn execute(args: RunArgs, tracker: &Tracker, store: Option<&Path>) -> HaetaeResult<()> {
    // Undeclared names fail before any progress output
    tracker.config().command(&args.name)?;

    let progress = RunProgress::start(&UiContext::detect(), &args.name);
    match tracker.track(&args.name, store).await {
        Ok(tracked) => {
            progress.finish(tracked.action, tracker.store_file(store));
            Ok(())
        }
        Err(e) => {
            progress.fail();
            Err(e)
        }
    }
}
