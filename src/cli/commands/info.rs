//! Info command - version, platform and resolved paths for bug reports

use crate::error::HaetaeResult;
use crate::store::PACKAGE_VERSION;
use crate::tracker::Tracker;
use crate::ui::{self, UiContext};
use std::path::Path;

/// Execute the info command
pub async fn execute(tracker: &Tracker, store: Option<&Path>) -> HaetaeResult<()> {
    let ctx = UiContext::detect();
    let config = tracker.config();

    ui::heading(&ctx, "Haetae");
    ui::field(&ctx, "version", PACKAGE_VERSION);
    ui::field(
        &ctx,
        "platform",
        format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
    );

    ui::heading(&ctx, "Paths");
    ui::path_field(&ctx, "config", &config.config_file);
    ui::path_field(&ctx, "store", tracker.store_file(store));

    ui::heading(&ctx, "Commands");
    ui::command_table(&ctx, config);

    Ok(())
}
