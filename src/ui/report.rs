//! Reports for `info` and `init`

use super::context::UiContext;
use crate::config::Config;
use console::style;
use std::fmt::Display;
use std::path::Path;

pub fn heading(ctx: &UiContext, title: &str) {
    println!();
    if ctx.use_fancy_output() {
        cliclack::log::info(style(title).bold()).ok();
    } else {
        println!("{}", style(title).bold());
    }
}

pub fn field(ctx: &UiContext, key: &str, value: impl Display) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// A path row; files that do not exist yet are marked as such
pub fn path_field(ctx: &UiContext, key: &str, path: &Path) {
    let exists = path.exists();
    let note = if exists { "" } else { " (not created yet)" };

    if ctx.use_fancy_output() {
        let shown = style(path.display().to_string());
        let shown = if exists { shown.green() } else { shown.yellow() };
        println!("  {}: {}{}", style(key).dim(), shown, style(note).dim());
    } else {
        println!("  {}: {}{}", key, path.display(), note);
    }
}

/// One row per declared command with its producers
pub fn command_table(ctx: &UiContext, config: &Config) {
    if config.commands.is_empty() {
        field(ctx, "commands", "none declared");
        return;
    }
    for line in command_lines(config) {
        field(ctx, "command", line);
    }
}

/// Announce a freshly written config as the resolver sees it
pub fn created(ctx: &UiContext, config: &Config) {
    let message = format!("Created {}", config.config_file.display());
    if ctx.use_fancy_output() {
        cliclack::log::success(&message).ok();
    } else {
        println!("{} {}", style("[OK]").green(), message);
    }
    path_field(ctx, "store", &config.store_file);
    command_table(ctx, config);
}

fn command_lines(config: &Config) -> Vec<String> {
    config
        .commands
        .iter()
        .map(|(name, def)| {
            format!(
                "{} (run: {}, env: {})",
                name,
                def.run.describe(),
                def.env.describe()
            )
        })
        .collect()
}
