//! Terminal output for the `run`, `info` and `init` commands
//!
//! Uses `cliclack` in an interactive terminal and plain `[OK]`-style lines
//! in CI and when piped. `env` and `records` print JSON directly and never
//! go through this module.

mod context;
mod progress;
mod report;

pub use context::UiContext;
pub use progress::RunProgress;
pub use report::{command_table, created, field, heading, path_field};
