//! Haetae - incremental task runner
//!
//! Remembers, per command, the environment each run happened in and what the
//! run produced, so tooling can ask "has this already run in the current env?"

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod pipeline;
pub mod producer;
pub mod store;
pub mod tracker;
pub mod ui;

pub use error::{HaetaeError, HaetaeResult};
