//! Configuration schema for haetae
//!
//! Configuration lives in `haetae.config.toml`, usually at the project root.
//! A [`ConfigSource`](super::source::ConfigSource) turns it into a
//! [`PreConfig`]; [`configure`](super::configure) validates that and fills in
//! defaults to give a [`Config`].

use crate::error::{HaetaeError, HaetaeResult};
use crate::producer::{Invocation, Producer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file as written on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Store file location: absolute, or relative to the config file's directory.
    /// A directory gets `haetae.store.json` appended.
    #[serde(alias = "storeFile", skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,

    /// Commands by name
    pub commands: BTreeMap<String, CommandEntry>,
}

/// One `[commands.<name>]` table
///
/// `run` and `env` stay untyped here so a wrong type is reported as a
/// validation error naming the command, not as a bare TOML parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<toml::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<toml::Value>,
}

/// Parse a `run`/`env` value into a process invocation
///
/// Accepts a non-empty string (shell script) or a non-empty array of strings
/// (argv).
pub fn parse_invocation(value: &toml::Value) -> Result<Invocation, String> {
    const EXPECTED: &str = "It should be a command: a string or an array of strings";

    match value {
        toml::Value::String(script) if !script.trim().is_empty() => {
            Ok(Invocation::Shell(script.clone()))
        }
        toml::Value::String(_) => Err(format!("The command is empty. {}", EXPECTED)),
        toml::Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(Invocation::Argv)
            .ok_or_else(|| format!("Found a non-string argument. {}", EXPECTED)),
        toml::Value::Array(_) => Err(format!("The argument list is empty. {}", EXPECTED)),
        other => Err(format!("Found a {}. {}", other.type_str(), EXPECTED)),
    }
}

/// Command table as yielded by a config source, before defaults
#[derive(Clone, Default)]
pub struct PreConfig {
    pub commands: BTreeMap<String, PreCommand>,
    pub store_file: Option<String>,
}

/// A command whose producers may still be missing
#[derive(Clone, Default)]
pub struct PreCommand {
    pub run: Option<Arc<dyn Producer>>,
    pub env: Option<Arc<dyn Producer>>,
}

impl PreCommand {
    pub fn new(run: Arc<dyn Producer>) -> Self {
        Self {
            run: Some(run),
            env: None,
        }
    }

    pub fn with_env(mut self, env: Arc<dyn Producer>) -> Self {
        self.env = Some(env);
        self
    }
}

/// Fully resolved configuration
#[derive(Clone)]
pub struct Config {
    /// Absolute path of the config file this came from
    pub config_file: PathBuf,

    /// Absolute store file path, always ending in a `.json` file name
    pub store_file: PathBuf,

    pub commands: BTreeMap<String, CommandDef>,
}

impl Config {
    /// Look up a command by name
    pub fn command(&self, name: &str) -> HaetaeResult<&CommandDef> {
        self.commands
            .get(name)
            .ok_or_else(|| HaetaeError::CommandNotFound(name.to_string()))
    }

    /// Directory containing the config file
    pub fn config_dir(&self) -> &Path {
        self.config_file.parent().unwrap_or_else(|| Path::new("/"))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("config_file", &self.config_file)
            .field("store_file", &self.store_file)
            .field("commands", &self.commands)
            .finish()
    }
}

/// A command with both producers in place
#[derive(Clone)]
pub struct CommandDef {
    pub run: Arc<dyn Producer>,
    pub env: Arc<dyn Producer>,
}

impl fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("run", &self.run.describe())
            .field("env", &self.env.describe())
            .finish()
    }
}
