//! Configuration sources
//!
//! The resolver never looks inside a config file itself; it asks a
//! [`ConfigSource`] for a typed command table. [`TomlConfigSource`] reads
//! `haetae.config.toml`; [`StaticConfigSource`] serves a table built in code.

use crate::config::schema::{parse_invocation, ConfigFile, PreCommand, PreConfig};
use crate::error::{HaetaeError, HaetaeResult};
use crate::producer::{ProcessProducer, Producer};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Something that yields a command table for a config path
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Load the command table for the config at `path` (absolute)
    async fn load(&self, path: &Path) -> HaetaeResult<PreConfig>;
}

/// Reads TOML config files; producers become processes run from the
/// config file's directory
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlConfigSource;

impl TomlConfigSource {
    /// Parse config file content
    pub fn parse(path: &Path, content: &str) -> HaetaeResult<PreConfig> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| HaetaeError::invalid_config(path, e.to_string()))?;

        let cwd = path.parent().unwrap_or_else(|| Path::new("."));
        let mut pre = PreConfig {
            store_file: file.store_file,
            ..PreConfig::default()
        };

        for (name, entry) in file.commands {
            let producer = |kind: &str, value: &toml::Value| -> HaetaeResult<Arc<dyn Producer>> {
                let label = format!("commands.{}.{}", name, kind);
                let invocation = parse_invocation(value).map_err(|reason| {
                    HaetaeError::invalid_config(path, format!("{} is invalid. {}", label, reason))
                })?;
                Ok(Arc::new(ProcessProducer::new(label, invocation, cwd)))
            };

            let command = PreCommand {
                run: entry.run.as_ref().map(|v| producer("run", v)).transpose()?,
                env: entry.env.as_ref().map(|v| producer("env", v)).transpose()?,
            };
            pre.commands.insert(name, command);
        }

        Ok(pre)
    }
}

#[async_trait]
impl ConfigSource for TomlConfigSource {
    async fn load(&self, path: &Path) -> HaetaeResult<PreConfig> {
        debug!("Reading config {}", path.display());
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| HaetaeError::io(format!("reading config from {}", path.display()), e))?;

        Self::parse(path, &content)
    }
}

/// Serves the same command table for every path
#[derive(Clone, Default)]
pub struct StaticConfigSource {
    config: PreConfig,
}

impl StaticConfigSource {
    pub fn new(config: PreConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn load(&self, _path: &Path) -> HaetaeResult<PreConfig> {
        Ok(self.config.clone())
    }
}
