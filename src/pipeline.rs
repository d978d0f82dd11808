//! Producer invocation and record assembly

use crate::cache::{CacheKey, Memo};
use crate::config::Config;
use crate::error::{HaetaeError, HaetaeResult};
use crate::store::{now_iso, Record};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Keys filled in by haetae; a run producer may not return them
pub const RESERVED_KEYS: [&str; 2] = ["time", "env"];

/// Invokes a config's producers and builds candidate records
pub struct ExecutionPipeline {
    config: Arc<Config>,
    env_cache: Memo<Value>,
}

impl ExecutionPipeline {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            env_cache: Memo::new("env"),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current env of `command`, produced at most once per pipeline
    pub async fn invoke_env(&self, command: &str) -> HaetaeResult<Value> {
        let def = self.config.command(command)?;
        let key = CacheKey::new("env", &(&self.config.config_file, command))?;

        self.env_cache
            .get_or_try_insert_with(key, || async {
                debug!("Invoking env of {}: {}", command, def.env.describe());
                def.env.produce().await
            })
            .await
    }

    /// Run `command` and return its output fields
    ///
    /// The output must be a JSON object without reserved keys.
    pub async fn invoke_run(&self, command: &str) -> HaetaeResult<Map<String, Value>> {
        let def = self.config.command(command)?;
        debug!("Invoking run of {}: {}", command, def.run.describe());

        let fields = match def.run.produce().await? {
            Value::Object(fields) => fields,
            other => {
                return Err(HaetaeError::ProducerOutput {
                    producer: format!("commands.{}.run", command),
                    reason: format!("expected a JSON object, got {}", json_kind(&other)),
                })
            }
        };

        if let Some(key) = RESERVED_KEYS.iter().find(|key| fields.contains_key(**key)) {
            return Err(HaetaeError::ReservedKey {
                command: command.to_string(),
                key: (*key).to_string(),
            });
        }

        Ok(fields)
    }

    /// Build a candidate record: `{time, env, ...run output}`
    ///
    /// `time` defaults to now.
    pub async fn map_record(&self, command: &str, time: Option<String>) -> HaetaeResult<Record> {
        let env = self.invoke_env(command).await?;
        let data = self.invoke_run(command).await?;
        Ok(Record::new(time.unwrap_or_else(now_iso), env, data))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
