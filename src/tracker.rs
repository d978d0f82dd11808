//! Per-invocation context tying config, producers and the store together
//!
//! A [`Tracker`] is built from one resolved config. Every operation takes the
//! command name explicitly; there is no "current command".

use crate::config::Config;
use crate::error::HaetaeResult;
use crate::pipeline::ExecutionPipeline;
use crate::store::{
    get_record, get_records, merge_record, Fallback, MergeAction, Record, Store, StoreRepository,
};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Result of [`Tracker::track`]
#[derive(Debug, Clone)]
pub struct Tracked {
    /// Store as written to disk
    pub store: Store,
    /// Whether the record replaced an earlier one or was appended
    pub action: MergeAction,
}

pub struct Tracker {
    config: Arc<Config>,
    pipeline: ExecutionPipeline,
    stores: StoreRepository,
}

impl Tracker {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            pipeline: ExecutionPipeline::new(config.clone()),
            stores: StoreRepository::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Store path to use: the override if given, else the configured one
    pub fn store_file<'a>(&'a self, filename: Option<&'a Path>) -> &'a Path {
        filename.unwrap_or(&self.config.store_file)
    }

    /// Load the store, or a fresh one if the file does not exist yet
    pub async fn load_store(&self, filename: Option<&Path>) -> HaetaeResult<Arc<Store>> {
        self.stores
            .get_store(self.store_file(filename), &Fallback::fresh())
            .await
    }

    pub async fn invoke_env(&self, command: &str) -> HaetaeResult<Value> {
        self.pipeline.invoke_env(command).await
    }

    pub async fn invoke_run(&self, command: &str) -> HaetaeResult<Map<String, Value>> {
        self.pipeline.invoke_run(command).await
    }

    pub async fn map_record(&self, command: &str, time: Option<String>) -> HaetaeResult<Record> {
        self.pipeline.map_record(command, time).await
    }

    /// All records of `command` in `store`
    pub fn records<'s>(&self, command: &str, store: &'s Store) -> Option<&'s [Record]> {
        get_records(command, store)
    }

    /// Record of `command` matching `env`, or the command's current env
    pub async fn record(
        &self,
        command: &str,
        env: Option<&Value>,
        store: &Store,
    ) -> HaetaeResult<Option<Record>> {
        let current;
        let env = match env {
            Some(env) => env,
            None => {
                current = self.invoke_env(command).await?;
                &current
            }
        };
        Ok(get_record(command, env, store)?.cloned())
    }

    /// New store with `record` merged in; builds the record from the
    /// command's producers when none is given
    pub async fn map_store(
        &self,
        command: &str,
        store: &Store,
        record: Option<Record>,
    ) -> HaetaeResult<(Store, MergeAction)> {
        let record = match record {
            Some(record) => record,
            None => self.map_record(command, None).await?,
        };
        merge_record(command, store, record)
    }

    pub async fn save_store(&self, filename: Option<&Path>, store: &Store) -> HaetaeResult<()> {
        self.stores.save_store(self.store_file(filename), store).await
    }

    /// Run `command` and persist its record
    ///
    /// Order: read store, invoke env and run, merge, write. Any failure
    /// before the write leaves the store file as it was.
    pub async fn track(&self, command: &str, filename: Option<&Path>) -> HaetaeResult<Tracked> {
        self.config.command(command)?;

        let store = self.load_store(filename).await?;
        let (store, action) = self.map_store(command, &store, None).await?;
        self.save_store(filename, &store).await?;

        info!("Tracked {}: {:?}", command, action);
        Ok(Tracked { store, action })
    }
}
