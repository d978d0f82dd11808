//! Store file persistence

use crate::cache::{CacheKey, Memo};
use crate::error::{HaetaeError, HaetaeResult};
use crate::store::state::{Store, PACKAGE_VERSION};
use semver::Version;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Factory for the store used when no store file exists yet
///
/// The `id` takes part in the read cache key, so two fallbacks with
/// different factories must use different ids.
#[derive(Debug, Clone, Copy)]
pub struct Fallback {
    id: &'static str,
    factory: fn() -> Store,
}

impl Fallback {
    pub const fn new(id: &'static str, factory: fn() -> Store) -> Self {
        Self { id, factory }
    }

    /// Empty store stamped with the current version
    pub const fn fresh() -> Self {
        Self::new("fresh", Store::new)
    }

}

impl Default for Fallback {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Reads and writes store files, memoizing reads until the next save
pub struct StoreRepository {
    cache: Memo<Arc<Store>>,
}

impl StoreRepository {
    pub fn new() -> Self {
        Self {
            cache: Memo::new("store"),
        }
    }

    /// Load the store at `filename`
    ///
    /// A missing file yields the fallback store. A file that exists but is
    /// not a valid store is an error.
    pub async fn get_store(&self, filename: &Path, fallback: &Fallback) -> HaetaeResult<Arc<Store>> {
        let key = CacheKey::new("store", &(filename, fallback.id))?;
        self.cache
            .get_or_try_insert_with(key, || async {
                read_store(filename, fallback).await.map(Arc::new)
            })
            .await
    }

    /// Overwrite `filename` with `store`, then drop every cached read
    ///
    /// The document is written to a sibling temporary file and renamed into
    /// place, so readers see either the old or the new store.
    pub async fn save_store(&self, filename: &Path, store: &Store) -> HaetaeResult<()> {
        let mut content = serde_json::to_string_pretty(store)
            .map_err(|e| HaetaeError::serialization("store", e))?;
        content.push('\n');

        if let Some(parent) = filename.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                HaetaeError::io(format!("creating store directory {}", parent.display()), e)
            })?;
        }

        let temp = temp_path(filename);
        fs::write(&temp, content)
            .await
            .map_err(|e| HaetaeError::io(format!("writing store file {}", temp.display()), e))?;

        if let Err(e) = fs::rename(&temp, filename).await {
            let _ = fs::remove_file(&temp).await;
            return Err(HaetaeError::io(
                format!("replacing store file {}", filename.display()),
                e,
            ));
        }

        self.cache.invalidate_all();
        info!("Store saved to {}", filename.display());
        Ok(())
    }
}

impl Default for StoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_store(filename: &Path, fallback: &Fallback) -> HaetaeResult<Store> {
    let content = match fs::read_to_string(filename).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(
                "Store file {} not found, using {} fallback",
                filename.display(),
                fallback.id
            );
            return Ok((fallback.factory)());
        }
        Err(e) => {
            return Err(HaetaeError::io(
                format!("reading store file {}", filename.display()),
                e,
            ))
        }
    };

    let store: Store = serde_json::from_str(&content).map_err(|e| HaetaeError::StoreParse {
        path: filename.to_path_buf(),
        source: e,
    })?;

    check_version(filename, &store);
    debug!(
        "Loaded store {} ({} commands)",
        filename.display(),
        store.commands.len()
    );
    Ok(store)
}

/// Warn when a newer haetae wrote the store; stores are never migrated
fn check_version(filename: &Path, store: &Store) {
    let (Ok(stored), Ok(current)) = (
        Version::parse(&store.version),
        Version::parse(PACKAGE_VERSION),
    ) else {
        warn!(
            "Store {} has unrecognized version {:?}",
            filename.display(),
            store.version
        );
        return;
    };

    if stored > current {
        warn!(
            "Store {} was written by haetae {}, this is {}",
            filename.display(),
            stored,
            current
        );
    }
}

fn temp_path(filename: &Path) -> PathBuf {
    let name = filename
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    filename.with_file_name(format!(".{}.tmp", name))
}
