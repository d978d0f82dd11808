//! Configuration management for haetae
//!
//! Resolution order for the config file:
//! 1. Explicit path (`--config`)
//! 2. `$HAETAE_CONFIG_FILE`
//! 3. `haetae.config.toml` in the current directory or any ancestor

pub mod schema;
pub mod source;

pub use schema::{CommandDef, Config, ConfigFile, PreCommand, PreConfig};
pub use source::{ConfigSource, StaticConfigSource, TomlConfigSource};

use crate::cache::{CacheKey, Memo};
use crate::error::{HaetaeError, HaetaeResult};
use crate::producer::EmptyEnv;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Conventional config file name
pub const DEFAULT_CONFIG_FILE: &str = "haetae.config.toml";

/// Conventional store file name
pub const DEFAULT_STORE_FILE: &str = "haetae.store.json";

/// Environment variable overriding config discovery
pub const CONFIG_ENV_VAR: &str = "HAETAE_CONFIG_FILE";

/// Inputs for locating the config file
#[derive(Debug, Clone)]
pub struct ConfigLocation {
    /// Explicitly given path (file or directory)
    pub explicit: Option<PathBuf>,

    /// Value of `$HAETAE_CONFIG_FILE`
    pub env_override: Option<PathBuf>,

    /// Base for relative paths and start of the upward search
    pub cwd: PathBuf,
}

impl ConfigLocation {
    /// Build a location from the process environment
    pub fn from_process(explicit: Option<PathBuf>) -> HaetaeResult<Self> {
        let env_override = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let cwd = std::env::current_dir()
            .map_err(|e| HaetaeError::io("getting current directory", e))?;

        Ok(Self {
            explicit,
            env_override,
            cwd,
        })
    }

    /// Resolve the absolute, canonical config file path
    pub fn locate(&self) -> HaetaeResult<PathBuf> {
        let given = self
            .explicit
            .as_ref()
            .map(|p| (p, "--config"))
            .or_else(|| self.env_override.as_ref().map(|p| (p, CONFIG_ENV_VAR)));

        if let Some((path, origin)) = given {
            let path = absolutize(path, &self.cwd);
            debug!("Config path given by {}: {}", origin, path.display());
            return existing_config_file(&path).ok_or_else(|| {
                HaetaeError::ConfigResolution(format!(
                    "{} (from {}) does not exist",
                    path.display(),
                    origin
                ))
            });
        }

        find_config_upward(&self.cwd).ok_or_else(|| {
            HaetaeError::ConfigResolution(format!(
                "no {} found in {} or any parent directory",
                DEFAULT_CONFIG_FILE,
                self.cwd.display()
            ))
        })
    }
}

/// Search `start` and its ancestors for the conventional config file
pub fn find_config_upward(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            debug!("Found config: {}", candidate.display());
            candidate.canonicalize().ok()
        } else {
            None
        }
    })
}

/// Map a file or directory path to an existing config file
fn existing_config_file(path: &Path) -> Option<PathBuf> {
    let file = if path.is_dir() {
        path.join(DEFAULT_CONFIG_FILE)
    } else {
        path.to_path_buf()
    };
    if file.is_file() {
        file.canonicalize().ok()
    } else {
        None
    }
}

/// Validate a command table and fill in defaults
///
/// Every command needs a `run` producer; a missing `env` becomes [`EmptyEnv`].
pub fn configure(config_file: &Path, pre: PreConfig) -> HaetaeResult<Config> {
    let config_dir = config_file.parent().unwrap_or_else(|| Path::new("/"));
    let mut commands = BTreeMap::new();

    for (name, command) in pre.commands {
        let run = command.run.ok_or_else(|| {
            HaetaeError::invalid_config(
                config_file,
                format!("commands.{}.run is missing. It should be a command", name),
            )
        })?;
        let env = command.env.unwrap_or_else(|| Arc::new(EmptyEnv));
        commands.insert(name, CommandDef { run, env });
    }

    Ok(Config {
        config_file: config_file.to_path_buf(),
        store_file: normalize_store_file(pre.store_file.as_deref(), config_dir),
        commands,
    })
}

/// Normalize the configured store location to an absolute `.json` path
///
/// Unset means the config directory. Relative paths resolve against the
/// config directory. Directories, and names without a `.json` extension,
/// get [`DEFAULT_STORE_FILE`] appended. The store file itself may not
/// exist yet.
pub fn normalize_store_file(store_file: Option<&str>, config_dir: &Path) -> PathBuf {
    let raw = store_file.filter(|s| !s.trim().is_empty()).unwrap_or(".");
    let path = clean_path(&absolutize(Path::new(raw), config_dir));

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if path.is_dir() || !is_json {
        path.join(DEFAULT_STORE_FILE)
    } else {
        path
    }
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Resolve `.` and `..` without touching the filesystem
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

/// Loads configs through a [`ConfigSource`], once per canonical path
pub struct ConfigResolver {
    source: Arc<dyn ConfigSource>,
    cache: Memo<Arc<Config>>,
}

impl ConfigResolver {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self {
            source,
            cache: Memo::new("config"),
        }
    }

    /// Locate and load the config
    pub async fn resolve(&self, location: &ConfigLocation) -> HaetaeResult<Arc<Config>> {
        let path = location.locate()?;
        self.load(&path).await
    }

    /// Load the config at `path` (file, or directory holding the config file)
    pub async fn load(&self, path: &Path) -> HaetaeResult<Arc<Config>> {
        let path = existing_config_file(path).ok_or_else(|| {
            HaetaeError::ConfigResolution(format!(
                "config filename is given as {}, but it does not exist",
                path.display()
            ))
        })?;

        let key = CacheKey::new("config", &path)?;
        self.cache
            .get_or_try_insert_with(key, || async {
                let pre = self.source.load(&path).await?;
                let config = configure(&path, pre)?;
                debug!(
                    "Loaded {} commands from {}, store at {}",
                    config.commands.len(),
                    path.display(),
                    config.store_file.display()
                );
                Ok(Arc::new(config))
            })
            .await
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(Arc::new(TomlConfigSource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::{FnProducer, Producer};
    use async_trait::async_trait;
    use serde_json::json;
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, content).unwrap();
        path.canonicalize().unwrap()
    }

    fn location(cwd: &Path) -> ConfigLocation {
        ConfigLocation {
            explicit: None,
            env_override: None,
            cwd: cwd.to_path_buf(),
        }
    }

    #[test]
    fn locate_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "");

        let mut loc = location(Path::new("/"));
        loc.explicit = Some(path.clone());
        assert_eq!(loc.locate().unwrap(), path);
    }

    #[test]
    fn locate_explicit_directory_appends_file_name() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "");

        let mut loc = location(temp.path());
        loc.explicit = Some(PathBuf::from("."));
        assert_eq!(loc.locate().unwrap(), path);
    }

    #[test]
    fn locate_explicit_missing_fails() {
        let temp = TempDir::new().unwrap();
        let mut loc = location(temp.path());
        loc.explicit = Some(temp.path().join("nope.toml"));

        let err = loc.locate().unwrap_err();
        assert!(matches!(err, HaetaeError::ConfigResolution(_)));
    }

    #[test]
    fn locate_explicit_beats_env_override() {
        let explicit = TempDir::new().unwrap();
        let from_env = TempDir::new().unwrap();
        let explicit_path = write_config(explicit.path(), "");
        write_config(from_env.path(), "");

        let mut loc = location(Path::new("/"));
        loc.explicit = Some(explicit.path().to_path_buf());
        loc.env_override = Some(from_env.path().to_path_buf());
        assert_eq!(loc.locate().unwrap(), explicit_path);
    }

    #[test]
    fn locate_env_override_beats_upward_search() {
        let project = TempDir::new().unwrap();
        let from_env = TempDir::new().unwrap();
        write_config(project.path(), "");
        let env_path = write_config(from_env.path(), "");

        let mut loc = location(project.path());
        loc.env_override = Some(env_path.clone());
        assert_eq!(loc.locate().unwrap(), env_path);
    }

    #[test]
    fn locate_searches_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "");
        let nested = temp.path().join("crates").join("core");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(location(&nested).locate().unwrap(), path);
    }

    #[test]
    #[serial]
    fn from_process_reads_env_var() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "");

        std::env::set_var(CONFIG_ENV_VAR, &path);
        let loc = ConfigLocation::from_process(None).unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(loc.env_override.as_deref(), Some(path.as_path()));
        assert_eq!(loc.locate().unwrap(), path);
    }

    #[test]
    #[serial]
    fn from_process_ignores_empty_env_var() {
        std::env::set_var(CONFIG_ENV_VAR, "");
        let loc = ConfigLocation::from_process(None).unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert!(loc.env_override.is_none());
    }

    #[test]
    fn store_file_absolute_json_unchanged() {
        let path = normalize_store_file(Some("/path/to/haetae.store.json"), Path::new("/cfg"));
        assert_eq!(path, PathBuf::from("/path/to/haetae.store.json"));
    }

    #[test]
    fn store_file_defaults_to_config_dir() {
        let path = normalize_store_file(None, Path::new("/cfg"));
        assert_eq!(path, PathBuf::from("/cfg/haetae.store.json"));

        let path = normalize_store_file(Some(""), Path::new("/cfg"));
        assert_eq!(path, PathBuf::from("/cfg/haetae.store.json"));
    }

    #[test]
    fn store_file_absolute_directory_gets_file_name() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();

        let path = normalize_store_file(Some(dir), Path::new("/cfg"));
        assert_eq!(path, temp.path().join(DEFAULT_STORE_FILE));
    }

    #[test]
    fn store_file_relative_resolves_against_config_dir() {
        let path = normalize_store_file(Some("../path/to/haetae.store.json"), Path::new("/a/cfg"));
        assert_eq!(path, PathBuf::from("/a/path/to/haetae.store.json"));

        let path = normalize_store_file(Some(".cache/haetae"), Path::new("/a/cfg"));
        assert_eq!(path, PathBuf::from("/a/cfg/.cache/haetae/haetae.store.json"));

        let path = normalize_store_file(Some(".."), Path::new("/a/cfg"));
        assert_eq!(path, PathBuf::from("/a/haetae.store.json"));
    }

    #[test]
    fn clean_path_stops_at_root() {
        assert_eq!(clean_path(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(clean_path(Path::new("a/./b/..")), PathBuf::from("a"));
    }

    fn producer(value: serde_json::Value) -> Arc<dyn Producer> {
        Arc::new(FnProducer::constant(value))
    }

    #[tokio::test]
    async fn configure_fills_default_env() {
        let mut pre = PreConfig::default();
        pre.commands.insert(
            "build".to_string(),
            PreCommand::new(producer(json!({"ok": true}))),
        );

        let config = configure(Path::new("/p/haetae.config.toml"), pre).unwrap();
        let env = config.command("build").unwrap().env.produce().await.unwrap();
        assert_eq!(env, json!({}));
        assert_eq!(config.store_file, PathBuf::from("/p/haetae.store.json"));
    }

    #[test]
    fn configure_rejects_missing_run() {
        let mut pre = PreConfig::default();
        pre.commands.insert(
            "build".to_string(),
            PreCommand {
                run: None,
                env: Some(producer(json!({}))),
            },
        );

        let err = configure(Path::new("/p/haetae.config.toml"), pre).unwrap_err();
        assert!(matches!(err, HaetaeError::ConfigValidation { .. }));
        assert!(err.to_string().contains("commands.build.run"));
    }

    struct CountingSource {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl ConfigSource for CountingSource {
        async fn load(&self, _path: &Path) -> HaetaeResult<PreConfig> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(PreConfig::default())
        }
    }

    #[tokio::test]
    async fn resolver_caches_by_canonical_path() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "");
        let source = Arc::new(CountingSource {
            loads: AtomicUsize::new(0),
        });
        let resolver = ConfigResolver::new(source.clone());

        let first = resolver.load(&path).await.unwrap();
        let second = resolver.load(temp.path()).await.unwrap();
        let third = resolver
            .load(&temp.path().join(".").join(DEFAULT_CONFIG_FILE))
            .await
            .unwrap();

        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
    }

    #[tokio::test]
    async fn resolver_loads_toml() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"
            store_file = "records"

            [commands.build]
            run = "echo '{}'"
            "#,
        );

        let resolver = ConfigResolver::default();
        let config = resolver.resolve(&location(temp.path())).await.unwrap();

        assert!(config.commands.contains_key("build"));
        let expected = temp
            .path()
            .canonicalize()
            .unwrap()
            .join("records")
            .join(DEFAULT_STORE_FILE);
        assert_eq!(config.store_file, expected);
    }

    #[tokio::test]
    async fn resolver_surfaces_validation_errors() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"
            [commands.build]
            env = "echo '{}'"
            "#,
        );

        let err = ConfigResolver::default()
            .load(temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, HaetaeError::ConfigValidation { .. }));
    }
}
