//! Init command - write a haetae.config.toml the resolver accepts

use crate::cli::args::InitArgs;
use crate::config::{configure, TomlConfigSource, DEFAULT_CONFIG_FILE};
use crate::error::{HaetaeError, HaetaeResult};
use crate::ui::{self, UiContext};
use tokio::fs;

const HEADER: &str = r#"# Haetae configuration
#
# Each [commands.<name>] table declares two producers. A producer is either a
# shell string or an argv array, runs in this file's directory, and must print
# JSON to stdout.
#
#   run  Does the work and prints an object describing the result.
#        The keys "time" and "env" are reserved.
#   env  Prints the environment the run depends on. Two runs with equal env
#        output share one record. Defaults to {}.

"#;

const STUB_RUN: &str = r#"echo '{"ok": true}'"#;
const STUB_ENV: &str = r#"# env = '''printf '{"head": "%s"}' "$(git rev-parse HEAD)"'''"#;

/// Execute the init command
pub async fn execute(args: InitArgs) -> HaetaeResult<()> {
    let ctx = UiContext::detect();

    let dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir()
            .map_err(|e| HaetaeError::io("getting current directory", e))?,
    };
    let config_file = dir.join(DEFAULT_CONFIG_FILE);

    let exists = fs::try_exists(&config_file)
        .await
        .map_err(|e| HaetaeError::io(format!("checking {}", config_file.display()), e))?;
    if exists && !args.force {
        return Err(HaetaeError::User(format!(
            "{} already exists. Use --force to overwrite.",
            config_file.display()
        )));
    }

    // Validated exactly as `run` will load it, so a bad name or store path
    // fails here and nothing is written
    let content = render(&args.commands, args.store_file.as_deref());
    let config = configure(
        &config_file,
        TomlConfigSource::parse(&config_file, &content)?,
    )?;

    fs::create_dir_all(&dir)
        .await
        .map_err(|e| HaetaeError::io(format!("creating directory {}", dir.display()), e))?;
    fs::write(&config_file, content)
        .await
        .map_err(|e| HaetaeError::io(format!("writing {}", config_file.display()), e))?;

    ui::created(&ctx, &config);
    Ok(())
}

/// Config text with one stub table per command name
fn render(commands: &[String], store_file: Option<&str>) -> String {
    let mut out = String::from(HEADER);

    match store_file {
        Some(path) => out.push_str(&format!("store_file = {}\n", toml_string(path))),
        None => {
            out.push_str("# Store file or directory, relative to this file\n");
            out.push_str("# store_file = \".haetae/store.json\"\n");
        }
    }

    let default = ["example".to_string()];
    let names = if commands.is_empty() { &default[..] } else { commands };
    for name in names {
        out.push_str(&format!(
            "\n[commands.{}]\nrun = {}\n{}\n",
            table_key(name),
            toml_string(STUB_RUN),
            STUB_ENV
        ));
    }

    out
}

/// Bare TOML key when possible, quoted otherwise
fn table_key(name: &str) -> String {
    let bare = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        name.to_string()
    } else {
        toml_string(name)
    }
}

fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
