//! Producers backed by external processes
//!
//! The process runs in the config file's directory with stdin closed; its
//! stdout must be a single JSON document.

use crate::error::{HaetaeError, HaetaeResult};
use crate::producer::Producer;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// How the process is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Script passed to the platform shell (`sh -c` / `cmd /C`)
    Shell(String),
    /// Program and arguments, executed directly
    Argv(Vec<String>),
}

impl Invocation {
    fn display(&self) -> String {
        match self {
            Self::Shell(script) => script.clone(),
            Self::Argv(args) => args.join(" "),
        }
    }
}

/// Producer that runs a process and parses its stdout as JSON
#[derive(Debug, Clone)]
pub struct ProcessProducer {
    /// Where errors point, e.g. `commands.build.run`
    label: String,
    invocation: Invocation,
    cwd: PathBuf,
}

impl ProcessProducer {
    pub fn new(label: impl Into<String>, invocation: Invocation, cwd: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            invocation,
            cwd: cwd.into(),
        }
    }

    fn command(&self) -> HaetaeResult<Command> {
        let mut cmd = match &self.invocation {
            Invocation::Shell(script) => shell_command(script),
            Invocation::Argv(args) => {
                let Some((program, rest)) = args.split_first() else {
                    return Err(HaetaeError::ProducerOutput {
                        producer: self.label.clone(),
                        reason: "the argument list is empty, nothing to run".to_string(),
                    });
                };
                let mut cmd = Command::new(program);
                cmd.args(rest);
                cmd
            }
        };
        cmd.current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        Ok(cmd)
    }
}

#[cfg(unix)]
fn shell_command(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    cmd
}

#[cfg(windows)]
fn shell_command(script: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(script);
    cmd
}

#[async_trait]
impl Producer for ProcessProducer {
    async fn produce(&self) -> HaetaeResult<Value> {
        let shown = self.invocation.display();
        debug!("Executing {}: {}", self.label, shown);

        let output = self
            .command()?
            .output()
            .await
            .map_err(|e| HaetaeError::command_failed(&shown, e))?;

        if !output.status.success() {
            return Err(HaetaeError::ProducerFailed {
                command: shown,
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Invalid UTF-8 is an error, never replaced
        serde_json::from_slice(output.stdout.trim_ascii()).map_err(|e| {
            HaetaeError::ProducerOutput {
                producer: self.label.clone(),
                reason: format!("stdout is not UTF-8 JSON ({})", e),
            }
        })
    }

    fn describe(&self) -> String {
        self.invocation.display()
    }
}
