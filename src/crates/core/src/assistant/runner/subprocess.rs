//! Interpreter-subprocess implementation of the script runner.
//!
//! The code is written to a named temp file, the configured interpreter
//! runs it, and the file is removed when the handle drops, on every exit
//! path. No execution timeout is enforced.

use super::{ExecutionOutcome, ScriptRunner};
use crate::assistant::validation::ENTRY_POINT_MARKER;
use crate::service::config::Settings;
use async_trait::async_trait;
use log::debug;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Driver stanza appended when the script defines the entry point, so a
/// plain interpreter run still enters it with a null context.
const ENTRY_DRIVER: &str = "\n\nif __name__ == \"__main__\":\n    run(None)\n";

pub struct SubprocessRunner {
    interpreter: String,
    interpreter_args: Vec<String>,
    scratch_dir: Option<PathBuf>,
}

impl SubprocessRunner {
    pub fn new(interpreter: impl Into<String>, interpreter_args: Vec<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            interpreter_args,
            scratch_dir: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.interpreter.clone(),
            settings.interpreter_args.clone(),
        )
    }

    /// Materialize units in a fixed directory instead of the system temp
    /// location.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    fn materialize(&self, code: &str) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("cadpilot-unit-").suffix(".py");

        let mut unit = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        unit.write_all(code.as_bytes())?;
        if code.contains(ENTRY_POINT_MARKER) {
            unit.write_all(ENTRY_DRIVER.as_bytes())?;
        }
        unit.flush()?;
        Ok(unit)
    }
}

#[async_trait]
impl ScriptRunner for SubprocessRunner {
    async fn submit(&self, code: &str) -> ExecutionOutcome {
        // The unit is deleted when it drops, whichever branch returns.
        let unit = match self.materialize(code) {
            Ok(unit) => unit,
            Err(e) => {
                return ExecutionOutcome::Failed {
                    error: format!("Error preparing script unit: {}", e),
                }
            }
        };

        debug!("Executing script unit {}", unit.path().display());
        let output = Command::new(&self.interpreter)
            .args(&self.interpreter_args)
            .arg(unit.path())
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
                ExecutionOutcome::Succeeded {
                    detail: (!stdout.is_empty()).then_some(stdout),
                }
            }
            Ok(output) => {
                let trace = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let exit = output
                    .status
                    .code()
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                ExecutionOutcome::Failed {
                    error: format!("Error executing script (exit {}):\n{}", exit, trace),
                }
            }
            Err(e) => ExecutionOutcome::Failed {
                error: format!(
                    "Error launching interpreter '{}': {}",
                    self.interpreter, e
                ),
            },
        }
    }
}
