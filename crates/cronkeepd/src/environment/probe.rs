//! Availability probe for the external orchestration tool.

use std::io;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

use super::ENVIRONMENT_TARGET;

/// Confirms that the orchestration tool can be executed.
pub trait ToolProbe: Send + Sync {
    /// Executable being probed, used in diagnostics.
    fn tool(&self) -> &str;

    /// Runs the probe.
    fn probe(&self) -> Result<(), ToolProbeError>;
}

/// Errors reported when the tool cannot be executed.
#[derive(Debug, Error)]
pub enum ToolProbeError {
    /// The process could not be spawned (not installed, not executable).
    #[error("failed to run '{tool}': {source}")]
    Spawn {
        /// Executable that failed to start.
        tool: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The process ran but reported failure.
    #[error("'{tool}' {status}{}", format_stderr(.stderr))]
    Exit {
        /// Executable that failed.
        tool: String,
        /// Exit status reported by the child.
        status: ExitStatus,
        /// Trimmed standard error output.
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Probe that runs `<tool> --version` and checks only its exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl CommandProbe {
    /// Builds a version probe for `program`.
    #[must_use]
    pub fn version(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![String::from("--version")],
        }
    }
}

impl ToolProbe for CommandProbe {
    fn tool(&self) -> &str {
        self.program.as_str()
    }

    fn probe(&self) -> Result<(), ToolProbeError> {
        debug!(
            target: ENVIRONMENT_TARGET,
            tool = %self.program,
            args = ?self.args,
            "probing orchestration tool"
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ToolProbeError::Spawn {
                tool: self.program.clone(),
                source,
            })?;
        if output.status.success() {
            return Ok(());
        }
        Err(ToolProbeError::Exit {
            tool: self.program.clone(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}
