//! External tool boundary
//!
//! Probes only see `ToolRunner::invoke`; all text and JSON handling lives
//! in `parse`, so probes can be driven by canned output in tests.

use std::future::Future;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::ToolError;

/// Captured result of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl RawOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Turn an unsuccessful exit into an error
    pub fn into_success(self, program: &str) -> Result<Self, ToolError> {
        if self.success {
            return Ok(self);
        }
        Err(ToolError::Failed {
            program: program.to_string(),
            status: match self.code {
                Some(code) => format!("exit code {}", code),
                None => "signal".to_string(),
            },
            stderr: self.stderr.trim().to_string(),
        })
    }
}

impl From<Output> for RawOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs an external program and captures its output
///
/// A non-zero exit is not an error at this level; callers decide with
/// [`RawOutput::into_success`].
pub trait ToolRunner {
    fn invoke(
        &self,
        program: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<RawOutput, ToolError>> + Send;
}

/// Runs tools as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn invoke(
        &self,
        program: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<RawOutput, ToolError> {
        debug!(program, ?args, "invoking tool");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = command.output();
        let result = match timeout {
            Some(after) => tokio::time::timeout(after, output)
                .await
                .map_err(|_| ToolError::Timeout {
                    program: program.to_string(),
                    after,
                })?,
            None => output.await,
        };

        let output = result.map_err(|source| ToolError::Spawn {
            program: program.to_string(),
            source,
        })?;
        Ok(RawOutput::from(output))
    }
}
