use std::time::Duration;

use thiserror::Error;

/// Errors from invoking an external tool
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' did not finish within {}s", after.as_secs_f64())]
    Timeout { program: String, after: Duration },

    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Errors from parsing tool output
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no JSON document in output")]
    NoJson,

    #[error("report contains no jobs")]
    NoJobs,

    #[error("pattern not found: {0}")]
    NoMatch(&'static str),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("not a number: '{0}'")]
    Number(String),
}

/// Errors that abandon a benchmark run
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{probe} probe: {source}")]
    Tool {
        probe: &'static str,
        #[source]
        source: ToolError,
    },

    #[error("{probe} probe: unreadable output: {source}")]
    Parse {
        probe: &'static str,
        #[source]
        source: ParseError,
    },

    #[error("CPU workload did not complete: {0}")]
    Workload(String),

    #[error(transparent)]
    Core(#[from] libcloudbench_core::CloudBenchError),
}

impl ProbeError {
    /// Name of the failing probe, if the failure came from one
    pub fn probe(&self) -> Option<&'static str> {
        match self {
            ProbeError::Tool { probe, .. } | ProbeError::Parse { probe, .. } => Some(*probe),
            ProbeError::Workload(_) => Some("cpu"),
            ProbeError::Core(_) => None,
        }
    }
}
