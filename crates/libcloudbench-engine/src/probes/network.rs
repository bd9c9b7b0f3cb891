use tracing::debug;

use libcloudbench_core::config::NetworkSettings;
use libcloudbench_core::MetricValue;

use crate::error::ProbeError;
use crate::parse;
use crate::tool::ToolRunner;

pub(super) const NAME: &str = "network";

/// Ping, download and upload from the Ookla speed test CLI
#[derive(Debug, Clone)]
pub struct NetworkProbe {
    program: String,
}

impl NetworkProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_settings(settings: &NetworkSettings) -> Self {
        Self::new(settings.command.clone())
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "--format=json".to_string(),
            "--accept-license".to_string(),
            "--accept-gdpr".to_string(),
        ]
    }

    pub(super) async fn measure<R: ToolRunner>(&self, runner: &R) -> Result<Vec<MetricValue>, ProbeError> {
        let output = runner
            .invoke(&self.program, &self.args(), None)
            .await
            .and_then(|o| o.into_success(&self.program))
            .map_err(|source| ProbeError::Tool { probe: NAME, source })?;

        let sample = parse::speedtest_result(&output.stdout)
            .map_err(|source| ProbeError::Parse { probe: NAME, source })?;
        debug!(
            ping_ms = sample.ping_ms,
            download = sample.download,
            upload = sample.upload,
            "speed test finished"
        );

        Ok(vec![
            MetricValue::Number(sample.ping_ms),
            MetricValue::Number(sample.download),
            MetricValue::Number(sample.upload),
        ])
    }
}
