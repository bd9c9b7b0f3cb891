use tracing::debug;

use libcloudbench_core::config::CpuSettings;
use libcloudbench_core::{CpuWorkload, MetricValue, WorkloadReport};

use crate::error::ProbeError;

pub(super) const NAME: &str = "cpu";

/// Wall-clock time of the synthetic CPU workload
#[derive(Debug, Clone)]
pub struct CpuProbe {
    workload: CpuWorkload,
}

impl CpuProbe {
    pub fn new(iterations: u64) -> Self {
        Self {
            workload: CpuWorkload::new(iterations),
        }
    }

    pub fn from_settings(settings: &CpuSettings) -> Self {
        Self::new(settings.iterations)
    }

    /// Run the workload once off the scheduler thread
    pub async fn sample(&self) -> Result<WorkloadReport, ProbeError> {
        let workload = self.workload;
        let report = tokio::task::spawn_blocking(move || workload.run())
            .await
            .map_err(|e| ProbeError::Workload(e.to_string()))?;

        debug!(
            iterations = workload.iterations(),
            retained = report.retained,
            seconds = report.seconds(),
            "CPU workload finished"
        );
        Ok(report)
    }

    pub(super) async fn measure(&self) -> Result<Vec<MetricValue>, ProbeError> {
        let report = self.sample().await?;
        Ok(vec![MetricValue::Number(report.seconds())])
    }
}
