use std::path::PathBuf;

use tracing::debug;

use libcloudbench_core::config::DiskSettings;
use libcloudbench_core::{IoDirection, IoEngine, MetricColumn, MetricValue};

use crate::error::ProbeError;
use crate::parse;
use crate::tool::ToolRunner;

pub(super) const PING_NAME: &str = "disk-ping";

const FIO: &str = "fio";
const IOPING: &str = "ioping";

/// Random 4 KiB direct I/O throughput via fio
#[derive(Debug, Clone)]
pub struct DiskIopsProbe {
    direction: IoDirection,
    engine: IoEngine,
    settings: DiskSettings,
    enabled: bool,
}

impl DiskIopsProbe {
    pub fn new(direction: IoDirection, settings: DiskSettings, enabled: bool) -> Self {
        Self {
            direction,
            engine: IoEngine::for_host(),
            settings,
            enabled,
        }
    }

    pub fn from_settings(direction: IoDirection, settings: &DiskSettings, enabled: bool) -> Self {
        Self::new(direction, settings.clone(), enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(super) fn name(&self) -> &'static str {
        match self.direction {
            IoDirection::Read => "disk-read",
            IoDirection::Write => "disk-write",
        }
    }

    pub(super) fn columns(&self) -> &'static [MetricColumn] {
        match self.direction {
            IoDirection::Read => &[MetricColumn::ReadIops],
            IoDirection::Write => &[MetricColumn::WriteIops],
        }
    }

    pub fn args(&self) -> Vec<String> {
        let job = self.direction.job_name();
        vec![
            format!("--name={}", job),
            format!("--ioengine={}", self.engine),
            "--direct=1".to_string(),
            format!("--bs={}", self.settings.block_size),
            format!("--iodepth={}", self.settings.iodepth),
            format!("--size={}", self.settings.size),
            format!("--rw={}", job),
            "--gtod_reduce=1".to_string(),
            "--output-format=json".to_string(),
        ]
    }

    pub(super) async fn measure<R: ToolRunner>(&self, runner: &R) -> Result<Vec<MetricValue>, ProbeError> {
        let probe = self.name();
        let output = runner
            .invoke(FIO, &self.args(), None)
            .await
            .and_then(|o| o.into_success(FIO))
            .map_err(|source| ProbeError::Tool { probe, source })?;

        let iops = parse::fio_iops(&output.stdout, self.direction)
            .map_err(|source| ProbeError::Parse { probe, source })?;
        debug!(probe, iops, "fio job finished");
        Ok(vec![MetricValue::Number(iops)])
    }
}

/// Disk request latency via ioping
#[derive(Debug, Clone)]
pub struct DiskPingProbe {
    count: u32,
    target: PathBuf,
    enabled: bool,
}

impl DiskPingProbe {
    /// Ping the current working directory
    pub fn new(count: u32, enabled: bool) -> Self {
        Self {
            count,
            target: PathBuf::from("."),
            enabled,
        }
    }

    pub fn from_settings(settings: &DiskSettings, enabled: bool) -> Self {
        Self::new(settings.ping_count, enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "-c".to_string(),
            self.count.to_string(),
            self.target.to_string_lossy().into_owned(),
        ]
    }

    pub(super) async fn measure<R: ToolRunner>(&self, runner: &R) -> Result<Vec<MetricValue>, ProbeError> {
        let output = runner
            .invoke(IOPING, &self.args(), None)
            .await
            .and_then(|o| o.into_success(IOPING))
            .map_err(|source| ProbeError::Tool { probe: PING_NAME, source })?;

        let latency = parse::ioping_latency(&output.stdout)
            .map_err(|source| ProbeError::Parse { probe: PING_NAME, source })?;
        debug!(latency = %latency, "ioping finished");
        Ok(vec![MetricValue::Text(latency)])
    }
}
