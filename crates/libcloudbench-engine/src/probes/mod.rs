//! Measurement probes
//!
//! Each probe fills one or more schema columns. Probes that shell out go
//! through a [`ToolRunner`]; disabled probes report [`MetricValue::Unavailable`]
//! for every column and are never invoked.

mod cdn;
mod cpu;
mod disk;
mod network;

pub use cdn::{mean_throughput, CdnProbe};
pub use cpu::CpuProbe;
pub use disk::{DiskIopsProbe, DiskPingProbe};
pub use network::NetworkProbe;

use libcloudbench_core::{MetricColumn, MetricValue};

use crate::error::ProbeError;
use crate::tool::ToolRunner;

/// One step of the pipeline
#[derive(Debug, Clone)]
pub enum Probe {
    CdnDownload(CdnProbe),
    Network(NetworkProbe),
    Cpu(CpuProbe),
    DiskIops(DiskIopsProbe),
    DiskPing(DiskPingProbe),
}

impl Probe {
    /// Short name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Probe::CdnDownload(_) => cdn::NAME,
            Probe::Network(_) => network::NAME,
            Probe::Cpu(_) => cpu::NAME,
            Probe::DiskIops(p) => p.name(),
            Probe::DiskPing(_) => disk::PING_NAME,
        }
    }

    /// Columns this probe fills, in order
    pub fn columns(&self) -> &'static [MetricColumn] {
        match self {
            Probe::CdnDownload(_) => &[MetricColumn::CdnDownload],
            Probe::Network(_) => &[MetricColumn::Ping, MetricColumn::Download, MetricColumn::Upload],
            Probe::Cpu(_) => &[MetricColumn::CpuTime],
            Probe::DiskIops(p) => p.columns(),
            Probe::DiskPing(_) => &[MetricColumn::IoPing],
        }
    }

    /// False when configuration turned the probe off
    pub fn is_enabled(&self) -> bool {
        match self {
            Probe::DiskIops(p) => p.is_enabled(),
            Probe::DiskPing(p) => p.is_enabled(),
            _ => true,
        }
    }

    /// Values reported while disabled
    pub fn placeholders(&self) -> Vec<MetricValue> {
        vec![MetricValue::Unavailable; self.columns().len()]
    }

    /// Take the measurement, one value per column
    pub async fn measure<R: ToolRunner>(&self, runner: &R) -> Result<Vec<MetricValue>, ProbeError> {
        if !self.is_enabled() {
            return Ok(self.placeholders());
        }
        match self {
            Probe::CdnDownload(p) => p.measure(runner).await,
            Probe::Network(p) => p.measure(runner).await,
            Probe::Cpu(p) => p.measure().await,
            Probe::DiskIops(p) => p.measure(runner).await,
            Probe::DiskPing(p) => p.measure(runner).await,
        }
    }
}
