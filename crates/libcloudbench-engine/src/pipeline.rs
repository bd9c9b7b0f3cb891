//! Probe pipeline - one benchmark run
//!
//! Probes run strictly in order. Each stage takes the run built so far and
//! hands back the run with its columns filled; the first failing stage
//! abandons the whole run.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use libcloudbench_core::{BenchSettings, BenchmarkRun, CloudBenchError, IoDirection, MetricValue, Schema};

use crate::error::ProbeError;
use crate::probes::{CdnProbe, CpuProbe, DiskIopsProbe, DiskPingProbe, NetworkProbe, Probe};
use crate::tool::ToolRunner;

/// Which probes a configuration variant runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Run the CDN probe (otherwise its column is absent)
    pub cdn: bool,
    /// Run the disk probes (otherwise their columns hold the placeholder)
    pub disk: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { cdn: true, disk: true }
    }
}

/// Ordered probes plus the schema they fill
#[derive(Debug, Clone)]
pub struct Pipeline {
    probes: Vec<Probe>,
    schema: Schema,
    settle_delay: Duration,
}

impl Pipeline {
    /// Build a pipeline; the schema is the probes' columns in order
    pub fn new(probes: Vec<Probe>, settle_delay: Duration) -> Result<Self, CloudBenchError> {
        let columns = probes
            .iter()
            .flat_map(|p| p.columns().iter().copied())
            .collect();
        let schema = Schema::new(columns)?;
        Ok(Self {
            probes,
            schema,
            settle_delay,
        })
    }

    /// The standard probe order: CDN, network, CPU, disk read, disk write, disk ping
    pub fn from_settings(settings: &BenchSettings, options: PipelineOptions) -> Result<Self, CloudBenchError> {
        settings.validate(options.cdn)?;

        let mut probes = Vec::with_capacity(6);
        if options.cdn {
            probes.push(Probe::CdnDownload(CdnProbe::from_settings(&settings.cdn)));
        }
        probes.push(Probe::Network(NetworkProbe::from_settings(&settings.network)));
        probes.push(Probe::Cpu(CpuProbe::from_settings(&settings.cpu)));
        for direction in [IoDirection::Read, IoDirection::Write] {
            probes.push(Probe::DiskIops(DiskIopsProbe::from_settings(
                direction,
                &settings.disk,
                options.disk,
            )));
        }
        probes.push(Probe::DiskPing(DiskPingProbe::from_settings(&settings.disk, options.disk)));

        Self::new(probes, settings.settle_delay())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Execute run `index` (1-based)
    pub async fn run<R: ToolRunner>(&self, runner: &R, index: u64) -> Result<BenchmarkRun, ProbeError> {
        let started = Instant::now();
        let mut run = BenchmarkRun::begin(index, &self.schema);

        for probe in &self.probes {
            run = self.stage(probe, run, runner).await?;
        }

        info!(
            run = index,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "benchmark run finished"
        );
        Ok(run)
    }

    async fn stage<R: ToolRunner>(
        &self,
        probe: &Probe,
        mut run: BenchmarkRun,
        runner: &R,
    ) -> Result<BenchmarkRun, ProbeError> {
        if !probe.is_enabled() {
            debug!(run = run.index(), probe = probe.name(), "probe disabled");
            record(&mut run, probe, probe.placeholders())?;
            return Ok(run);
        }

        let started = Instant::now();
        debug!(run = run.index(), probe = probe.name(), "probe starting");
        let values = probe.measure(runner).await?;
        record(&mut run, probe, values)?;
        debug!(
            run = run.index(),
            probe = probe.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "probe finished"
        );

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        Ok(run)
    }
}

fn record(
    run: &mut BenchmarkRun,
    probe: &Probe,
    values: Vec<MetricValue>,
) -> Result<(), CloudBenchError> {
    let columns = probe.columns();
    if values.len() != columns.len() {
        return Err(CloudBenchError::Internal(format!(
            "{} probe returned {} values for {} columns",
            probe.name(),
            values.len(),
            columns.len()
        )));
    }
    for (column, value) in columns.iter().zip(values) {
        run.record(*column, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libcloudbench_core::MetricColumn;

    #[test]
    fn test_standard_schema() {
        let pipeline = Pipeline::from_settings(&BenchSettings::default(), PipelineOptions::default()).unwrap();
        assert_eq!(pipeline.schema(), &Schema::standard(true));
        assert_eq!(pipeline.probes().len(), 6);
        assert_eq!(pipeline.settle_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_schema_without_cdn() {
        let options = PipelineOptions { cdn: false, disk: true };
        let pipeline = Pipeline::from_settings(&BenchSettings::default(), options).unwrap();
        assert_eq!(pipeline.schema(), &Schema::standard(false));
    }

    #[test]
    fn test_disabled_disk_keeps_columns() {
        let options = PipelineOptions { cdn: true, disk: false };
        let pipeline = Pipeline::from_settings(&BenchSettings::default(), options).unwrap();
        assert!(pipeline.schema().contains(MetricColumn::ReadIops));
        assert!(pipeline.schema().contains(MetricColumn::IoPing));
        let disabled: Vec<_> = pipeline
            .probes()
            .iter()
            .filter(|p| !p.is_enabled())
            .map(|p| p.name())
            .collect();
        assert_eq!(disabled, vec!["disk-read", "disk-write", "disk-ping"]);
    }

    #[test]
    fn test_duplicate_probe_rejected() {
        let probes = vec![Probe::Cpu(CpuProbe::new(10)), Probe::Cpu(CpuProbe::new(10))];
        assert!(Pipeline::new(probes, Duration::ZERO).is_err());
    }
}
