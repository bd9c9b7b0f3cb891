//! Run scheduler
//!
//! Fires the pipeline immediately and then once per interval, one run at a
//! time. Failed runs are logged and skipped; they still use up one slot of
//! the run limit.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use libcloudbench_core::{CloudBenchError, CsvSink};

use crate::pipeline::Pipeline;
use crate::tool::ToolRunner;

/// Run counter and cadence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerState {
    runs_started: u64,
    limit: u64,
    interval: Duration,
}

impl SchedulerState {
    /// The interval must be non-zero
    pub fn new(interval: Duration, limit: u64) -> Result<Self, CloudBenchError> {
        if interval.is_zero() {
            return Err(CloudBenchError::InvalidArgs(
                "scheduler interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            runs_started: 0,
            limit,
            interval,
        })
    }

    /// True once `limit` runs have been started
    pub fn is_complete(&self) -> bool {
        self.runs_started >= self.limit
    }

    /// Claim the next run slot, returning its 1-based index
    pub fn begin_run(&mut self) -> Option<u64> {
        if self.is_complete() {
            return None;
        }
        self.runs_started += 1;
        Some(self.runs_started)
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// What happened to one scheduled run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Row written to the sink
    Recorded,
    /// A probe failed; nothing written
    ProbeFailed,
    /// The sink could not write the row
    SinkFailed,
}

/// Totals reported when scheduling stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub runs_started: u64,
    pub runs_recorded: u64,
    pub runs_failed: u64,
}

/// Owns the pipeline, the sink and the tool runner for the process lifetime
pub struct Scheduler<R> {
    state: SchedulerState,
    pipeline: Pipeline,
    sink: CsvSink,
    runner: R,
    summary: ScheduleSummary,
}

impl<R: ToolRunner> Scheduler<R> {
    pub fn new(state: SchedulerState, pipeline: Pipeline, sink: CsvSink, runner: R) -> Self {
        Self {
            state,
            pipeline,
            sink,
            runner,
            summary: ScheduleSummary::default(),
        }
    }

    pub fn sink(&self) -> &CsvSink {
        &self.sink
    }

    pub fn summary(&self) -> ScheduleSummary {
        self.summary
    }

    /// Fire runs until the limit is reached
    ///
    /// The first run starts immediately. A run that overruns the interval
    /// delays the next tick instead of causing a burst.
    pub async fn run(&mut self) -> ScheduleSummary {
        let mut ticker = tokio::time::interval(self.state.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.state.is_complete() {
            ticker.tick().await;
            self.fire().await;
        }

        info!(
            started = self.summary.runs_started,
            recorded = self.summary.runs_recorded,
            failed = self.summary.runs_failed,
            "run limit reached"
        );
        self.summary
    }

    /// Execute one run now, if the limit allows
    pub async fn fire(&mut self) -> Option<RunOutcome> {
        let index = self.state.begin_run()?;
        self.summary.runs_started += 1;
        info!(run = index, limit = self.state.limit(), "benchmark run starting");

        let outcome = match self.pipeline.run(&self.runner, index).await {
            Ok(run) => match self.sink.append(&run) {
                Ok(()) => RunOutcome::Recorded,
                Err(e) => {
                    error!(run = index, code = e.error_code(), error = %e, "failed to write results");
                    RunOutcome::SinkFailed
                }
            },
            Err(e) => {
                error!(run = index, probe = e.probe().unwrap_or("-"), error = %e, "benchmark run abandoned");
                RunOutcome::ProbeFailed
            }
        };

        match outcome {
            RunOutcome::Recorded => {
                self.summary.runs_recorded += 1;
                info!(run = index, rows = self.sink.rows(), path = %self.sink.path().display(), "results written");
            }
            RunOutcome::ProbeFailed | RunOutcome::SinkFailed => {
                self.summary.runs_failed += 1;
                if self.state.is_complete() {
                    warn!(run = index, "last run failed; no further runs scheduled");
                }
            }
        }
        Some(outcome)
    }
}
