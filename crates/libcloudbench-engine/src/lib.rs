//! Measurement pipeline and scheduler for cloudbench
//!
//! This crate provides:
//! - The external tool boundary (`ToolRunner`, `ProcessRunner`)
//! - Parsers for curl, speedtest, fio and ioping output
//! - The probes and the ordered probe pipeline
//! - The fixed-interval run scheduler

pub mod error;
pub mod parse;
pub mod pipeline;
pub mod probes;
pub mod scheduler;
pub mod tool;

pub use error::{ParseError, ProbeError, ToolError};
pub use pipeline::{Pipeline, PipelineOptions};
pub use probes::Probe;
pub use scheduler::{RunOutcome, ScheduleSummary, Scheduler, SchedulerState};
pub use tool::{ProcessRunner, RawOutput, ToolRunner};
