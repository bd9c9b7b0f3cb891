pub mod config;
pub mod engine;
pub mod error;
pub mod run;
pub mod schema;
pub mod sink;
pub mod workload;

pub use config::{load_settings, save_settings, BenchSettings};
pub use engine::{IoDirection, IoEngine};
pub use error::CloudBenchError;
pub use run::{BenchmarkRun, MetricValue, PLACEHOLDER};
pub use schema::{MetricColumn, Schema};
pub use sink::CsvSink;
pub use workload::{CpuWorkload, WorkloadReport};
