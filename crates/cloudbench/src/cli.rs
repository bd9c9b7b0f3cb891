use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use libcloudbench_engine::PipelineOptions;

#[derive(Parser, Debug)]
#[command(name = "cloudbench")]
#[command(about = "Benchmark network, CPU and disk on a fixed interval and record each run as a CSV row")]
#[command(version)]
pub struct Cli {
    /// Seconds between the start of consecutive runs
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Number of runs before exiting
    #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: u64,

    /// Output CSV file (overwritten at startup)
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Skip the disk probes; their columns hold N/A
    #[arg(long)]
    pub nodisk: bool,

    /// Skip the CDN download probe and drop its column
    #[arg(long)]
    pub nocdn: bool,

    /// TOML file with probe settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            cdn: !self.nocdn,
            disk: !self.nodisk,
        }
    }
}
