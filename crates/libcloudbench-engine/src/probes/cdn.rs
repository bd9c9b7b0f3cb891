use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use libcloudbench_core::config::CdnSettings;
use libcloudbench_core::MetricValue;

use crate::error::ProbeError;
use crate::parse;
use crate::tool::ToolRunner;

pub(super) const NAME: &str = "cdn";

const PROGRAM: &str = "curl";

/// Extra time granted on top of curl's own `--max-time`
const KILL_GRACE: Duration = Duration::from_secs(5);

/// Mean download speed over a fixed set of CDN files
#[derive(Debug, Clone)]
pub struct CdnProbe {
    urls: Vec<String>,
    max_time: Duration,
    post_transfer: Duration,
}

impl CdnProbe {
    pub fn new(urls: Vec<String>, max_time: Duration, post_transfer: Duration) -> Self {
        Self {
            urls,
            max_time,
            post_transfer,
        }
    }

    pub fn from_settings(settings: &CdnSettings) -> Self {
        Self::new(settings.urls.clone(), settings.max_time(), settings.post_transfer())
    }

    /// curl arguments for one transfer
    pub fn args(&self, url: &str) -> Vec<String> {
        vec![
            "--max-time".to_string(),
            self.max_time.as_secs().to_string(),
            "-s".to_string(),
            "-o".to_string(),
            "/dev/null".to_string(),
            "-w".to_string(),
            "%{speed_download}\n".to_string(),
            url.to_string(),
        ]
    }

    pub(super) async fn measure<R: ToolRunner>(&self, runner: &R) -> Result<Vec<MetricValue>, ProbeError> {
        let transfers = self.urls.iter().map(|url| self.transfer(runner, url));
        let speeds = join_all(transfers).await;
        let mean = mean_throughput(&speeds);
        debug!(transfers = speeds.len(), mean_mbps = mean, "CDN transfers finished");
        Ok(vec![MetricValue::Number(mean)])
    }

    /// MB/s for one URL; any failure counts as zero
    async fn transfer<R: ToolRunner>(&self, runner: &R, url: &str) -> f64 {
        let args = self.args(url);
        // curl prints the speed reached so far even when --max-time expires,
        // so the exit status is not checked here
        let speed = match runner.invoke(PROGRAM, &args, Some(self.max_time + KILL_GRACE)).await {
            Ok(output) => match parse::curl_speed(&output.stdout) {
                Ok(bytes_per_sec) => parse::megabytes_per_sec(bytes_per_sec),
                Err(e) => {
                    warn!(url, error = %e, "CDN transfer reported no speed");
                    0.0
                }
            },
            Err(e) => {
                warn!(url, error = %e, "CDN transfer failed");
                0.0
            }
        };

        if !self.post_transfer.is_zero() {
            tokio::time::sleep(self.post_transfer).await;
        }
        speed
    }
}

/// Arithmetic mean over every transfer, failed ones included
pub fn mean_throughput(speeds: &[f64]) -> f64 {
    if speeds.is_empty() {
        return 0.0;
    }
    speeds.iter().sum::<f64>() / speeds.len() as f64
}
