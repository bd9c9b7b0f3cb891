use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CloudBenchError, Result};

/// Default CDN test files, roughly 100 MB each
pub const DEFAULT_CDN_URLS: [&str; 5] = [
    "https://cachefly.cachefly.net/100mb.test",
    "https://mirror.nl.leaseweb.net/speedtest/100mb.bin",
    "https://speed.hetzner.de/100MB.bin",
    "https://ping.online.net/100Mo.dat",
    "https://proof.ovh.net/files/100Mb.dat",
];

/// Probe tuning loaded from an optional TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchSettings {
    /// Pause after each probe that ran, in seconds
    pub settle_delay_secs: u64,
    pub cdn: CdnSettings,
    pub network: NetworkSettings,
    pub cpu: CpuSettings,
    pub disk: DiskSettings,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            settle_delay_secs: 3,
            cdn: CdnSettings::default(),
            network: NetworkSettings::default(),
            cpu: CpuSettings::default(),
            disk: DiskSettings::default(),
        }
    }
}

impl BenchSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    /// Reject values no probe can run with
    pub fn validate(&self, cdn_enabled: bool) -> Result<()> {
        if cdn_enabled && self.cdn.urls.is_empty() {
            return Err(CloudBenchError::InvalidArgs(
                "cdn.urls is empty; add URLs or pass --nocdn".to_string(),
            ));
        }
        if self.cdn.max_time_secs == 0 {
            return Err(CloudBenchError::InvalidArgs(
                "cdn.max_time_secs must be at least 1".to_string(),
            ));
        }
        if self.network.command.trim().is_empty() {
            return Err(CloudBenchError::InvalidArgs(
                "network.command must name a program".to_string(),
            ));
        }
        if self.disk.iodepth == 0 || self.disk.ping_count == 0 {
            return Err(CloudBenchError::InvalidArgs(
                "disk.iodepth and disk.ping_count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// CDN download probe settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CdnSettings {
    pub urls: Vec<String>,
    /// Upper bound for one transfer (curl --max-time)
    pub max_time_secs: u64,
    /// Pause after each transfer before it counts as finished
    pub post_transfer_secs: u64,
}

impl Default for CdnSettings {
    fn default() -> Self {
        Self {
            urls: DEFAULT_CDN_URLS.iter().map(|u| u.to_string()).collect(),
            max_time_secs: 10,
            post_transfer_secs: 5,
        }
    }
}

impl CdnSettings {
    pub fn max_time(&self) -> Duration {
        Duration::from_secs(self.max_time_secs)
    }

    pub fn post_transfer(&self) -> Duration {
        Duration::from_secs(self.post_transfer_secs)
    }
}

/// Network speed test settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSettings {
    /// Speed test program; must accept Ookla's `--format=json`
    pub command: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            command: "speedtest".to_string(),
        }
    }
}

/// CPU workload settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CpuSettings {
    /// Number of digests generated per run
    pub iterations: u64,
}

impl Default for CpuSettings {
    fn default() -> Self {
        Self {
            iterations: crate::workload::DEFAULT_ITERATIONS,
        }
    }
}

/// fio and ioping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiskSettings {
    /// Total bytes per fio job, in fio's size syntax
    pub size: String,
    pub block_size: String,
    pub iodepth: u32,
    /// Samples taken by ioping
    pub ping_count: u32,
}

impl Default for DiskSettings {
    fn default() -> Self {
        Self {
            size: "4G".to_string(),
            block_size: "4k".to_string(),
            iodepth: 64,
            ping_count: 10,
        }
    }
}

/// Load settings from a TOML file
pub fn load_settings(path: &Path) -> Result<BenchSettings> {
    if !path.exists() {
        return Err(CloudBenchError::InvalidArgs(format!(
            "settings file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    let settings: BenchSettings = toml::from_str(&content)?;
    Ok(settings)
}

/// Save settings to a TOML file
pub fn save_settings(path: &Path, settings: &BenchSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}
