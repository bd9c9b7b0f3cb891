//! Parsers for external tool output

use regex::Regex;
use serde::Deserialize;

use libcloudbench_core::IoDirection;

use crate::error::ParseError;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Convert bytes per second to MB/s (binary megabytes)
pub fn megabytes_per_sec(bytes_per_sec: f64) -> f64 {
    bytes_per_sec / BYTES_PER_MEGABYTE
}

/// Parse curl's `%{speed_download}` output (bytes per second)
pub fn curl_speed(stdout: &str) -> Result<f64, ParseError> {
    let text = stdout.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ParseError::Number(text.to_string())),
    }
}

/// Ping and throughput from one speed test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkSample {
    pub ping_ms: f64,
    /// MB/s
    pub download: f64,
    /// MB/s
    pub upload: f64,
}

#[derive(Deserialize)]
struct SpeedtestReport {
    ping: SpeedtestPing,
    download: SpeedtestTransfer,
    upload: SpeedtestTransfer,
}

#[derive(Deserialize)]
struct SpeedtestPing {
    latency: f64,
}

#[derive(Deserialize)]
struct SpeedtestTransfer {
    /// Bytes per second
    bandwidth: f64,
}

/// Parse the result of `speedtest --format=json`
pub fn speedtest_result(stdout: &str) -> Result<NetworkSample, ParseError> {
    let report: SpeedtestReport = serde_json::from_str(json_document(stdout)?)?;
    Ok(NetworkSample {
        ping_ms: report.ping.latency,
        download: megabytes_per_sec(report.download.bandwidth),
        upload: megabytes_per_sec(report.upload.bandwidth),
    })
}

#[derive(Deserialize)]
struct FioReport {
    jobs: Vec<FioJob>,
}

#[derive(Deserialize)]
struct FioJob {
    read: FioStats,
    write: FioStats,
}

#[derive(Deserialize)]
struct FioStats {
    iops: f64,
}

/// IOPS of the first job in `fio --output-format=json`
pub fn fio_iops(stdout: &str, direction: IoDirection) -> Result<f64, ParseError> {
    let report: FioReport = serde_json::from_str(json_document(stdout)?)?;
    let job = report.jobs.into_iter().next().ok_or(ParseError::NoJobs)?;
    Ok(match direction {
        IoDirection::Read => job.read.iops,
        IoDirection::Write => job.write.iops,
    })
}

/// Average latency from the ioping summary line, unit included
///
/// `min/avg/max/mdev = 157.6 us / 227.9 us / 361.5 us / 63.4 us` gives
/// `227.9 us`.
pub fn ioping_latency(stdout: &str) -> Result<String, ParseError> {
    let re = Regex::new(r" /\s(.+?)\s/ ")?;
    re.captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ParseError::NoMatch("ioping latency summary"))
}

/// Skip tool chatter printed before the JSON document
fn json_document(stdout: &str) -> Result<&str, ParseError> {
    stdout
        .find('{')
        .map(|start| &stdout[start..])
        .ok_or(ParseError::NoJson)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIO_READ: &str = r#"{
  "fio version" : "fio-3.28",
  "timestamp" : 1760795000,
  "jobs" : [
    {
      "jobname" : "randread",
      "groupid" : 0,
      "error" : 0,
      "read" : { "io_bytes" : 4294967296, "bw" : 190000, "iops" : 47500.123456 },
      "write" : { "io_bytes" : 0, "bw" : 0, "iops" : 0.000000 }
    }
  ]
}"#;

    const IOPING: &str = "\
4 KiB <<< . (ext4 /dev/nvme0n1p2 468.4 GiB): request=1 time=157.6 us (warmup)
4 KiB <<< . (ext4 /dev/nvme0n1p2 468.4 GiB): request=2 time=227.9 us

--- . (ext4 /dev/nvme0n1p2 468.4 GiB) ioping statistics ---
9 requests completed in 2.05 ms, 36 KiB read, 4.39 k iops, 17.1 MiB/s
generated 10 requests in 9.00 s, 40 KiB, 1 iops, 4.44 KiB/s
min/avg/max/mdev = 157.6 us / 227.9 us / 361.5 us / 63.4 us
";

    const SPEEDTEST: &str = r#"{"type":"result","timestamp":"2026-10-18T12:00:00Z","ping":{"jitter":0.41,"latency":11.5,"low":11.0,"high":12.2},"download":{"bandwidth":12582912,"bytes":150000000,"elapsed":12000},"upload":{"bandwidth":5242880,"bytes":60000000,"elapsed":11000},"packetLoss":0,"isp":"Example"}"#;

    #[test]
    fn test_curl_speed() {
        assert_eq!(curl_speed("10485760.000\n").unwrap(), 10_485_760.0);
        assert_eq!(megabytes_per_sec(10_485_760.0), 10.0);
        assert!(curl_speed("").is_err());
        assert!(curl_speed("NaN").is_err());
    }

    #[test]
    fn test_fio_read_and_write() {
        assert_eq!(fio_iops(FIO_READ, IoDirection::Read).unwrap(), 47500.123456);
        assert_eq!(fio_iops(FIO_READ, IoDirection::Write).unwrap(), 0.0);
    }

    #[test]
    fn test_fio_with_leading_warning() {
        let output = format!("fio: posix_fallocate fails: Not supported\n{}", FIO_READ);
        assert_eq!(fio_iops(&output, IoDirection::Read).unwrap(), 47500.123456);
    }

    #[test]
    fn test_fio_errors() {
        assert!(matches!(fio_iops("", IoDirection::Read), Err(ParseError::NoJson)));
        assert!(matches!(fio_iops(r#"{"jobs": []}"#, IoDirection::Read), Err(ParseError::NoJobs)));
        assert!(matches!(fio_iops("{ not json", IoDirection::Read), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_ioping_average() {
        assert_eq!(ioping_latency(IOPING).unwrap(), "227.9 us");
        assert!(matches!(ioping_latency("ioping: no such file"), Err(ParseError::NoMatch(_))));
    }

    #[test]
    fn test_speedtest() {
        let sample = speedtest_result(SPEEDTEST).unwrap();
        assert_eq!(sample.ping_ms, 11.5);
        assert_eq!(sample.download, 12.0);
        assert_eq!(sample.upload, 5.0);
    }

    #[test]
    fn test_speedtest_missing_field() {
        let result = speedtest_result(r#"{"type":"result","ping":{"latency":3.0}}"#);
        assert!(matches!(result, Err(ParseError::Json(_))));
    }
}
