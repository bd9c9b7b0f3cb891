//! Synthetic CPU workload
//!
//! Hashes, sorts, filters and drains a large vector of hex digests. The
//! exact steps only matter in that they stay the same between runs and
//! hosts, so elapsed times remain comparable.

use std::hint::black_box;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

/// Digests generated per run unless configured otherwise
pub const DEFAULT_ITERATIONS: u64 = 2_500_000;

/// Digests starting with this character are filtered out
pub const FILTERED_PREFIX: char = 'a';

/// Fixed-size CPU and allocator workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuWorkload {
    iterations: u64,
}

/// Result of one workload execution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadReport {
    pub elapsed: Duration,
    /// Digests generated
    pub generated: usize,
    /// Digests left after filtering, before draining
    pub retained: usize,
}

impl WorkloadReport {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

impl CpuWorkload {
    pub fn new(iterations: u64) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Run the workload on the current thread
    pub fn run(&self) -> WorkloadReport {
        let start = Instant::now();

        let mut digests: Vec<String> = (0..self.iterations)
            .map(|i| hex::encode(Sha256::digest(i.to_string().as_bytes())))
            .collect();
        let generated = digests.len();

        digests.sort();
        digests.retain(|d| !d.starts_with(FILTERED_PREFIX));
        let retained = digests.len();

        while let Some(digest) = digests.pop() {
            black_box(digest);
        }

        WorkloadReport {
            elapsed: start.elapsed(),
            generated,
            retained,
        }
    }
}

impl Default for CpuWorkload {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}
