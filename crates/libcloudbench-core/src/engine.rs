//! Disk I/O engine selection
//!
//! Only two host families exist: macOS uses `posixaio`, everything else
//! `libaio`. The choice is made at compile time.

use std::fmt;

/// fio `--ioengine` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoEngine {
    PosixAio,
    LibAio,
}

impl IoEngine {
    /// Engine for the platform this binary was built for
    pub const fn for_host() -> Self {
        if cfg!(target_os = "macos") {
            IoEngine::PosixAio
        } else {
            IoEngine::LibAio
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IoEngine::PosixAio => "posixaio",
            IoEngine::LibAio => "libaio",
        }
    }
}

impl fmt::Display for IoEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a random-access fio job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoDirection {
    Read,
    Write,
}

impl IoDirection {
    /// fio job name and `--rw` mode
    pub fn job_name(&self) -> &'static str {
        match self {
            IoDirection::Read => "randread",
            IoDirection::Write => "randwrite",
        }
    }
}
