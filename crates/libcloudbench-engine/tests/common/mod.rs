//! Scripted tool runner shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use libcloudbench_engine::{RawOutput, ToolError, ToolRunner};

type Handler = Box<dyn Fn(&[String]) -> Result<RawOutput, ToolError> + Send + Sync>;

pub const FIO_READ: &str = r#"{"fio version":"fio-3.28","jobs":[{"jobname":"randread","read":{"iops":41000.5},"write":{"iops":0.0}}]}"#;
pub const FIO_WRITE: &str = r#"{"fio version":"fio-3.28","jobs":[{"jobname":"randwrite","read":{"iops":0.0},"write":{"iops":23000.25}}]}"#;
pub const IOPING: &str = "--- . (ext4 /dev/sda1) ioping statistics ---\nmin/avg/max/mdev = 120.1 us / 250.3 us / 1.20 ms / 100.2 us\n";
pub const SPEEDTEST: &str = r#"{"type":"result","ping":{"latency":9.75},"download":{"bandwidth":20971520},"upload":{"bandwidth":10485760}}"#;

/// Answers tool invocations from per-program handlers and records every call
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    handlers: Arc<Mutex<HashMap<String, Arc<Handler>>>>,
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner answering every tool with healthy output
    pub fn healthy() -> Self {
        let runner = Self::new();
        runner.on("curl", |_| Ok(RawOutput::ok("10485760.000\n")));
        runner.on("speedtest", |_| Ok(RawOutput::ok(SPEEDTEST)));
        runner.on("fio", |args| {
            if args.iter().any(|a| a == "--rw=randread") {
                Ok(RawOutput::ok(FIO_READ))
            } else {
                Ok(RawOutput::ok(FIO_WRITE))
            }
        });
        runner.on("ioping", |_| Ok(RawOutput::ok(IOPING)));
        runner
    }

    pub fn on<F>(&self, program: &str, handler: F)
    where
        F: Fn(&[String]) -> Result<RawOutput, ToolError> + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap()
            .insert(program.to_string(), Arc::new(Box::new(handler)));
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|(p, _)| p).collect()
    }

    pub fn count(&self, program: &str) -> usize {
        self.calls().iter().filter(|(p, _)| p == program).count()
    }
}

impl ToolRunner for ScriptedRunner {
    async fn invoke(
        &self,
        program: &str,
        args: &[String],
        _timeout: Option<Duration>,
    ) -> Result<RawOutput, ToolError> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        let handler = self.handlers.lock().unwrap().get(program).cloned();
        match handler {
            Some(handler) => (*handler)(args),
            None => Err(ToolError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not scripted"),
            }),
        }
    }
}

pub fn timeout_error(program: &str) -> ToolError {
    ToolError::Timeout {
        program: program.to_string(),
        after: Duration::from_secs(15),
    }
}
