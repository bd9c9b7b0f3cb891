//! cloudbench - periodic cloud host benchmark
//!
//! Each run measures CDN download throughput, network latency and
//! bandwidth, CPU time, disk IOPS and disk latency, then appends one
//! row to the output CSV.

mod cli;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use libcloudbench_core::{load_settings, BenchSettings, CloudBenchError, CsvSink};
use libcloudbench_engine::{Pipeline, ProcessRunner, Scheduler, SchedulerState};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!(code = e.error_code(), "startup failed: {}", e);
            output::output_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Run the schedule on a current-thread runtime until the limit or a signal
fn run(cli: &Cli) -> Result<ExitCode, CloudBenchError> {
    let mut scheduler = prepare(cli)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    output::print_underway(cli);

    let interrupted = runtime.block_on(async {
        tokio::select! {
            summary = scheduler.run() => {
                output::print_complete(cli, &summary);
                false
            }
            _ = setup_signal_handlers() => {
                info!("received shutdown signal");
                output::print_interrupted(cli);
                true
            }
        }
    });

    if interrupted {
        // The CPU workload may still hold a blocking thread
        runtime.shutdown_background();
    }
    Ok(ExitCode::SUCCESS)
}

/// Load settings, build the pipeline and write the CSV header
fn prepare(cli: &Cli) -> Result<Scheduler<ProcessRunner>, CloudBenchError> {
    let settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => BenchSettings::default(),
    };

    let pipeline = Pipeline::from_settings(&settings, cli.pipeline_options())?;
    info!(
        probes = pipeline.probes().len(),
        columns = pipeline.schema().len(),
        cdn = !cli.nocdn,
        disk = !cli.nodisk,
        "pipeline ready"
    );

    let sink = CsvSink::create(cli.out.clone(), pipeline.schema())?;
    let state = SchedulerState::new(cli.interval(), cli.limit)?;

    Ok(Scheduler::new(state, pipeline, sink, ProcessRunner))
}

/// Resolves on Ctrl+C or SIGTERM
async fn setup_signal_handlers() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
