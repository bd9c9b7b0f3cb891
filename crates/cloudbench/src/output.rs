use libcloudbench_core::CloudBenchError;
use libcloudbench_engine::ScheduleSummary;

use crate::cli::Cli;

/// Printed once the header is written
pub fn print_underway(cli: &Cli) {
    println!(
        "Benchmark underway: {} runs at {} second intervals, writing {}",
        cli.limit,
        cli.interval,
        cli.out.display()
    );
}

/// Printed when the run limit is reached
pub fn print_complete(cli: &Cli, summary: &ScheduleSummary) {
    println!(
        "Benchmark complete! {} of {} runs recorded in {}",
        summary.runs_recorded,
        summary.runs_started,
        cli.out.display()
    );
}

/// Printed when a signal stops the schedule early
pub fn print_interrupted(cli: &Cli) {
    println!("Benchmark interrupted; rows written so far are in {}", cli.out.display());
}

/// Output a startup error
pub fn output_error(err: &CloudBenchError) {
    eprintln!("error: {}", err);
    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        eprintln!();
        eprintln!("Suggestions:");
        for suggestion in suggestions {
            eprintln!("  - {}", suggestion);
        }
    }
}
