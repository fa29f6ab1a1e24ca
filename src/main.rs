use std::thread;
use std::time::Duration;

use anyhow::{ensure, Result};
use chronotree::{
    Profiler, ProfilerConfig, Timestamp, print_summary, section_end, section_guard, section_start,
    time_section, time_subsection,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chronotree", about = "Hierarchical wall-clock section profiler demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a nested-sleep walkthrough and print its summary table.
    Demo {
        /// Milliseconds per sleep unit (the walkthrough sleeps 20 units total).
        #[arg(long, default_value_t = 100)]
        scale_ms: u64,
    },
    /// Record empty sections and report the raw per-section cost.
    Overhead {
        /// Root sections to record.
        #[arg(long, default_value_t = 100_000)]
        sections: usize,
        /// Nesting depth of each root section.
        #[arg(long, default_value_t = 4)]
        depth: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { scale_ms } => run_demo(scale_ms),
        Commands::Overhead { sections, depth } => run_overhead(sections, depth)?,
    }

    Ok(())
}

/// Exercises every public operation: root phases via `time_section`,
/// inner phases via `time_subsection`, a manual start/end pair, and a
/// guard inside a helper function.
fn run_demo(scale_ms: u64) {
    time_section("main");

    time_subsection("load fixture", 1);
    load_fixture(scale_ms);

    section_start("checksum");
    sleep_units(2.5, scale_ms);
    section_end();

    time_subsection("checksum again", 2);
    sleep_units(2.5, scale_ms);

    time_subsection("transform", 1);
    sleep_units(5.0, scale_ms);

    print_summary();
}

fn load_fixture(scale_ms: u64) {
    let _guard = section_guard("read input");
    sleep_units(10.0, scale_ms);
}

fn sleep_units(units: f64, scale_ms: u64) {
    thread::sleep(Duration::from_micros((units * scale_ms as f64 * 1e3) as u64));
}

/// Times `sections` x `depth` empty start/end pairs against a dedicated
/// profiler so the report machinery stays out of the measurement.
fn run_overhead(sections: usize, depth: usize) -> Result<()> {
    ensure!(sections > 0, "--sections must be at least 1");
    ensure!(depth > 0, "--depth must be at least 1");

    let recorded = sections * depth;
    let mut profiler = Profiler::with_config(ProfilerConfig {
        stack_capacity: depth,
        summary_capacity: recorded,
    });

    let clock = Timestamp::now();
    for _ in 0..sections {
        for _ in 0..depth {
            profiler.start("tick");
        }
        for _ in 0..depth {
            profiler.end();
        }
    }
    let total = clock.elapsed_seconds();

    println!(
        "recorded {} sections ({} roots x depth {}) in {:.6}s: {:.1} ns per start/end pair",
        recorded,
        sections,
        depth,
        total,
        total / recorded as f64 * 1e9
    );

    Ok(())
}
