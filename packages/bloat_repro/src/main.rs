//! Command line harness for the allocation-pressure workloads.
//!
//! Runs one workload variant to completion, then prints the logical retained size
//! next to the OS-reported resident set size. The difference between the two numbers
//! is the fragmentation the active allocator produced under the workload; compare
//! runs under different allocators (or allocator tunings such as `MALLOC_ARENA_MAX`)
//! to judge them against each other.
//!
//! # Usage
//!
//! ```text
//! bloat_repro churn [--seed <N>]
//! bloat_repro escalate
//! ```
//!
//! The churn variant reads its worker thread count from the `CHURN_WORKERS`
//! environment variable (default 10). The escalating variant runs with its fixed
//! canonical parameters: 512 byte initial units against a 128 MiB budget.
//!
//! Output is a human-readable line with the retained total, followed by the
//! platform's RSS readout when one is available:
//!
//! ```text
//! Total string size: 1903MB
//! VmRSS:     2831832 kB
//! ```
//!
//! The escalate variant reports its total as `Total retained size: <N>MB` instead,
//! keeping the churn line's wording reserved for the concurrent scenario.
//!
//! The RSS line is omitted, silently, on platforms without a supported source.

use std::env;
use std::num::NonZero;

use argh::FromArgs;
use heap_churn::{ChurnOptions, EscalateOptions};
use new_zealand::nz;

/// Environment variable holding the churn worker thread count.
const WORKER_COUNT_ENV: &str = "CHURN_WORKERS";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Reproduce allocator arena fragmentation and report logical vs resident memory.
#[derive(Debug, FromArgs)]
struct Args {
    #[argh(subcommand)]
    command: WorkloadCommand,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum WorkloadCommand {
    Churn(ChurnArgs),
    Escalate(EscalateArgs),
}

/// Run the concurrent churn workload: parallel workers allocating and randomly
/// evicting variably sized buffers.
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "churn")]
struct ChurnArgs {
    /// seed for the deterministic random streams (default 1234)
    #[argh(option, default = "1234")]
    seed: u64,
}

/// Run the escalating single-thread workload: geometrically growing buffers until a
/// 128 MiB budget is exhausted.
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "escalate")]
struct EscalateArgs {}

fn main() {
    let args: Args = argh::from_env();

    match args.command {
        WorkloadCommand::Churn(churn_args) => run_churn(&churn_args),
        WorkloadCommand::Escalate(_) => run_escalate(),
    }
}

fn run_churn(args: &ChurnArgs) {
    let mut options = ChurnOptions::default();
    options.workers = worker_count_from_env();
    options.seed = args.seed;

    let outcome = heap_churn::churn(&options);

    let summary = churn_summary(outcome.total_retained_bytes());
    println!("{summary}");
    print_rss_line();

    // The retained sets must stay alive until after the RSS readout.
    drop(outcome);
}

fn run_escalate() {
    let outcome = heap_churn::escalate(&EscalateOptions::default());

    let summary = escalate_summary(outcome.retained_bytes());
    println!("{summary}");
    print_rss_line();

    drop(outcome);
}

/// The churn report line. The wording is preserved verbatim from the scenario this
/// tool reproduces so existing result tables remain directly comparable.
#[expect(
    clippy::integer_division,
    reason = "megabyte readout intentionally truncates"
)]
fn churn_summary(total_retained_bytes: u64) -> String {
    format!("Total string size: {}MB", total_retained_bytes / BYTES_PER_MB)
}

/// The escalate report line. Distinct wording, so the churn line above stays
/// unambiguous as the canonical output of the concurrent scenario.
#[expect(
    clippy::integer_division,
    reason = "megabyte readout intentionally truncates"
)]
fn escalate_summary(retained_bytes: u64) -> String {
    format!("Total retained size: {}MB", retained_bytes / BYTES_PER_MB)
}

/// Copies the platform's RSS-bearing status line to stdout, if one exists.
///
/// Platforms without a supported source simply do not get the line; the run itself
/// still succeeds.
fn print_rss_line() {
    if let Some(line) = rss_probe::vm_rss_line() {
        println!("{line}");
    }
}

fn worker_count_from_env() -> NonZero<usize> {
    env::var(WORKER_COUNT_ENV)
        .ok()
        .and_then(|value| parse_worker_count(&value))
        .unwrap_or(nz!(10))
}

/// Parses a worker count, rejecting anything that is not a positive integer.
fn parse_worker_count(value: &str) -> Option<NonZero<usize>> {
    value.trim().parse().ok()
}
