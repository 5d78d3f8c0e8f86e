//! Runs a scaled-down escalating workload and prints what each round left behind.

#![allow(
    missing_docs,
    reason = "No need for API documentation in example code"
)]

use std::time::Duration;

use heap_churn::EscalateOptions;

fn main() {
    let mut options = EscalateOptions::default();
    options.initial_unit_size = 256;
    options.budget_bytes = 4 * 1024 * 1024;
    options.settle_delay = Duration::from_millis(10);

    let outcome = heap_churn::escalate(&options);

    println!(
        "{} rounds, {} buffers retained, {} bytes live",
        outcome.rounds(),
        outcome.retained().len(),
        outcome.retained_bytes()
    );
}
