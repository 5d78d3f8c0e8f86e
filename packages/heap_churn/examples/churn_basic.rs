//! Runs a scaled-down churn workload and prints the logical bytes it retained.

#![allow(
    missing_docs,
    reason = "No need for API documentation in example code"
)]

use heap_churn::ChurnOptions;
use new_zealand::nz;

fn main() {
    let mut options = ChurnOptions::default();
    options.workers = nz!(4);
    options.requests_per_worker = 10;
    options.batch_size = 200;

    let outcome = heap_churn::churn(&options);

    println!(
        "{} workers retained {} bytes across {} collections",
        options.workers,
        outcome.total_retained_bytes(),
        outcome.retained().len()
    );
}
