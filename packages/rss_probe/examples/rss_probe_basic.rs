//! Prints the resident set size of this process before and after a large allocation.

#![allow(
    missing_docs,
    reason = "No need for API documentation in example code"
)]

fn main() {
    report("before");

    let ballast = vec![0_u8; 64 * 1024 * 1024];

    report("after allocating 64 MiB");
    drop(ballast);
}

fn report(moment: &str) {
    match rss_probe::current_process_resident_kb() {
        Some(kb) => println!("{moment}: {kb} kB resident"),
        None => println!("{moment}: resident set size not available on this platform"),
    }
}
