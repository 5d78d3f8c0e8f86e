//! Synthetic allocation-pressure workloads for reproducing allocator arena fragmentation.
//!
//! Allocators that maintain per-thread arenas or caches can fragment badly when many
//! medium-to-large, variably sized, short-lived buffers are churned concurrently while a
//! smaller set of long-lived buffers pins the arenas in place. The result is a process
//! whose resident set size far exceeds its logically live bytes. This package generates
//! exactly that allocation pattern, deterministically, so the gap can be measured and
//! compared across allocators.
//!
//! Two workload variants are provided:
//!
//! * [`churn()`] runs a fixed number of worker threads, each simulating a sequence of
//!   "requests" that allocate a batch of randomly sized buffers and then randomly evict
//!   most of them, leaving fragmented holes behind.
//! * [`escalate()`] runs on a single thread, allocating geometrically growing fixed-size
//!   buffers round after round, retaining one in four of each round, until a byte budget
//!   is exhausted.
//!
//! Both variants account for their live data via [`RetentionSet`] collections; summing
//! those with [`total_bytes()`] gives the logical ground truth to compare against the
//! OS-reported resident set size.
//!
//! # Example
//!
//! ```
//! use heap_churn::{ChurnOptions, total_bytes};
//! use new_zealand::nz;
//!
//! let mut options = ChurnOptions::default();
//! options.workers = nz!(2);
//! options.requests_per_worker = 2;
//! options.batch_size = 100;
//!
//! let outcome = heap_churn::churn(&options);
//!
//! assert_eq!(
//!     outcome.total_retained_bytes(),
//!     total_bytes(outcome.retained())
//! );
//! ```
//!
//! # Determinism
//!
//! For a fixed seed and fixed parameters, both workloads retain exactly the same bytes
//! on every run. Each churn worker derives its own random generator from the global
//! seed and its worker index, so thread scheduling has no influence on the outcome.

mod buffer;
mod churn;
mod escalate;
mod reclaim;
mod retention;

pub use buffer::Buffer;
pub use churn::{ChurnOptions, ChurnOutcome, churn};
pub use escalate::{EscalateOptions, EscalateOutcome, escalate};
pub use reclaim::ReclaimQueue;
pub use retention::{RetentionSet, total_bytes};
