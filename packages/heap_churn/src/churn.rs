use std::num::NonZero;
use std::thread;

use new_zealand::nz;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{Buffer, RetentionSet};

/// Every buffer in the churn workload carries the same fill byte; only lengths vary.
const FILL: u8 = b'a';

/// Seed mixing constant for deriving per-worker generators (the splitmix64 gamma).
const WORKER_SEED_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Parameters of the concurrent churn workload.
///
/// The defaults reproduce the canonical arena fragmentation scenario: 10 workers, each
/// serving 100 requests, each request allocating 1000 buffers sized
/// `97 + random(0..4000) * 10` bytes and then randomly evicting roughly 90% of the
/// worker's retained set, leaving low-density holes across the heap.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct ChurnOptions {
    /// Number of worker threads running the request loop in parallel.
    pub workers: NonZero<usize>,

    /// Number of simulated requests each worker serves.
    pub requests_per_worker: usize,

    /// Number of buffers allocated per request, and also the number of eviction
    /// attempts made per request.
    pub batch_size: usize,

    /// Minimum buffer length in bytes.
    pub size_min: usize,

    /// Number of distinct random size steps. Must be at least 1.
    pub size_steps: usize,

    /// Byte width of one size step. Buffer lengths are
    /// `size_min + random(0..size_steps) * size_step`, a wide distribution biased
    /// toward the low end.
    pub size_step: usize,

    /// Probability that any single eviction attempt removes a buffer.
    pub discard_probability: f64,

    /// Global seed. Together with a worker's index it fully determines that worker's
    /// random stream, so results are reproducible regardless of thread scheduling.
    pub seed: u64,
}

impl Default for ChurnOptions {
    fn default() -> Self {
        Self {
            workers: nz!(10),
            requests_per_worker: 100,
            batch_size: 1000,
            size_min: 97,
            size_steps: 4000,
            size_step: 10,
            discard_probability: 0.9,
            seed: 1234,
        }
    }
}

/// What a churn run leaves behind.
///
/// The retained sets stay alive inside the outcome, so resident memory can be
/// sampled against genuinely live data before the outcome is dropped.
#[derive(Debug)]
pub struct ChurnOutcome {
    retained: Vec<RetentionSet>,
    total_retained_bytes: u64,
}

impl ChurnOutcome {
    /// Sum of retained payload bytes across all workers.
    #[must_use]
    pub fn total_retained_bytes(&self) -> u64 {
        self.total_retained_bytes
    }

    /// The per-worker retention sets, in worker index order.
    #[must_use]
    pub fn retained(&self) -> &[RetentionSet] {
        &self.retained
    }
}

/// Runs the concurrent churn workload to completion and returns the retained data.
///
/// One OS thread is spawned per configured worker. Workers share nothing; each owns a
/// private retention set and random generator. The calling thread blocks until every
/// worker has finished, then aggregates the per-worker totals.
///
/// # Panics
///
/// Panics if any worker panics (the whole run is aborted, no partial totals are
/// produced) or if the options are out of range.
#[must_use]
pub fn churn(options: &ChurnOptions) -> ChurnOutcome {
    assert!(
        options.size_steps > 0,
        "size_steps must be at least 1 to form a size distribution"
    );
    assert!(
        (0.0..=1.0).contains(&options.discard_probability),
        "discard_probability must be a probability in [0.0, 1.0]"
    );

    let worker_results = thread::scope(|scope| {
        let join_handles: Vec<_> = (0..options.workers.get())
            .map(|worker_index| scope.spawn(move || churn_worker(options, worker_index)))
            .collect();

        join_handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .expect("churn worker panicked - aborting the whole run")
            })
            .collect::<Vec<_>>()
    });

    let mut retained = Vec::with_capacity(worker_results.len());
    let mut total_retained_bytes: u64 = 0;

    for (set, worker_bytes) in worker_results {
        total_retained_bytes = total_retained_bytes
            .checked_add(worker_bytes)
            .expect("retained byte total overflows u64 - this indicates an unrealistic scenario");
        retained.push(set);
    }

    ChurnOutcome {
        retained,
        total_retained_bytes,
    }
}

/// The request loop of a single worker.
///
/// Per request: allocate a batch of randomly sized buffers, then make one eviction
/// attempt per allocated buffer. Each attempt first draws the discard probability and
/// only then, if the eviction proceeds and the set is non-empty, draws a uniformly
/// random index into the current (shrinking) set. An attempt against an empty set is
/// a no-op and consumes no index draw.
///
/// An evicted buffer is dropped on the spot. Exclusive ownership makes reclamation
/// immediate, mirroring the continuous collection that kept the original scenario's
/// resident footprint near its retained bytes; holding evicted buffers any longer
/// would let the live set track the cumulative allocation volume instead.
#[expect(
    clippy::arithmetic_side_effects,
    reason = "buffer length math is bounded by the size parameters, far below usize::MAX"
)]
fn churn_worker(options: &ChurnOptions, worker_index: usize) -> (RetentionSet, u64) {
    let mut rng = worker_rng(options.seed, worker_index);
    let mut saved = RetentionSet::new();

    for _ in 0..options.requests_per_worker {
        for _ in 0..options.batch_size {
            let len = options.size_min + rng.random_range(0..options.size_steps) * options.size_step;
            saved.push(Buffer::filled(len, FILL));
        }

        for _ in 0..options.batch_size {
            if rng.random_bool(options.discard_probability) && !saved.is_empty() {
                let index = rng.random_range(0..saved.len());
                drop(saved.remove_at(index));
            }
        }
    }

    let worker_bytes = saved.retained_bytes();
    (saved, worker_bytes)
}

/// Derives a worker's private generator from the global seed and the worker index.
///
/// Deterministic by construction: no cross-thread ordering can influence which values
/// a worker draws, unlike a single shared generator consumed under a lock.
fn worker_rng(seed: u64, worker_index: usize) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ (worker_index as u64).wrapping_mul(WORKER_SEED_GAMMA))
}

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::total_bytes;

    assert_impl_all!(ChurnOptions: Send, Sync, Debug);
    assert_impl_all!(ChurnOutcome: Send, Debug);

    fn small_options() -> ChurnOptions {
        let mut options = ChurnOptions::default();
        options.workers = nz!(2);
        options.requests_per_worker = 3;
        options.batch_size = 50;
        options.size_steps = 40;
        options
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let options = small_options();

        let first = churn(&options);
        let second = churn(&options);

        assert_eq!(
            first.total_retained_bytes(),
            second.total_retained_bytes()
        );

        for (a, b) in first.retained().iter().zip(second.retained()) {
            assert_eq!(a.len(), b.len());
            assert_eq!(a.retained_bytes(), b.retained_bytes());
        }
    }

    #[test]
    fn total_equals_sum_of_worker_totals() {
        let outcome = churn(&small_options());

        assert_eq!(
            outcome.total_retained_bytes(),
            total_bytes(outcome.retained())
        );
    }

    #[test]
    fn one_retention_set_per_worker() {
        let mut options = small_options();
        options.workers = nz!(3);

        let outcome = churn(&options);

        assert_eq!(outcome.retained().len(), 3);
    }

    #[test]
    fn single_worker_single_request_is_reproducible() {
        // The realistic single-worker scenario whose retained total serves as the
        // golden value for this generator scheme.
        let mut options = ChurnOptions::default();
        options.workers = nz!(1);
        options.requests_per_worker = 1;

        let first = churn(&options);
        let second = churn(&options);

        assert_eq!(
            first.total_retained_bytes(),
            second.total_retained_bytes()
        );
        assert!(first.total_retained_bytes() > 0);
    }

    #[test]
    fn never_discarding_retains_every_allocation() {
        let mut options = small_options();
        options.discard_probability = 0.0;

        let outcome = churn(&options);

        let expected_buffers = options.workers.get()
            * options.requests_per_worker
            * options.batch_size;
        let actual_buffers: usize = outcome.retained().iter().map(RetentionSet::len).sum();

        assert_eq!(actual_buffers, expected_buffers);
    }

    #[test]
    #[should_panic(expected = "size_steps must be at least 1")]
    fn zero_size_steps_is_rejected() {
        let mut options = small_options();
        options.size_steps = 0;

        drop(churn(&options));
    }
}
