use std::thread;
use std::time::Duration;

use crate::{Buffer, ReclaimQueue, RetentionSet};

const FILL: u8 = b's';

/// Parameters of the escalating single-thread workload.
///
/// The defaults reproduce the canonical escalation scenario: starting from 512 byte
/// units against a 128 MiB budget, each round allocates as many units as the
/// remaining budget allows, keeps one in four of them forever, then doubles the unit
/// size for the next round.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct EscalateOptions {
    /// Unit size of the first round, in bytes. Must be positive; it strictly doubles
    /// every round, which bounds the number of rounds.
    pub initial_unit_size: u64,

    /// Total allocation budget in bytes. The loop ends once the unit size exceeds
    /// what remains of this budget.
    pub budget_bytes: u64,

    /// Bytes subtracted from each unit to model an implementation-defined
    /// allocation header cost, so the underlying allocation request lands exactly
    /// on the unit size. Not load bearing; zero works fine.
    pub header_overhead: u64,

    /// Pause inserted before each sweep, letting the process settle so external
    /// resident-memory sampling can observe the mid-run state.
    pub settle_delay: Duration,
}

impl Default for EscalateOptions {
    fn default() -> Self {
        Self {
            initial_unit_size: 512,
            budget_bytes: 128 * 1024 * 1024,
            header_overhead: 16,
            settle_delay: Duration::from_millis(200),
        }
    }
}

/// What an escalation run leaves behind: the grown retention set, alive for external
/// inspection, and the number of rounds it took to exhaust the budget.
#[derive(Debug)]
pub struct EscalateOutcome {
    retained: RetentionSet,
    rounds: usize,
}

impl EscalateOutcome {
    /// The single shared retention set, holding every survivor of every round.
    #[must_use]
    pub fn retained(&self) -> &RetentionSet {
        &self.retained
    }

    /// Sum of retained payload bytes.
    #[must_use]
    pub fn retained_bytes(&self) -> u64 {
        self.retained.retained_bytes()
    }

    /// Number of allocation rounds performed before the budget ran out.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

/// Whether the buffer at `index` within a round survives into the retention set.
///
/// One in four survives. The original workload applied a keep-first-of-each-pair
/// filter twice in succession, which nets exactly the indexes divisible by four.
fn survives(index: u64) -> bool {
    index % 4 == 0
}

/// Runs the escalating workload to completion, leaving the process in a fragmented
/// state for external inspection.
///
/// Strictly single threaded: allocation, the settling pause and the reclamation
/// sweep are all synchronous, blocking steps with nothing overlapping them. The
/// budget decrement deliberately uses the post-doubling unit size, an approximation
/// of the bytes retained in the round that is preserved from the original workload
/// to keep termination behavior identical.
///
/// # Panics
///
/// Panics if `initial_unit_size` is zero. Allocation failure is fatal and unhandled;
/// running out of memory is the stress condition this workload probes.
#[expect(
    clippy::integer_division,
    reason = "the unit count and budget decrement intentionally truncate, matching the workload definition"
)]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "all quantities are bounded by the initial budget, far below u64::MAX"
)]
#[cfg_attr(test, mutants::skip)] // Timing-dependent: mutating the settle delay is not observable.
#[must_use]
pub fn escalate(options: &EscalateOptions) -> EscalateOutcome {
    assert!(
        options.initial_unit_size > 0,
        "initial_unit_size must be positive for the unit doubling to terminate"
    );

    let mut remaining = options.budget_bytes;
    let mut unit_size = options.initial_unit_size;
    let mut retained = RetentionSet::new();
    let mut reclaim = ReclaimQueue::new();
    let mut rounds = 0_usize;

    while remaining >= unit_size {
        let effective_size = unit_size.saturating_sub(options.header_overhead);
        let effective_size =
            usize::try_from(effective_size).expect("unit size exceeds addressable memory");
        let count = remaining / unit_size;

        // Allocate the whole round, keep one in four, defer the rest.
        for index in 0..count {
            let buffer = Buffer::filled(effective_size, FILL);

            if survives(index) {
                retained.push(buffer);
            } else {
                reclaim.defer(buffer);
            }
        }

        thread::sleep(options.settle_delay);
        reclaim.sweep();

        unit_size = unit_size
            .checked_mul(2)
            .expect("unit size overflows u64 before the budget is exhausted");
        remaining = remaining.saturating_sub(count * unit_size / 4);
        rounds += 1;
    }

    thread::sleep(options.settle_delay);
    reclaim.sweep();

    EscalateOutcome { retained, rounds }
}

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(EscalateOptions: Send, Sync, Debug);
    assert_impl_all!(EscalateOutcome: Send, Debug);

    fn fast_options() -> EscalateOptions {
        let mut options = EscalateOptions::default();
        options.settle_delay = Duration::ZERO;
        options.header_overhead = 0;
        options
    }

    fn survivor_count(round_len: u64) -> u64 {
        (0..round_len).filter(|index| survives(*index)).count() as u64
    }

    #[test]
    fn one_in_four_survives() {
        assert_eq!(survivor_count(16), 4);
        assert_eq!(survivor_count(0), 0);

        // Non-multiples of four round up: the first element of a partial group of
        // four still survives.
        assert_eq!(survivor_count(17), 5);
        assert_eq!(survivor_count(3), 1);
    }

    #[test]
    fn exact_small_run() {
        // remaining=256, unit=16: count=16, 4 survive, unit becomes 32, remaining 128.
        // remaining=128, unit=32: count=4, 1 survives, unit becomes 64, remaining 64.
        // remaining=64, unit=64: count=1, 1 survives, unit becomes 128, remaining 32.
        // 32 < 128, done.
        let mut options = fast_options();
        options.initial_unit_size = 16;
        options.budget_bytes = 256;

        let outcome = escalate(&options);

        assert_eq!(outcome.rounds(), 3);
        assert_eq!(outcome.retained().len(), 6);
        assert_eq!(outcome.retained_bytes(), 4 * 16 + 32 + 64);
    }

    #[test]
    fn terminates_within_geometric_bound() {
        let mut options = fast_options();
        options.initial_unit_size = 8;
        options.budget_bytes = 1024 * 1024;

        let outcome = escalate(&options);

        // unit_size strictly doubles, so rounds <= log2(budget / initial) + 1.
        let bound = (options.budget_bytes / options.initial_unit_size).ilog2() as usize + 1;
        assert!(outcome.rounds() <= bound);
        assert!(outcome.rounds() > 0);
    }

    #[test]
    fn budget_below_unit_size_does_nothing() {
        let mut options = fast_options();
        options.initial_unit_size = 1024;
        options.budget_bytes = 512;

        let outcome = escalate(&options);

        assert_eq!(outcome.rounds(), 0);
        assert!(outcome.retained().is_empty());
    }

    #[test]
    fn header_overhead_shrinks_payloads_only() {
        let mut options = fast_options();
        options.initial_unit_size = 64;
        options.budget_bytes = 256;
        options.header_overhead = 16;

        let outcome = escalate(&options);

        // remaining=256, unit=64: count=4, 1 survives at 64-16=48 bytes, remaining 128.
        // remaining=128, unit=128: count=1, 1 survives at 128-16=112 bytes, remaining 64.
        // 64 < 256, done. Overhead shrinks payloads, never buffer counts.
        assert_eq!(outcome.rounds(), 2);
        assert_eq!(outcome.retained().len(), 2);
        assert_eq!(outcome.retained_bytes(), 48 + 112);
    }

    #[test]
    #[should_panic(expected = "initial_unit_size must be positive")]
    fn zero_unit_size_is_rejected() {
        let mut options = fast_options();
        options.initial_unit_size = 0;

        drop(escalate(&options));
    }
}
