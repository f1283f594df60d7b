//! Parallel prefix enumeration for the meet-in-the-middle generator.
//!
//! The leading character of the prefix partitions the search space: each worker owns a
//! contiguous slice of the alphabet for the first position and the full alphabet for the
//! rest. Workers run on a dedicated rayon pool, probe the shared read-only [`LookupTable`]
//! and claim output slots from a shared [`KeyBudget`]. A worker stops enumerating as soon as
//! the budget is exhausted.

use std::any::Any;
use std::ops::RangeInclusive;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;
use rayon::prelude::*;

use super::meet_in_the_middle::{LookupTable, SearchParams};
use crate::error::{Error, Result};
use crate::hashing::{HashFunction, HashValue};
use crate::progress::ProgressMonitor;

/// Upper bound on the number of keys all workers may still emit.
#[derive(Debug)]
pub struct KeyBudget {
    limit: usize,
    claimed: AtomicUsize,
}

impl KeyBudget {
    /// Creates a budget of `limit` keys.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            claimed: AtomicUsize::new(0),
        }
    }

    /// Claims one slot, returning its zero-based index, or `None` once the budget is spent.
    ///
    /// The claim is a compare-and-swap loop, so concurrent callers never exceed the limit.
    pub fn try_claim(&self) -> Option<usize> {
        self.claimed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |claimed| {
                (claimed < self.limit).then(|| claimed + 1)
            })
            .ok()
    }

    /// Whether every slot has been claimed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.claimed.load(Ordering::Acquire) >= self.limit
    }

    /// Marks the budget spent so that every worker winds down.
    pub fn exhaust(&self) {
        self.claimed.store(self.limit, Ordering::Release);
    }

    /// Number of slots claimed so far.
    pub fn claimed(&self) -> usize {
        self.claimed.load(Ordering::Acquire)
    }

    /// Total number of slots.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Inclusive range of leading characters assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPartition {
    /// First leading character.
    pub first: u8,
    /// Last leading character.
    pub last: u8,
}

impl SearchPartition {
    /// The partition as a character range.
    pub fn range(&self) -> RangeInclusive<u8> {
        self.first..=self.last
    }

    /// Number of leading characters in the partition.
    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    /// Always false: partitions hold at least one character.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Splits `alphabet` into `workers` contiguous, disjoint ranges covering all of it.
///
/// Ranges have equal size except the last, which absorbs the remainder. The number of
/// workers is clamped to `1..=alphabet.len()`.
pub fn partition(alphabet: RangeInclusive<u8>, workers: usize) -> Vec<SearchPartition> {
    let (first, last) = alphabet.into_inner();
    if first > last {
        return Vec::new();
    }

    let size = (last - first) as usize + 1;
    let workers = workers.clamp(1, size);
    let interval = size / workers;

    (0..workers)
        .map(|i| {
            let start = first + (i * interval) as u8;
            let end = if i == workers - 1 {
                last
            } else {
                start + (interval - 1) as u8
            };
            SearchPartition {
                first: start,
                last: end,
            }
        })
        .collect()
}

struct Worker<'a> {
    hash: &'a HashFunction,
    table: &'a LookupTable,
    budget: &'a KeyBudget,
    monitor: &'a dyn ProgressMonitor,
    alphabet: RangeInclusive<u8>,
    prefix_len: usize,
}

impl Worker<'_> {
    fn run(&self, partition: SearchPartition) -> Result<Vec<String>> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut prefix = vec![0u8; self.prefix_len];
            let mut found = Vec::new();
            self.crack(
                &mut prefix,
                0,
                self.hash.initial_state(),
                partition.range(),
                &mut found,
            );
            found
        }));

        match outcome {
            Ok(found) => {
                debug!(
                    "Worker {:?} finished with {} keys",
                    partition.range(),
                    found.len()
                );
                Ok(found)
            }
            Err(payload) => {
                self.budget.exhaust();
                Err(Error::computation(format!(
                    "search worker {:?} panicked: {}",
                    partition.range(),
                    panic_message(payload.as_ref())
                )))
            }
        }
    }

    /// Depth-first enumeration carrying the hash state of the prefix built so far.
    fn crack(
        &self,
        prefix: &mut [u8],
        depth: usize,
        state: u32,
        choices: RangeInclusive<u8>,
        found: &mut Vec<String>,
    ) {
        if depth == prefix.len() {
            self.probe(prefix, state as HashValue, found);
            return;
        }

        for c in choices {
            if self.budget.is_exhausted() {
                break;
            }
            prefix[depth] = c;
            let next = self.hash.step(state, c as u16);
            self.crack(prefix, depth + 1, next, self.alphabet.clone(), found);
        }
    }

    fn probe(&self, prefix: &[u8], prefix_hash: HashValue, found: &mut Vec<String>) {
        let Some(suffix) = self.table.get(prefix_hash) else {
            return;
        };
        let Some(slot) = self.budget.try_claim() else {
            return;
        };

        let mut key = String::with_capacity(prefix.len() + suffix.len());
        key.extend(prefix.iter().map(|&b| b as char));
        key.push_str(suffix);
        found.push(key);
        self.monitor.update(slot + 1);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

/// Enumerates prefixes on `params.workers()` threads until `count` keys are found.
///
/// Results of different workers are concatenated in partition order; the order inside a
/// partition is lexicographic.
///
/// # Errors
/// [`Error::Computation`] if the pool cannot start, a worker panics, or every prefix was tried
/// before `count` keys were found. Partial results are discarded.
pub fn search(
    hash: &HashFunction,
    table: &LookupTable,
    params: &SearchParams,
    count: usize,
    monitor: &dyn ProgressMonitor,
) -> Result<Vec<String>> {
    let budget = KeyBudget::new(count);
    let partitions = partition(params.alphabet(), params.workers());
    debug!(
        "Searching {} prefixes of length {} on {} workers",
        hash.name(),
        params.prefix_len(),
        partitions.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(partitions.len())
        .thread_name(|i| format!("mitm-worker-{i}"))
        .build()
        .map_err(|e| Error::computation(format!("cannot start search workers: {e}")))?;

    let worker = Worker {
        hash,
        table,
        budget: &budget,
        monitor,
        alphabet: params.alphabet(),
        prefix_len: params.prefix_len(),
    };
    let batches = pool.install(|| {
        partitions
            .par_iter()
            .map(|&partition| worker.run(partition))
            .collect::<Result<Vec<_>>>()
    })?;

    let keys: Vec<String> = batches.into_iter().flatten().collect();
    if keys.len() < count {
        return Err(Error::computation(format!(
            "search space exhausted after {} of {} keys",
            keys.len(),
            count
        )));
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::meet_in_the_middle::tests::{toy_params, TOY};
    use crate::progress::NoProgressMonitor;
    use std::collections::HashSet;

    #[test]
    fn test_partition_covers_alphabet() {
        let parts = partition(b' '..=b'~', 4);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], SearchPartition { first: b' ', last: b' ' + 22 });
        assert_eq!(parts[3].last, b'~');
        assert_eq!(parts.iter().map(SearchPartition::len).sum::<usize>(), 95);
        for pair in parts.windows(2) {
            assert_eq!(pair[0].last + 1, pair[1].first);
        }
    }

    #[test]
    fn test_partition_clamps_workers() {
        let parts = partition(b'a'..=b'c', 10);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.len() == 1));
        assert_eq!(partition(b'a'..=b'c', 0).len(), 1);
        assert!(partition(b'c'..=b'a', 2).is_empty());
    }

    #[test]
    fn test_partition_last_absorbs_remainder() {
        let parts = partition(b'a'..=b'j', 3);
        let lens: Vec<usize> = parts.iter().map(SearchPartition::len).collect();
        assert_eq!(lens, vec![3, 3, 4]);
    }

    #[test]
    fn test_budget_never_overshoots() {
        let budget = KeyBudget::new(100);
        let claimed = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    while budget.try_claim().is_some() {
                        claimed.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });
        assert_eq!(claimed.load(Ordering::Relaxed), 100);
        assert_eq!(budget.claimed(), 100);
        assert!(budget.is_exhausted());
        assert!(budget.try_claim().is_none());
    }

    #[test]
    fn test_budget_exhaust() {
        let budget = KeyBudget::new(5);
        assert_eq!(budget.try_claim(), Some(0));
        assert_eq!(budget.try_claim(), Some(1));
        budget.exhaust();
        assert!(budget.is_exhausted());
        assert!(budget.try_claim().is_none());
        assert_eq!(budget.limit(), 5);
    }

    #[test]
    fn test_search_single_worker_is_lexicographic() {
        let params = SearchParams::builder()
            .table_size(4_096)
            .prefix_len(3)
            .suffix_len(2)
            .workers(1)
            .rng_seed(42)
            .build()
            .unwrap();
        let target = TOY.hash("seed");
        let table = LookupTable::build(&TOY, target, &params).unwrap();
        let keys = search(&TOY, &table, &params, 20, &NoProgressMonitor).unwrap();
        let again = search(&TOY, &table, &params, 20, &NoProgressMonitor).unwrap();
        let prefixes: Vec<&str> = keys.iter().map(|k| &k[..3]).collect();
        let mut sorted = prefixes.clone();
        sorted.sort();
        assert_eq!(prefixes, sorted);
        assert_eq!(keys, again);
    }

    #[test]
    fn test_search_reports_progress() {
        struct Counting(AtomicUsize, AtomicUsize);
        impl ProgressMonitor for Counting {
            fn update(&self, work: usize) {
                self.0.fetch_add(1, Ordering::Relaxed);
                self.1.fetch_max(work, Ordering::Relaxed);
            }
            fn done(&self) {}
        }

        let params = toy_params();
        let table = LookupTable::build(&TOY, TOY.hash("seed"), &params).unwrap();
        let monitor = Counting(AtomicUsize::new(0), AtomicUsize::new(0));
        let keys = search(&TOY, &table, &params, 25, &monitor).unwrap();
        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(unique.len(), 25);
        assert_eq!(monitor.0.load(Ordering::Relaxed), 25);
        assert_eq!(monitor.1.load(Ordering::Relaxed), 25);
    }

    #[test]
    fn test_worker_panic_becomes_computation_failure() {
        fn explode(_state: u32, unit: u16) -> u32 {
            if unit == b'~' as u16 {
                panic!("arithmetic anomaly");
            }
            0
        }
        fn identity(state: u32, _unit: u16) -> u32 {
            state
        }
        const EXPLODING: HashFunction =
            HashFunction::new("Exploding", 0, explode).with_backward(identity);

        let params = SearchParams::builder()
            .table_size(1)
            .prefix_len(1)
            .suffix_len(1)
            .alphabet(b'x'..=b'~')
            .workers(2)
            .build()
            .unwrap();
        // Table key is never 0 for a target of 1, so every worker enumerates to the end.
        let table = LookupTable::build(&EXPLODING, 1, &params).unwrap();
        let err = search(&EXPLODING, &table, &params, 1, &NoProgressMonitor).unwrap_err();
        match err {
            Error::Computation(msg) => assert!(msg.contains("arithmetic anomaly")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
