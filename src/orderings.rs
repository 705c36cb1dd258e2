//! Candidate Orderings
//!
//! The order processor is greedy, so the sequence orders are settled in
//! decides which orders get first claim on scarce limits. The batch optimizer
//! tries a bounded set of sequences generated here.

use rand::{Rng, seq::SliceRandom};
use rustc_hash::FxHashSet;

use crate::{config::OptimizerConfig, orders::Order};

/// A processing sequence, as indexes into the order batch.
pub type Ordering = Vec<usize>;

/// Draw attempts allowed per distinct permutation wanted before giving up.
const DRAWS_PER_PERMUTATION: usize = 64;

/// Generate the candidate orderings for `orders`.
///
/// - Batches of at most `exhaustive_threshold` orders get up to
///   `permutation_limit` distinct permutations (never more than the number of
///   permutations that exist), starting with the original order.
/// - Larger batches get the original order, descending and ascending by
///   value, and `random_shuffles` random shuffles.
///
/// The result is never empty.
pub fn candidate_orderings<R: Rng + ?Sized>(
    orders: &[Order],
    config: &OptimizerConfig,
    rng: &mut R,
) -> Vec<Ordering> {
    if orders.len() <= config.exhaustive_threshold {
        random_permutations(orders.len(), config.permutation_limit, rng)
    } else {
        heuristic_orderings(orders, config.random_shuffles, rng)
    }
}

/// Up to `limit` distinct permutations of `0..len`, identity first.
fn random_permutations<R: Rng + ?Sized>(len: usize, limit: usize, rng: &mut R) -> Vec<Ordering> {
    let identity: Ordering = (0..len).collect();
    let wanted = permutation_count(len).min(limit).max(1);

    let mut seen = FxHashSet::default();
    let mut orderings = Vec::with_capacity(wanted);

    seen.insert(identity.clone());
    orderings.push(identity.clone());

    let mut draws = wanted.saturating_mul(DRAWS_PER_PERMUTATION);

    while orderings.len() < wanted && draws > 0 {
        draws -= 1;

        let mut candidate = identity.clone();
        candidate.shuffle(rng);

        if seen.insert(candidate.clone()) {
            orderings.push(candidate);
        }
    }

    orderings
}

/// Original, descending value, ascending value, then `shuffles` shuffles.
fn heuristic_orderings<R: Rng + ?Sized>(
    orders: &[Order],
    shuffles: usize,
    rng: &mut R,
) -> Vec<Ordering> {
    let identity: Ordering = (0..orders.len()).collect();
    let value = |idx: &usize| orders.get(*idx).map(Order::value);

    let mut descending = identity.clone();
    descending.sort_by_key(|idx| std::cmp::Reverse(value(idx)));

    let mut ascending = identity.clone();
    ascending.sort_by_key(value);

    let mut orderings = Vec::with_capacity(3 + shuffles);

    orderings.push(identity.clone());
    orderings.push(descending);
    orderings.push(ascending);

    for _ in 0..shuffles {
        let mut shuffled = identity.clone();
        shuffled.shuffle(rng);
        orderings.push(shuffled);
    }

    orderings
}

/// `len!`, saturating at `usize::MAX`.
pub fn permutation_count(len: usize) -> usize {
    (2..=len).fold(1usize, |acc, n| acc.saturating_mul(n))
}
