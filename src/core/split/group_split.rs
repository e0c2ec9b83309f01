//! Group-aware shuffle split.
//!
//! Splits a set of group keys into a kept side and a holdout side. The
//! holdout receives `ceil(ratio * n)` groups from the front of a seeded
//! shuffle of the sorted keys, the kept side receives the rest.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

/// Two disjoint sets of group keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSplit<'a> {
    pub kept: BTreeSet<&'a str>,
    pub holdout: BTreeSet<&'a str>,
}

/// Number of groups placed in the holdout for `total` groups
pub fn holdout_count(total: usize, holdout_ratio: f64) -> usize {
    ((total as f64 * holdout_ratio).ceil() as usize).min(total)
}

/// Split `groups` with a fresh RNG seeded from `seed`
pub fn group_shuffle_split<'a>(
    groups: &BTreeSet<&'a str>,
    holdout_ratio: f64,
    seed: u64,
) -> GroupSplit<'a> {
    let mut order: Vec<&'a str> = groups.iter().copied().collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let n_holdout = holdout_count(order.len(), holdout_ratio);
    let kept = order.split_off(n_holdout);

    GroupSplit {
        kept: kept.into_iter().collect(),
        holdout: order.into_iter().collect(),
    }
}
