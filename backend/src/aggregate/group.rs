//! Group-and-count primitives shared by every summary.
//!
//! Groups come out in ascending key order (`None` before any `Some`), and
//! the count sorts are stable, so equal counts keep that key order. This is
//! the tie-break for every top-N / bottom-N cutoff.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Count occurrences of each key, in ascending key order.
pub fn count_by<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Largest counts first; ties keep their current order.
pub fn sort_descending<K>(groups: &mut [(K, usize)]) {
    groups.sort_by(|a, b| b.1.cmp(&a.1));
}

/// Smallest counts first; ties keep their current order.
pub fn sort_ascending<K>(groups: &mut [(K, usize)]) {
    groups.sort_by(|a, b| a.1.cmp(&b.1));
}

/// Total count across groups.
pub fn total<K>(groups: &[(K, usize)]) -> usize {
    groups.iter().map(|(_, n)| n).sum()
}

/// Float usable as a group key, ordered with `f64::total_cmp`.
#[derive(Debug, Clone, Copy)]
pub struct Coord(pub f64);

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coord {}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
