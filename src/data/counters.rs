// src/data/counters.rs

//! Implements [`AggregateCounters`], the per-event occurrence tally.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::common::Count;

/// Occurrence counts keyed by event type, or `event_type:user`.
///
/// Counts only increase during a scan. Counters of separate scans are
/// combined with [`merge`], a summation, so the merge order does not matter.
///
/// Keys iterate in sorted order.
///
/// [`merge`]: AggregateCounters::merge
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AggregateCounters {
    map: BTreeMap<String, Count>,
}

impl AggregateCounters {
    pub fn new() -> AggregateCounters {
        AggregateCounters::default()
    }

    /// Add one occurrence of `key`.
    pub fn increment(
        &mut self,
        key: String,
    ) {
        *self.map.entry(key).or_insert(0) += 1;
    }

    /// Add `count` occurrences of `key`.
    pub fn add(
        &mut self,
        key: String,
        count: Count,
    ) {
        *self.map.entry(key).or_insert(0) += count;
    }

    /// Sum `other` into `self`.
    pub fn merge(
        &mut self,
        other: AggregateCounters,
    ) {
        for (key, count) in other.map.into_iter() {
            self.add(key, count);
        }
    }

    /// Count for `key`, zero if never seen.
    pub fn get(
        &self,
        key: &str,
    ) -> Count {
        self.map
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> Count {
        self.map.values().sum()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Count> {
        self.map.iter()
    }
}

impl<'a> IntoIterator for &'a AggregateCounters {
    type Item = (&'a String, &'a Count);
    type IntoIter = btree_map::Iter<'a, String, Count>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl FromIterator<AggregateCounters> for AggregateCounters {
    /// Merge many `AggregateCounters` into one.
    fn from_iter<I: IntoIterator<Item = AggregateCounters>>(iter: I) -> Self {
        let mut counters = AggregateCounters::new();
        for other in iter {
            counters.merge(other);
        }

        counters
    }
}
