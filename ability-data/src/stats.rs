//! Frequency distributions and the information measures derived from them.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::numbers::{count_to_f64, mean_of_counts};

/// Shannon entropy in bits of a set of counts; zero counts are ignored and an
/// empty or all-zero set has entropy 0.
#[must_use]
pub fn shannon_entropy<I>(counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let counts: Vec<usize> = counts.into_iter().filter(|&c| c > 0).collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = count_to_f64(total);
    counts.into_iter().fold(0.0, |entropy, count| {
        let p = count_to_f64(count) / total;
        entropy - p * p.log2()
    })
}

/// Maximum entropy achievable with `unique` equiprobable keys.
#[must_use]
pub fn max_entropy(unique: usize) -> f64 {
    if unique == 0 {
        0.0
    } else {
        count_to_f64(unique).log2()
    }
}

/// Observed entropy as a percentage of the maximum for the same key count.
#[must_use]
pub fn evenness_percent(entropy: f64, unique: usize) -> f64 {
    let max = max_entropy(unique);
    if unique <= 1 || max <= 0.0 {
        0.0
    } else {
        entropy / max * 100.0
    }
}

/// Occurrence counts of discrete feature values, ordered by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord> Default for Distribution<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> FromIterator<K> for Distribution<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut distribution = Self::default();
        for key in iter {
            distribution.record(key);
        }
        distribution
    }
}

impl<K: Ord> Distribution<K> {
    pub fn record(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn unique(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[must_use]
    pub fn entropy(&self) -> f64 {
        shannon_entropy(self.counts.values().copied())
    }

    #[must_use]
    pub fn max_entropy(&self) -> f64 {
        max_entropy(self.unique())
    }

    #[must_use]
    pub fn evenness_percent(&self) -> f64 {
        evenness_percent(self.entropy(), self.unique())
    }

    #[must_use]
    pub fn min_count(&self) -> usize {
        self.counts.values().copied().min().unwrap_or(0)
    }

    #[must_use]
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn mean_count(&self) -> f64 {
        let counts: Vec<usize> = self.counts.values().copied().collect();
        mean_of_counts(&counts)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(key, &count)| (key, count))
    }

    /// Entries ordered by descending count, ties broken by key order.
    #[must_use]
    pub fn by_count(&self) -> Vec<(&K, usize)> {
        let mut entries: Vec<(&K, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<K: Ord + Serialize> Serialize for Distribution<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.counts.iter().map(|(value, &count)| Entry { value, count }))
    }
}

struct Entry<'a, K> {
    value: &'a K,
    count: usize,
}

impl<K: Serialize> Serialize for Entry<'_, K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Entry", 2)?;
        state.serialize_field("value", self.value)?;
        state.serialize_field("count", &self.count)?;
        state.end()
    }
}

/// A numeric parameter value usable as a distribution key.
///
/// Ordered with `f64::total_cmp`, so `1` and `1.0` are the same key.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(transparent)]
pub struct NumericValue(pub f64);

impl PartialEq for NumericValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NumericValue {}

impl PartialOrd for NumericValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NumericValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Summary of one numeric parameter collection.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValueStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub unique_values: usize,
    pub entropy: f64,
}

impl ValueStats {
    /// Summarize `values`, or `None` when there are none.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let distribution: Distribution<NumericValue> =
            values.iter().copied().map(NumericValue).collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / count_to_f64(values.len());
        Some(Self {
            count: values.len(),
            min,
            max,
            avg,
            unique_values: distribution.unique(),
            entropy: distribution.entropy(),
        })
    }
}
