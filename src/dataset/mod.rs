mod consolidate;
mod gap_fill;


pub use consolidate::{average, efficiency, Consolidation};
pub use gap_fill::fill_with_zero;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type SeriesKey = String;

/// Raw bucketed rows as the storage layer returns them: grouping key to
/// bucket-start epoch to the bucket's numeric components (for example
/// `[sum, count]` before consolidation).
///
/// All epochs within one dataset are multiples of the same granularity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketedDataset {
    series: BTreeMap<SeriesKey, BTreeMap<i64, Vec<f64>>>,
}

impl BucketedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<SeriesKey>, epoch: i64, components: Vec<f64>) {
        self.series.entry(key.into()).or_default().insert(epoch, components);
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Reduce every bucket's components to one scalar.
    pub fn consolidate(self, function: Consolidation) -> ConsolidatedDataset {
        let series = self
            .series
            .into_iter()
            .map(|(key, buckets)| {
                let buckets = buckets
                    .into_iter()
                    .map(|(epoch, components)| (epoch, function.reduce(&components)))
                    .collect();
                (key, buckets)
            })
            .collect();
        ConsolidatedDataset { series }
    }
}

/// One scalar per bucket, before or after unit scaling. A value object:
/// every transformation returns a fresh dataset instead of mutating a
/// shared one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedDataset {
    pub(crate) series: BTreeMap<SeriesKey, BTreeMap<i64, f64>>,
}

impl ConsolidatedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<SeriesKey>, epoch: i64, value: f64) {
        self.series.entry(key.into()).or_default().insert(epoch, value);
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn series_keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<i64, f64>)> {
        self.series.iter().map(|(key, buckets)| (key.as_str(), buckets))
    }

    pub fn get(&self, key: &str, epoch: i64) -> Option<f64> {
        self.series.get(key).and_then(|buckets| buckets.get(&epoch)).copied()
    }

    pub fn bucket_count(&self, key: &str) -> usize {
        self.series.get(key).map(BTreeMap::len).unwrap_or(0)
    }

    /// Sorted union of every bucket epoch across all series.
    pub fn epochs(&self) -> Vec<i64> {
        let mut epochs: Vec<i64> = self
            .series
            .values()
            .flat_map(|buckets| buckets.keys().copied())
            .collect();
        epochs.sort_unstable();
        epochs.dedup();
        epochs
    }

    pub fn max_value(&self) -> f64 {
        self.series
            .values()
            .flat_map(|buckets| buckets.values().copied())
            .fold(0.0, f64::max)
    }

    /// Fresh copy with every value divided by `divisor`.
    pub fn scaled_by(&self, divisor: f64) -> Self {
        let series = self
            .series
            .iter()
            .map(|(key, buckets)| {
                let buckets = buckets
                    .iter()
                    .map(|(&epoch, &value)| (epoch, value / divisor))
                    .collect();
                (key.clone(), buckets)
            })
            .collect();
        Self { series }
    }

    /// Fresh copy holding running totals per series, ascending in time.
    pub fn accumulated(&self) -> Self {
        let series = self
            .series
            .iter()
            .map(|(key, buckets)| {
                let mut running = 0.0;
                let buckets = buckets
                    .iter()
                    .map(|(&epoch, &value)| {
                        running += value;
                        (epoch, running)
                    })
                    .collect();
                (key.clone(), buckets)
            })
            .collect();
        Self { series }
    }

    /// Per-series sum over all buckets, in key order.
    pub fn series_totals(&self) -> Vec<(&str, f64)> {
        self.series
            .iter()
            .map(|(key, buckets)| (key.as_str(), buckets.values().sum()))
            .collect()
    }
}
