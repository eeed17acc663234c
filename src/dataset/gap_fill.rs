use super::ConsolidatedDataset;

/// Insert a zero bucket for every missing aligned timestamp in
/// `[aligned_start, end_epoch)`, for every series.
///
/// Existing values stay untouched and re-running on an already-filled
/// dataset is a no-op, so every series spans the full requested range
/// with no temporal holes.
pub fn fill_with_zero(
    granularity_secs: i64,
    start_epoch: i64,
    end_epoch: i64,
    mut dataset: ConsolidatedDataset,
) -> ConsolidatedDataset {
    if granularity_secs <= 0 {
        return dataset;
    }

    let aligned_start = start_epoch - start_epoch.rem_euclid(granularity_secs);
    for buckets in dataset.series.values_mut() {
        let mut epoch = aligned_start;
        while epoch < end_epoch {
            buckets.entry(epoch).or_insert(0.0);
            epoch += granularity_secs;
        }
    }
    dataset
}
