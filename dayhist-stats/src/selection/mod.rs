// dayhist-stats/src/selection/mod.rs
extern crate alloc;
use alloc::vec::Vec;

use crate::Sample;

/// Largest sample, or `None` when empty.
pub fn max(values: &[Sample]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Smallest sample, or `None` when empty.
pub fn min(values: &[Sample]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Median of the samples.
///
/// The input is copied and sorted ascending. For an even count the result
/// is the mean of the two middle elements.
pub fn median(values: &[Sample]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
