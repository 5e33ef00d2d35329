use libm::sqrt;

use crate::Sample;

/// Location and spread of a sample sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    /// The arithmetic mean of the samples.
    pub mean: f64,
    /// The sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[Sample]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculates mean and sample standard deviation for a slice of values.
///
/// Returns `None` when fewer than two samples are present, since the
/// sample variance is undefined there.
pub fn compute_stats(values: &[Sample]) -> Option<SampleStats> {
    if values.len() < 2 {
        return None;
    }

    let mean = mean(values)?;

    // Sum of squared differences from the mean, Bessel-corrected.
    let variance = values
        .iter()
        .map(|value| {
            let diff = mean - value;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;

    Some(SampleStats {
        mean,
        std_dev: sqrt(variance),
    })
}
