// dayhist-core/src/extractor.rs
//! Maps statistics records to the tracked numeric field.

use crate::config::TrackValue;
use crate::record::StatisticRecord;

impl TrackValue {
    /// Reads the tracked field from `record`, `None` when it was not recorded.
    pub fn extract(&self, record: &StatisticRecord) -> Option<f64> {
        match self {
            TrackValue::Mean => record.mean,
            TrackValue::Min => record.min,
            TrackValue::Max => record.max,
            TrackValue::State => record.state,
        }
    }
}

/// Collects the present samples. Records missing the field contribute nothing.
pub fn extract_samples<'a, I>(records: I, track_value: TrackValue) -> Vec<f64>
where
    I: IntoIterator<Item = &'a StatisticRecord>,
{
    records
        .into_iter()
        .filter_map(|record| track_value.extract(record))
        .collect()
}
