// dayhist-core/src/reader.rs
//! The statistics-store boundary.
//!
//! A [`StatisticsReader`] answers "which records exist for this source on
//! these dates". Dates without data are omitted from the answer, never
//! represented as zero.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::errors::DayhistError;
use crate::record::StatisticRecord;

/// Records keyed by their calendar date.
pub type StatisticsByDate = BTreeMap<NaiveDate, StatisticRecord>;

#[async_trait]
pub trait StatisticsReader: Send + Sync {
    /// Fetches the records of `source_id` for `dates`.
    ///
    /// Must return an empty map for an empty `dates` slice. Returns
    /// [`DayhistError::SourceNotFound`] when the store no longer knows the
    /// source; any other error is treated as transient.
    async fn fetch(
        &self,
        source_id: &str,
        dates: &[NaiveDate],
    ) -> Result<StatisticsByDate, DayhistError>;
}

/// A reader backed by an in-memory map. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sources: RwLock<HashMap<String, Vec<StatisticRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records for `source_id`, creating the source if needed.
    pub async fn insert(&self, source_id: &str, records: impl IntoIterator<Item = StatisticRecord>) {
        let mut sources = self.sources.write().await;
        sources
            .entry(source_id.to_string())
            .or_default()
            .extend(records);
    }

    /// Forgets a source entirely.
    pub async fn remove_source(&self, source_id: &str) {
        self.sources.write().await.remove(source_id);
    }
}

#[async_trait]
impl StatisticsReader for MemoryStore {
    async fn fetch(
        &self,
        source_id: &str,
        dates: &[NaiveDate],
    ) -> Result<StatisticsByDate, DayhistError> {
        if dates.is_empty() {
            return Ok(StatisticsByDate::new());
        }

        let sources = self.sources.read().await;
        let records = sources
            .get(source_id)
            .ok_or_else(|| DayhistError::SourceNotFound(source_id.to_string()))?;

        let wanted: BTreeSet<&NaiveDate> = dates.iter().collect();
        Ok(records
            .iter()
            .filter(|r| wanted.contains(&r.date))
            .map(|r| (r.date, r.clone()))
            .collect())
    }
}

/// One time bucket as written in a JSON statistics file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatisticBucket {
    /// Bucket start, RFC 3339.
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub state: Option<f64>,
}

impl StatisticBucket {
    /// The calendar day the bucket starts on, in `offset` or the system's
    /// local timezone.
    pub fn local_date(&self, offset: Option<FixedOffset>) -> NaiveDate {
        match offset {
            Some(offset) => self.start.with_timezone(&offset).date_naive(),
            None => self.start.with_timezone(&Local).date_naive(),
        }
    }

    fn into_record(self, offset: Option<FixedOffset>) -> StatisticRecord {
        StatisticRecord {
            date: self.local_date(offset),
            mean: self.mean,
            min: self.min,
            max: self.max,
            state: self.state,
        }
    }
}

/// A reader over a JSON document of the form
/// `{ "<entity_id>": [ { "start": "...", "mean": 1.0, ... }, ... ] }`.
///
/// The file is re-read on every fetch so an external recorder can keep
/// appending to it. Buckets are grouped by their local calendar day, the
/// same day the scheduler's clock reports; when several share a day, the
/// latest one (the day's final bucket) becomes that date's record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    offset: Option<FixedOffset>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            offset: None,
        }
    }

    /// Groups buckets by days in a fixed UTC offset instead of the system's
    /// local timezone.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_blocking(
        path: &Path,
        offset: Option<FixedOffset>,
        source_id: &str,
        dates: &[NaiveDate],
    ) -> Result<StatisticsByDate, DayhistError> {
        let text = std::fs::read_to_string(path)?;
        let mut document: HashMap<String, Vec<StatisticBucket>> = serde_json::from_str(&text)?;

        let mut buckets = document
            .remove(source_id)
            .ok_or_else(|| DayhistError::SourceNotFound(source_id.to_string()))?;
        buckets.sort_by_key(|b| b.start);

        let wanted: BTreeSet<&NaiveDate> = dates.iter().collect();
        let mut by_date = StatisticsByDate::new();
        for bucket in buckets {
            let record = bucket.into_record(offset);
            if wanted.contains(&record.date) {
                // Later buckets overwrite earlier ones on the same date.
                by_date.insert(record.date, record);
            }
        }
        Ok(by_date)
    }
}

#[async_trait]
impl StatisticsReader for JsonFileStore {
    async fn fetch(
        &self,
        source_id: &str,
        dates: &[NaiveDate],
    ) -> Result<StatisticsByDate, DayhistError> {
        if dates.is_empty() {
            return Ok(StatisticsByDate::new());
        }

        let path = self.path.clone();
        let offset = self.offset;
        let source = source_id.to_string();
        let dates = dates.to_vec();

        debug!("Reading statistics for {} from {}", source_id, self.path.display());
        tokio::task::spawn_blocking(move || Self::read_blocking(&path, offset, &source, &dates)).await?
    }
}
