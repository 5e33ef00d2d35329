// dayhist/src/commands/compute.rs
//! `dayhist compute`: computes every configured sensor once.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use dayhist_core::{
    headless_compute_all, load_registry_file, EntityInfo, EntityRegistry, HeadlessResult,
    JsonFileStore, SensorsConfig,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ui::table::results_table;
use crate::ui::theme::ThemeMap;

/// Options for [`run_compute`].
pub struct ComputeOptions {
    pub config: PathBuf,
    pub store: PathBuf,
    pub registry: Option<PathBuf>,
    pub date: Option<NaiveDate>,
    pub json: bool,
}

/// One row of the JSON report.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub unique_id: String,
    pub source_entity_id: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub sample_count: usize,
    pub error: Option<String>,
}

impl From<&HeadlessResult> for ReportRow {
    fn from(item: &HeadlessResult) -> Self {
        let d = &item.descriptor;
        let (value, unit, sample_count, error) = match &item.result {
            Ok(v) => (v.value.as_f64(), v.unit.clone(), v.sample_count, None),
            Err(e) => (None, d.unit_of_measurement.clone(), 0, Some(e.to_string())),
        };
        ReportRow {
            name: d.name.clone(),
            unique_id: d.unique_id.clone(),
            source_entity_id: d.source_entity_id.clone(),
            value,
            unit,
            sample_count,
            error,
        }
    }
}

/// Runs the computation and writes a table or JSON to `out`.
///
/// Returns the results so the caller can decide on the exit status.
pub async fn run_compute<W: Write>(
    opts: ComputeOptions,
    out: &mut W,
    theme: &ThemeMap,
) -> Result<Vec<HeadlessResult>> {
    let sensors = SensorsConfig::load_from_file(&opts.config)?;
    let registry: Option<BTreeMap<String, EntityInfo>> =
        opts.registry.as_deref().map(load_registry_file).transpose()?;
    let store = Arc::new(JsonFileStore::new(&opts.store));
    let today = opts.date.unwrap_or_else(|| Local::now().date_naive());

    let results = headless_compute_all(
        &sensors,
        store,
        registry.as_ref().map(|r| r as &dyn EntityRegistry),
        today,
    )
    .await;

    if opts.json {
        let rows: Vec<ReportRow> = results.iter().map(ReportRow::from).collect();
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", results_table(&results, theme))?;
    }
    Ok(results)
}
