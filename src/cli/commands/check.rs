use anyhow::{Context, Result};
use compute::load_dataset;
use tracing::info;

use crate::config::Settings;

/// Loads every input and prints what was found.
pub fn check(settings: &Settings) -> Result<()> {
    let sources = settings.data_sources();
    let dataset = load_dataset(&sources)
        .with_context(|| format!("Failed to load data from {}", settings.data_dir.display()))?;
    let summary = dataset.summary();
    info!("All input files loaded from {}", settings.data_dir.display());

    let range = |range: Option<common::DateRange>| match range {
        Some(range) => format!("{} .. {}", range.start, range.end),
        None => "empty".to_string(),
    };
    println!("historical: {} rows ({})", summary.historical_rows, range(summary.historical_range));
    println!("forecast:   {} rows ({})", summary.forecast_rows, range(summary.forecast_range));
    println!("test:       {} rows", summary.test_rows);
    println!("metrics:    {}", summary.variables_with_metrics.join(", "));
    println!("metadata:   {} entries", summary.metadata_entries);
    Ok(())
}
