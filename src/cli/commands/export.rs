use std::path::PathBuf;

use anyhow::{Context, Result};
use common::ClimateVariable;
use compute::{export_file_name, export_forecast_csv, load_dataset};
use tracing::info;

use crate::config::Settings;

pub fn export(settings: &Settings, variable: &str, output: Option<PathBuf>) -> Result<()> {
    let variable: ClimateVariable = variable.parse()?;
    let dataset = load_dataset(&settings.data_sources()).context("Failed to load input data")?;

    let csv = export_forecast_csv(&dataset, variable, None)?;
    let output = output.unwrap_or_else(|| PathBuf::from(export_file_name(variable)));
    std::fs::write(&output, &csv)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote {} bytes to {}", csv.len(), output.display());
    println!("{}", output.display());
    Ok(())
}
