use anyhow::{Context, Result};
use chrono::NaiveDate;
use common::ClimateVariable;
use compute::{load_dataset, resolve_forecast};
use tracing::warn;

use crate::config::Settings;

/// Prints the forecast for the month containing `date`. A missing period is
/// reported as a warning, not as a failure.
pub fn lookup(settings: &Settings, variable: &str, date: NaiveDate) -> Result<()> {
    let variable: ClimateVariable = variable.parse()?;
    let dataset = load_dataset(&settings.data_sources()).context("Failed to load input data")?;

    match resolve_forecast(&dataset, variable, date) {
        Ok(lookup) => println!(
            "{} for {} (period {}): {:.2}",
            variable.label(),
            date.format("%d %B %Y"),
            lookup.period,
            lookup.value
        ),
        Err(e) if e.is_lookup_miss() => {
            warn!("{}", e);
            println!("No forecast data found for that period.");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
