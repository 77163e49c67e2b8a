use common::{ClimateVariable, DateRange};
use polars::prelude::*;
use tracing::{debug, instrument};

use crate::combine::combine_series;
use crate::dataset::ClimateDataset;
use crate::error::{ComputeError, Result};

/// File name offered for the forecast download of `variable`.
pub fn export_file_name(variable: ClimateVariable) -> String {
    format!("forecast_{}.csv", variable.code())
}

/// Serializes the forecast-only rows of `variable` as CSV.
///
/// Without a `range` the whole forecast table is exported. The header is the
/// forecast file's key column name followed by the variable code; empty
/// cells stay empty.
#[instrument(skip(dataset))]
pub fn export_forecast_csv(
    dataset: &ClimateDataset,
    variable: ClimateVariable,
    range: Option<DateRange>,
) -> Result<Vec<u8>> {
    if !dataset.forecast.has_variable(variable) {
        return Err(ComputeError::VariableNotFound {
            variable,
            table: "forecast",
        });
    }

    let range = match range.or_else(|| dataset.forecast.date_range()) {
        Some(range) => range,
        None => return write_csv(index_name(dataset), variable, Vec::new(), Vec::new()),
    };

    let series = combine_series(dataset, variable, range)?.forecast_only();
    let dates = series
        .points
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>();
    let values = series.points.iter().map(|p| p.value).collect::<Vec<_>>();
    debug!("Exporting {} forecast rows for {}", dates.len(), variable);

    write_csv(index_name(dataset), variable, dates, values)
}

fn index_name(dataset: &ClimateDataset) -> &str {
    match dataset.forecast.index_name() {
        "" => "date",
        name => name,
    }
}

fn write_csv(
    index_name: &str,
    variable: ClimateVariable,
    dates: Vec<String>,
    values: Vec<Option<f64>>,
) -> Result<Vec<u8>> {
    let mut df = DataFrame::new(vec![
        Series::new(index_name.into(), dates).into(),
        Series::new(variable.code().into(), values).into(),
    ])?;

    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut df)?;
    Ok(buffer)
}
