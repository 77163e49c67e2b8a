//! Deterministic fixture data for tests of this crate and of the HTTP layer.
//!
//! [`sample_dataset`] builds the bundle in memory and [`write_fixture_files`]
//! writes the very same data as the six CSV inputs, so loading the files
//! yields a dataset equal to `sample_dataset()`.
//!
//! Shape of the fixture:
//! - historical: 2020-01 ..= 2024-12, all eight variables
//! - forecast: 2025-01 ..= 2044-12, all eight variables, `SS` empty in 2030-06
//! - metrics: every variable except `DDD_X_sin`
//! - test tables: 2023-01 ..= 2024-12, aligned

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{Months, NaiveDate};
use common::{ClimateVariable, EvaluationMetrics, MetadataEntry};

use crate::dataset::ClimateDataset;
use crate::sources::DataSources;
use crate::table::MonthlyTable;

fn month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid fixture month")
}

fn months(first: NaiveDate, count: u32) -> Vec<NaiveDate> {
    (0..count)
        .map(|i| first.checked_add_months(Months::new(i)).expect("fixture month in range"))
        .collect()
}

fn variable_index(variable: ClimateVariable) -> usize {
    ClimateVariable::ALL
        .iter()
        .position(|v| *v == variable)
        .unwrap_or_default()
}

/// Historical value of `variable` at row `row`.
pub fn historical_value(variable: ClimateVariable, row: usize) -> f64 {
    10.0 * (variable_index(variable) as f64 + 1.0) + (row % 12) as f64 * 0.5
}

/// Forecast value of `variable` at row `row`.
pub fn forecast_value(variable: ClimateVariable, row: usize) -> f64 {
    100.0 * (variable_index(variable) as f64 + 1.0) + row as f64 * 0.25
}

/// Test actual value of `variable` at row `row`.
pub fn test_actual_value(variable: ClimateVariable, row: usize) -> f64 {
    20.0 + variable_index(variable) as f64 + row as f64
}

/// Test prediction of `variable` at row `row`; residuals cycle through
/// -1.5, -0.5, 0.5, 1.5, 2.5.
pub fn test_predicted_value(variable: ClimateVariable, row: usize) -> f64 {
    test_actual_value(variable, row) - ((row % 5) as f64 - 1.5)
}

fn table_from(dates: Vec<NaiveDate>, value: impl Fn(ClimateVariable, usize) -> Option<f64>) -> MonthlyTable {
    let columns = ClimateVariable::ALL
        .iter()
        .map(|&variable| {
            let values = (0..dates.len()).map(|row| value(variable, row)).collect();
            (variable.code().to_string(), values)
        })
        .collect();
    MonthlyTable::new("date", dates, columns).expect("fixture table is well formed")
}

/// The fixture dataset, built without touching the file system.
pub fn sample_dataset() -> ClimateDataset {
    let historical = table_from(months(month(2020, 1), 60), |v, row| Some(historical_value(v, row)));

    let empty_sunshine = month(2030, 6);
    let forecast_dates = months(month(2025, 1), 240);
    let forecast = table_from(forecast_dates.clone(), |v, row| {
        if v == ClimateVariable::Sunshine && forecast_dates[row] == empty_sunshine {
            None
        } else {
            Some(forecast_value(v, row))
        }
    });

    let test_actual = table_from(months(month(2023, 1), 24), |v, row| Some(test_actual_value(v, row)));
    let test_predicted = table_from(months(month(2023, 1), 24), |v, row| Some(test_predicted_value(v, row)));

    let metrics: BTreeMap<_, _> = ClimateVariable::ALL
        .iter()
        .filter(|v| **v != ClimateVariable::MaxWindDirectionSin)
        .map(|&variable| {
            let i = variable_index(variable) as f64;
            (
                variable,
                EvaluationMetrics {
                    variable,
                    rmse: 1.5 + i,
                    mae: 1.25 + i,
                    r2: 0.875 - i / 16.0,
                },
            )
        })
        .collect();

    let metadata = [("model", "LSTM"), ("lookback", "12"), ("epochs", "100"), ("units", "64")]
        .into_iter()
        .map(|(key, value)| MetadataEntry {
            key: key.to_string(),
            value: value.to_string(),
        })
        .collect();

    ClimateDataset {
        historical,
        forecast,
        metrics,
        metadata,
        test_actual,
        test_predicted,
    }
}

/// Renders a monthly table the way the input files are laid out.
pub fn table_to_csv(table: &MonthlyTable) -> String {
    let names: Vec<&str> = table.column_names().collect();
    let mut out = String::new();
    let _ = writeln!(out, "{},{}", table.index_name(), names.join(","));
    for (row, date) in table.dates().iter().enumerate() {
        out.push_str(&date.format("%Y-%m-%d").to_string());
        for name in &names {
            out.push(',');
            if let Some(Some(value)) = table.column(name).map(|values| values[row]) {
                let _ = write!(out, "{}", value);
            }
        }
        out.push('\n');
    }
    out
}

/// Writes the fixture as the six input files into `dir`.
pub fn write_fixture_files(dir: &Path) -> io::Result<DataSources> {
    let dataset = sample_dataset();
    let sources = DataSources::in_dir(dir);

    fs::write(&sources.historical, table_to_csv(&dataset.historical))?;
    fs::write(&sources.forecast, table_to_csv(&dataset.forecast))?;
    fs::write(&sources.test_actual, table_to_csv(&dataset.test_actual))?;
    fs::write(&sources.test_predicted, table_to_csv(&dataset.test_predicted))?;

    let mut metrics = String::from("variable,RMSE,MAE,R2\n");
    for m in dataset.metrics.values() {
        let _ = writeln!(metrics, "{},{},{},{}", m.variable.code(), m.rmse, m.mae, m.r2);
    }
    fs::write(&sources.metrics, metrics)?;

    let mut metadata = String::new();
    for entry in &dataset.metadata {
        let _ = writeln!(metadata, "{},{}", entry.key, entry.value);
    }
    fs::write(&sources.metadata, metadata)?;

    Ok(sources)
}
