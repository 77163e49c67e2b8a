//! Reads the six CSV inputs into a [`ClimateDataset`].
//!
//! Every file is read with polars as an all-string frame and converted into
//! typed tables here, so parsing rules (date keys, empty cells, `nan`) are
//! the same for all inputs. The first column of each file is the row key.

use std::collections::BTreeMap;
use std::path::Path;

use common::{ClimateVariable, EvaluationMetrics, MetadataEntry};
use polars::prelude::*;
use tracing::{debug, error, info, instrument, trace};

use crate::dataset::ClimateDataset;
use crate::error::{ComputeError, Result};
use crate::period::parse_date_key;
use crate::sources::{DataSources, InputKind};
use crate::table::MonthlyTable;

const METRIC_COLUMNS: [&str; 3] = ["RMSE", "MAE", "R2"];

/// Loads all six inputs, or fails with the first problem found.
///
/// There is no partial result: either every table is available or the
/// caller gets an error naming the input that could not be read.
#[instrument(skip(sources))]
pub fn load_dataset(sources: &DataSources) -> Result<ClimateDataset> {
    info!("Loading climate dataset");
    match load_all(sources) {
        Ok(dataset) => {
            info!(
                historical_rows = dataset.historical.len(),
                forecast_rows = dataset.forecast.len(),
                test_rows = dataset.test_actual.len(),
                metrics = dataset.metrics.len(),
                "Climate dataset loaded"
            );
            Ok(dataset)
        }
        Err(e) => {
            error!("Climate dataset unavailable: {}", e);
            Err(e)
        }
    }
}

fn load_all(sources: &DataSources) -> Result<ClimateDataset> {
    // Fail on a missing file before parsing anything.
    for kind in InputKind::ALL {
        let path = sources.path(kind);
        if !path.is_file() {
            return Err(ComputeError::MissingInput {
                name: kind.name(),
                path: path.to_path_buf(),
            });
        }
    }

    Ok(ClimateDataset {
        historical: load_monthly_table(InputKind::Historical, &sources.historical)?,
        forecast: load_monthly_table(InputKind::Forecast, &sources.forecast)?,
        metrics: load_metrics(&sources.metrics)?,
        metadata: load_metadata(&sources.metadata)?,
        test_actual: load_monthly_table(InputKind::TestActual, &sources.test_actual)?,
        test_predicted: load_monthly_table(InputKind::TestPredicted, &sources.test_predicted)?,
    })
}

/// Reads a CSV file with every column typed as string.
fn read_string_frame(kind: InputKind, path: &Path, has_header: bool) -> Result<DataFrame> {
    trace!("Reading {} from {}", kind.name(), path.display());
    let df = CsvReadOptions::default()
        .with_has_header(has_header)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!("Read {} rows and {} columns for {}", df.height(), df.width(), kind.name());

    if df.width() == 0 {
        return Err(ComputeError::parse(kind.name(), "file has no columns"));
    }
    Ok(df)
}

/// Values of a string column, `None` for empty cells.
fn string_cells(column: &Column) -> Result<Vec<Option<String>>> {
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|cell| {
            cell.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .collect();
    Ok(values)
}

/// Parses a numeric cell. Empty cells and `nan` become `None`.
fn parse_value(kind: InputKind, column: &str, row: usize, cell: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = cell else {
        return Ok(None);
    };
    let value: f64 = raw.parse().map_err(|_| {
        ComputeError::parse(
            kind.name(),
            format!("row {}: '{}' in column '{}' is not a number", row + 1, raw, column),
        )
    })?;
    Ok(if value.is_nan() { None } else { Some(value) })
}

#[instrument]
fn load_monthly_table(kind: InputKind, path: &Path) -> Result<MonthlyTable> {
    let df = read_string_frame(kind, path, true)?;
    let columns = df.get_columns();
    let index_name = columns[0].name().to_string();

    let dates = string_cells(&columns[0])?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            let raw = cell.unwrap_or_default();
            parse_date_key(&raw).ok_or_else(|| {
                ComputeError::parse(kind.name(), format!("row {}: '{}' is not a date", row + 1, raw))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut value_columns = Vec::with_capacity(columns.len() - 1);
    for column in &columns[1..] {
        let name = column.name().to_string();
        let values = string_cells(column)?
            .iter()
            .enumerate()
            .map(|(row, cell)| parse_value(kind, &name, row, cell.as_deref()))
            .collect::<Result<Vec<_>>>()?;
        value_columns.push((name, values));
    }

    MonthlyTable::new(index_name, dates, value_columns)
        .map_err(|e| ComputeError::parse(kind.name(), e.to_string()))
}

#[instrument]
fn load_metrics(path: &Path) -> Result<BTreeMap<ClimateVariable, EvaluationMetrics>> {
    let kind = InputKind::Metrics;
    let df = read_string_frame(kind, path, true)?;
    let labels = string_cells(&df.get_columns()[0])?;

    let mut metric_values = Vec::with_capacity(METRIC_COLUMNS.len());
    for name in METRIC_COLUMNS {
        let column = df
            .column(name)
            .map_err(|_| ComputeError::parse(kind.name(), format!("missing column '{}'", name)))?;
        metric_values.push(string_cells(column)?);
    }

    let mut metrics = BTreeMap::new();
    for (row, label) in labels.iter().enumerate() {
        let Some(variable) = label.as_deref().and_then(|l| l.parse::<ClimateVariable>().ok()) else {
            debug!("Skipping metrics row {} with label {:?}", row + 1, label);
            continue;
        };

        let mut scores = [0.0; 3];
        for (i, name) in METRIC_COLUMNS.iter().enumerate() {
            scores[i] = parse_value(kind, name, row, metric_values[i][row].as_deref())?.ok_or_else(|| {
                ComputeError::parse(kind.name(), format!("row {}: empty '{}' for {}", row + 1, name, variable))
            })?;
        }

        metrics.insert(
            variable,
            EvaluationMetrics {
                variable,
                rmse: scores[0],
                mae: scores[1],
                r2: scores[2],
            },
        );
    }
    Ok(metrics)
}

#[instrument]
fn load_metadata(path: &Path) -> Result<Vec<MetadataEntry>> {
    let kind = InputKind::Metadata;
    let df = read_string_frame(kind, path, false)?;
    if df.width() < 2 {
        return Err(ComputeError::parse(kind.name(), "expected key and value columns"));
    }

    let columns = df.get_columns();
    let keys = string_cells(&columns[0])?;
    let values = string_cells(&columns[1])?;

    Ok(keys
        .into_iter()
        .zip(values)
        .filter_map(|(key, value)| {
            key.map(|key| MetadataEntry {
                key,
                value: value.unwrap_or_default(),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_dataset, write_fixture_files};
    use chrono::NaiveDate;
    use std::fs;

    #[test]
    fn test_loads_all_six_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_fixture_files(dir.path()).unwrap();

        let dataset = load_dataset(&sources).unwrap();
        assert_eq!(dataset, sample_dataset());
        assert_eq!(dataset.forecast.len(), 240);
        assert_eq!(dataset.metadata[0].key, "model");
        assert_eq!(dataset.metadata[0].value, "LSTM");
    }

    #[test]
    fn test_any_missing_file_fails_the_whole_load() {
        for kind in InputKind::ALL {
            let dir = tempfile::tempdir().unwrap();
            let sources = write_fixture_files(dir.path()).unwrap();
            fs::remove_file(sources.path(kind)).unwrap();

            let err = load_dataset(&sources).unwrap_err();
            assert!(err.is_load_failure(), "{:?}", err);
            match err {
                ComputeError::MissingInput { name, .. } => assert_eq!(name, kind.name()),
                other => panic!("expected missing input, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_malformed_date_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_fixture_files(dir.path()).unwrap();
        fs::write(&sources.test_actual, "date,RR\nnot-a-date,1.0\n").unwrap();

        let err = load_dataset(&sources).unwrap_err();
        assert!(matches!(err, ComputeError::Parse { name: "test actuals", .. }));
    }

    #[test]
    fn test_duplicate_dates_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_fixture_files(dir.path()).unwrap();
        fs::write(&sources.historical, "date,RR\n2020-01-01,1\n2020-01-01,2\n").unwrap();

        let err = load_dataset(&sources).unwrap_err();
        assert!(err.is_load_failure(), "{:?}", err);
        assert!(matches!(err, ComputeError::Parse { name: "historical", .. }), "{:?}", err);
    }

    #[test]
    fn test_non_numeric_value_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_fixture_files(dir.path()).unwrap();
        fs::write(&sources.historical, "date,RR\n2020-01-01,heavy\n").unwrap();

        let err = load_dataset(&sources).unwrap_err();
        assert!(matches!(err, ComputeError::Parse { name: "historical", .. }));
    }

    #[test]
    fn test_metrics_without_required_column_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_fixture_files(dir.path()).unwrap();
        fs::write(&sources.metrics, "variable,RMSE,MAE\nRR,1.0,2.0\n").unwrap();

        let err = load_dataset(&sources).unwrap_err();
        assert!(err.is_load_failure());
    }

    #[test]
    fn test_monthly_keys_accept_timestamps_and_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_fixture_files(dir.path()).unwrap();
        fs::write(
            &sources.historical,
            "date,RR,TN\n2020-02-01 00:00:00,2.5,\n2020-01-01 00:00:00,nan,21.0\n",
        )
        .unwrap();

        let dataset = load_dataset(&sources).unwrap();
        let jan = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(dataset.historical.dates(), &[jan, feb]);
        assert_eq!(dataset.historical.cell(ClimateVariable::Rainfall, jan), Some(None));
        assert_eq!(dataset.historical.cell(ClimateVariable::Rainfall, feb), Some(Some(2.5)));
        assert_eq!(dataset.historical.cell(ClimateVariable::MinTemperature, feb), Some(None));
    }

    #[test]
    fn test_unknown_metric_labels_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_fixture_files(dir.path()).unwrap();
        fs::write(&sources.metrics, "variable,RMSE,MAE,R2\nPRES,1,1,1\nrr,0.5,0.25,0.9\n").unwrap();

        let dataset = load_dataset(&sources).unwrap();
        assert_eq!(dataset.metrics.len(), 1);
        let rr = dataset.metrics_for(ClimateVariable::Rainfall).unwrap();
        assert_eq!((rr.rmse, rr.mae, rr.r2), (0.5, 0.25, 0.9));
    }
}
