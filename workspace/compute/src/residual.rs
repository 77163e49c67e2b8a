use common::{ClimateVariable, HistogramBin, ResidualPoint, ResidualReport};
use tracing::{debug, instrument, warn};

use crate::dataset::ClimateDataset;
use crate::error::{ComputeError, Result};

/// Number of histogram bins used by the residual view.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Upper bound accepted for a caller supplied bin count.
pub const MAX_HISTOGRAM_BINS: usize = 200;

/// Residuals (`actual - predicted`) of `variable` over the test window.
///
/// The two test tables are inner-joined on their dates. Periods present in
/// only one table, or with an empty cell on either side, are left out and
/// counted in `dropped_periods`.
#[instrument(skip(dataset))]
pub fn analyze_residuals(
    dataset: &ClimateDataset,
    variable: ClimateVariable,
    bins: usize,
) -> Result<ResidualReport> {
    if bins == 0 || bins > MAX_HISTOGRAM_BINS {
        return Err(ComputeError::InvalidArgument(format!(
            "bin count must be between 1 and {}, got {}",
            MAX_HISTOGRAM_BINS, bins
        )));
    }

    let actual = dataset
        .test_actual
        .iter_variable(variable)
        .ok_or(ComputeError::VariableNotFound {
            variable,
            table: "test actuals",
        })?;
    if !dataset.test_predicted.has_variable(variable) {
        return Err(ComputeError::VariableNotFound {
            variable,
            table: "test predictions",
        });
    }

    let mut points = Vec::new();
    let mut dropped = 0usize;
    for (date, actual_value) in actual {
        match (actual_value, dataset.test_predicted.cell(variable, date).flatten()) {
            (Some(actual), Some(predicted)) => points.push(ResidualPoint {
                date,
                actual,
                predicted,
                residual: actual - predicted,
            }),
            _ => dropped += 1,
        }
    }
    dropped += dataset
        .test_predicted
        .dates()
        .iter()
        .filter(|date| dataset.test_actual.position(**date).is_none())
        .count();

    if dropped > 0 {
        warn!(
            "Dropped {} test periods for {} that are not present in both test tables",
            dropped, variable
        );
    }

    let residuals: Vec<f64> = points.iter().map(|p| p.residual).collect();
    let mean_residual = if residuals.is_empty() {
        None
    } else {
        Some(residuals.iter().sum::<f64>() / residuals.len() as f64)
    };
    debug!("Computed {} residuals for {}, mean {:?}", residuals.len(), variable, mean_residual);

    Ok(ResidualReport {
        variable,
        histogram: histogram(&residuals, bins),
        points,
        dropped_periods: dropped,
        mean_residual,
    })
}

/// Equal-width histogram over `[min, max]`.
///
/// Every bin is half-open except the last one, which also holds `max`.
/// When all values are equal a single bin holds them all; no values give no
/// bins.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for value in finite {
        let index = (((value - min) / width) as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MonthlyTable;
    use crate::testing::sample_dataset;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_residual_is_actual_minus_predicted_for_every_common_date() {
        let dataset = sample_dataset();
        let report = analyze_residuals(&dataset, ClimateVariable::Rainfall, DEFAULT_HISTOGRAM_BINS).unwrap();

        assert_eq!(report.points.len(), 24);
        assert_eq!(report.dropped_periods, 0);
        for point in &report.points {
            let actual = dataset.test_actual.cell(ClimateVariable::Rainfall, point.date).unwrap().unwrap();
            let predicted = dataset.test_predicted.cell(ClimateVariable::Rainfall, point.date).unwrap().unwrap();
            assert_eq!(point.residual, actual - predicted);
        }

        let total: usize = report.histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, 24);
        assert_eq!(report.histogram.len(), DEFAULT_HISTOGRAM_BINS);
        assert!(report.mean_residual.unwrap() != 0.0);
    }

    #[test]
    fn test_scatter_pairs_predicted_with_residual() {
        let dataset = sample_dataset();
        let report = analyze_residuals(&dataset, ClimateVariable::MinTemperature, 5).unwrap();
        let (predicted, residual) = report.scatter().next().unwrap();
        assert_eq!(predicted, report.points[0].predicted);
        assert_eq!(residual, report.points[0].residual);
    }

    #[test]
    fn test_mismatched_indices_are_inner_joined() {
        let mut dataset = sample_dataset();
        dataset.test_actual = MonthlyTable::new(
            "date",
            vec![date(2023, 1), date(2023, 2), date(2023, 3)],
            vec![("RR".to_string(), vec![Some(5.0), Some(6.0), None])],
        )
        .unwrap();
        dataset.test_predicted = MonthlyTable::new(
            "date",
            vec![date(2023, 2), date(2023, 3), date(2023, 4)],
            vec![("RR".to_string(), vec![Some(4.0), Some(1.0), Some(2.0)])],
        )
        .unwrap();

        let report = analyze_residuals(&dataset, ClimateVariable::Rainfall, 4).unwrap();
        assert_eq!(report.points.len(), 1);
        assert_eq!(report.points[0].date, date(2023, 2));
        assert_eq!(report.points[0].residual, 2.0);
        // 2023-01 and 2023-04 are one-sided, 2023-03 has an empty actual
        assert_eq!(report.dropped_periods, 3);
    }

    #[test]
    fn test_missing_variable_and_bad_bins() {
        let mut dataset = sample_dataset();
        dataset.test_predicted = MonthlyTable::new("date", vec![], vec![]).unwrap();
        let err = analyze_residuals(&dataset, ClimateVariable::Rainfall, 10).unwrap_err();
        assert!(matches!(err, ComputeError::VariableNotFound { table: "test predictions", .. }));

        let dataset = sample_dataset();
        assert!(matches!(
            analyze_residuals(&dataset, ClimateVariable::Rainfall, 0),
            Err(ComputeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_histogram_edges() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[3].upper, 4.0);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 1, 1, 2]);
        assert_eq!(bins[1].midpoint(), 1.5);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 20).is_empty());
        let single = histogram(&[2.5, 2.5, 2.5], 20);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 3);
    }
}
