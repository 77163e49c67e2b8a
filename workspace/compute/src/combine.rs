use common::{ClimateVariable, CombinedSeries, DateRange, SeriesOrigin, SeriesPoint};
use tracing::{debug, instrument};

use crate::dataset::ClimateDataset;
use crate::error::{ComputeError, Result};

/// The dashboard's default filter: earliest historical date through the
/// latest forecast date.
pub fn default_range(dataset: &ClimateDataset) -> Option<DateRange> {
    let start = dataset
        .historical
        .first_date()
        .or_else(|| dataset.forecast.first_date())?;
    let end = dataset
        .forecast
        .last_date()
        .or_else(|| dataset.historical.last_date())?;
    Some(DateRange::new(start, end))
}

/// Concatenates the historical and forecast series of `variable`, tags each
/// row with its origin and keeps the rows inside the inclusive `range`.
///
/// The result is chronological without duplicate dates: forecast rows that
/// fall on or before the last historical date are dropped. An inverted range
/// yields an empty series.
#[instrument(skip(dataset))]
pub fn combine_series(
    dataset: &ClimateDataset,
    variable: ClimateVariable,
    range: DateRange,
) -> Result<CombinedSeries> {
    let historical = dataset.historical.iter_variable(variable);
    let forecast = dataset.forecast.iter_variable(variable);
    if historical.is_none() && forecast.is_none() {
        return Err(ComputeError::VariableNotFound {
            variable,
            table: "historical or forecast",
        });
    }

    let mut points: Vec<SeriesPoint> = historical
        .into_iter()
        .flatten()
        .filter(|(date, _)| range.contains(*date))
        .map(|(date, value)| SeriesPoint {
            date,
            value,
            origin: SeriesOrigin::Historical,
        })
        .collect();
    let historical_rows = points.len();

    let last_historical = dataset.historical.last_date();
    let mut overlapping = 0usize;
    points.extend(
        forecast
            .into_iter()
            .flatten()
            .filter(|(date, _)| {
                let overlaps = last_historical.is_some_and(|last| *date <= last);
                if overlaps {
                    overlapping += 1;
                }
                !overlaps && range.contains(*date)
            })
            .map(|(date, value)| SeriesPoint {
                date,
                value,
                origin: SeriesOrigin::Forecast,
            }),
    );

    if overlapping > 0 {
        debug!("Dropped {} forecast rows overlapping the historical record", overlapping);
    }
    debug!(
        "Combined series for {}: {} historical and {} forecast rows in {} .. {}",
        variable,
        historical_rows,
        points.len() - historical_rows,
        range.start,
        range.end
    );

    Ok(CombinedSeries::new(variable, range, points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MonthlyTable;
    use crate::testing::sample_dataset;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_well_formed(series: &CombinedSeries, range: DateRange) {
        assert!(series.points.iter().all(|p| range.contains(p.date)));
        assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_default_range_spans_both_tables() {
        let dataset = sample_dataset();
        assert_eq!(
            default_range(&dataset),
            Some(DateRange::new(date(2020, 1, 1), date(2044, 12, 1)))
        );
    }

    #[test]
    fn test_full_range_keeps_every_row_tagged_by_origin() {
        let dataset = sample_dataset();
        let range = default_range(&dataset).unwrap();
        let series = combine_series(&dataset, ClimateVariable::Rainfall, range).unwrap();

        assert_eq!(series.len(), 60 + 240);
        assert_eq!(series.points_with_origin(SeriesOrigin::Historical).count(), 60);
        assert_eq!(series.forecast_only().len(), 240);
        assert_eq!(series.points[59].origin, SeriesOrigin::Historical);
        assert_eq!(series.points[60].origin, SeriesOrigin::Forecast);
        assert_well_formed(&series, range);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let dataset = sample_dataset();
        for (start, end) in [
            (date(2024, 11, 1), date(2025, 2, 1)),
            (date(2024, 10, 15), date(2025, 1, 31)),
            (date(1990, 1, 1), date(2020, 1, 1)),
            (date(2044, 12, 1), date(2060, 1, 1)),
        ] {
            let range = DateRange::new(start, end);
            let series = combine_series(&dataset, ClimateVariable::MaxTemperature, range).unwrap();
            assert_well_formed(&series, range);
            assert!(!series.is_empty());
        }

        let range = DateRange::new(date(2024, 11, 1), date(2025, 2, 1));
        let series = combine_series(&dataset, ClimateVariable::MaxTemperature, range).unwrap();
        let dates: Vec<_> = series.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 11, 1), date(2024, 12, 1), date(2025, 1, 1), date(2025, 2, 1)]
        );
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let dataset = sample_dataset();
        let range = DateRange::new(date(2030, 1, 1), date(2020, 1, 1));
        let series = combine_series(&dataset, ClimateVariable::Rainfall, range).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_overlapping_forecast_rows_do_not_duplicate_dates() {
        let mut dataset = sample_dataset();
        dataset.forecast = MonthlyTable::new(
            "date",
            vec![date(2024, 12, 1), date(2025, 1, 1)],
            vec![("RR".to_string(), vec![Some(-1.0), Some(-2.0)])],
        )
        .unwrap();

        let range = DateRange::new(date(2024, 11, 1), date(2025, 1, 1));
        let series = combine_series(&dataset, ClimateVariable::Rainfall, range).unwrap();
        assert_well_formed(&series, range);
        assert_eq!(series.len(), 3);
        assert_eq!(series.points[1].origin, SeriesOrigin::Historical);
        assert_eq!(series.points[2].value, Some(-2.0));
    }

    #[test]
    fn test_unknown_column_is_variable_not_found() {
        let mut dataset = sample_dataset();
        dataset.historical = MonthlyTable::new("date", vec![], vec![]).unwrap();
        dataset.forecast = MonthlyTable::new("date", vec![], vec![]).unwrap();

        let range = DateRange::new(date(2020, 1, 1), date(2030, 1, 1));
        let err = combine_series(&dataset, ClimateVariable::Rainfall, range).unwrap_err();
        assert!(matches!(err, ComputeError::VariableNotFound { .. }));
    }
}
