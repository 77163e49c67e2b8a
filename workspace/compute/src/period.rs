use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use common::{ClimateVariable, DateRange, ForecastLookup};
use tracing::{debug, instrument, trace, warn};

use crate::dataset::ClimateDataset;
use crate::error::{ComputeError, Result};
use crate::table::MonthlyTable;

/// Normalizes a date to the first day of its month.
pub fn period_key(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last calendar day of the month `date` belongs to.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    period_key(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Parses a row key from one of the input files.
///
/// Accepts plain dates, date-times (the time part is ignored) and bare
/// `YYYY-MM` months.
pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d").ok()
}

/// The span of months covered by the forecast table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastWindow {
    pub first_period: NaiveDate,
    pub last_period: NaiveDate,
}

impl ForecastWindow {
    pub fn from_table(table: &MonthlyTable) -> Option<Self> {
        Some(Self {
            first_period: period_key(table.first_date()?),
            last_period: period_key(table.last_date()?),
        })
    }

    /// Dates a user may pick: the first period through the last day of the
    /// last month, e.g. 2025-01-01 ..= 2044-12-31.
    pub fn selectable_range(&self) -> DateRange {
        DateRange::new(self.first_period, end_of_month(self.last_period))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.selectable_range().contains(date)
    }
}

/// Looks up the forecast of `variable` for the month containing `date`.
///
/// The date is normalized to its period key and matched exactly. A missing
/// row, a missing column or an empty cell are all reported as
/// [`ComputeError::PeriodNotFound`]; there is no nearest-month fallback.
#[instrument(skip(dataset))]
pub fn resolve_forecast(
    dataset: &ClimateDataset,
    variable: ClimateVariable,
    date: NaiveDate,
) -> Result<ForecastLookup> {
    let period = period_key(date);
    trace!("Resolved {} to period {}", date, period);

    match dataset.forecast.cell(variable, period) {
        Some(Some(value)) => {
            debug!("Forecast for {} at {}: {}", variable, period, value);
            Ok(ForecastLookup {
                variable,
                requested_date: date,
                period,
                value,
            })
        }
        _ => {
            warn!("No forecast record for {} in period {}", variable, period);
            Err(ComputeError::PeriodNotFound { variable, period })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_dataset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_key_and_end_of_month() {
        assert_eq!(period_key(date(2044, 12, 31)), date(2044, 12, 1));
        assert_eq!(end_of_month(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2044, 12, 1)), date(2044, 12, 31));
    }

    #[test]
    fn test_parse_date_key_formats() {
        assert_eq!(parse_date_key("1981-01-01"), Some(date(1981, 1, 1)));
        assert_eq!(parse_date_key("2025-03-01 00:00:00"), Some(date(2025, 3, 1)));
        assert_eq!(parse_date_key("2025-03-01T00:00:00"), Some(date(2025, 3, 1)));
        assert_eq!(parse_date_key(" 2025-03 "), Some(date(2025, 3, 1)));
        assert_eq!(parse_date_key("March 2025"), None);
        assert_eq!(parse_date_key(""), None);
    }

    #[test]
    fn test_every_day_of_the_window_resolves_to_its_month() {
        let dataset = sample_dataset();
        let window = dataset.forecast_window().unwrap();
        let range = window.selectable_range();
        assert_eq!(range, DateRange::new(date(2025, 1, 1), date(2044, 12, 31)));

        let mut day = range.start;
        while day <= range.end {
            let lookup = resolve_forecast(&dataset, ClimateVariable::Rainfall, day).unwrap();
            let stored = dataset.forecast.cell(ClimateVariable::Rainfall, period_key(day)).unwrap();
            assert_eq!(lookup.period, period_key(day));
            assert_eq!(Some(lookup.value), stored);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_same_month_normalization() {
        let dataset = sample_dataset();
        let first = resolve_forecast(&dataset, ClimateVariable::Rainfall, date(2025, 12, 1)).unwrap();
        assert_eq!(first.period, date(2025, 12, 1));
        assert_eq!(
            Some(first.value),
            dataset.forecast.cell(ClimateVariable::Rainfall, date(2025, 12, 1)).unwrap()
        );

        let last = resolve_forecast(&dataset, ClimateVariable::Rainfall, date(2044, 12, 31)).unwrap();
        assert_eq!(last.period, date(2044, 12, 1));
        assert_eq!(last.requested_date, date(2044, 12, 31));
    }

    #[test]
    fn test_dates_outside_the_window_are_lookup_misses() {
        let dataset = sample_dataset();
        for day in [date(2050, 6, 15), date(2024, 12, 31), date(1990, 1, 1)] {
            let err = resolve_forecast(&dataset, ClimateVariable::MaxTemperature, day).unwrap_err();
            assert!(err.is_lookup_miss());
            assert!(!err.is_load_failure());
        }
        assert!(!dataset.forecast_window().unwrap().contains(date(2050, 1, 1)));
    }

    #[test]
    fn test_empty_cell_is_a_lookup_miss() {
        let dataset = sample_dataset();
        // the fixture leaves SS empty for 2030-06
        let err = resolve_forecast(&dataset, ClimateVariable::Sunshine, date(2030, 6, 20)).unwrap_err();
        assert!(matches!(err, ComputeError::PeriodNotFound { period, .. } if period == date(2030, 6, 1)));
    }
}
