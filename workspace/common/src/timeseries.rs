use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ClimateVariable;

/// Inclusive date range used for filtering series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    /// First date included in the range
    pub start: NaiveDate,
    /// Last date included in the range
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when `date` lies within `[start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// An inverted range matches nothing.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Where a point of a combined series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SeriesOrigin {
    /// Observed value from the historical record
    Historical,
    /// Value projected by the model
    Forecast,
}

impl SeriesOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesOrigin::Historical => "historical",
            SeriesOrigin::Forecast => "forecast",
        }
    }
}

/// A single monthly observation tagged with its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SeriesPoint {
    /// Period key (first day of the month)
    pub date: NaiveDate,
    /// Value, absent when the source cell was empty
    pub value: Option<f64>,
    pub origin: SeriesOrigin,
}

/// Historical and forecast values of one variable, chronologically ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CombinedSeries {
    pub variable: ClimateVariable,
    /// The filter that produced this series
    pub range: DateRange,
    pub points: Vec<SeriesPoint>,
}

impl CombinedSeries {
    pub fn new(variable: ClimateVariable, range: DateRange, points: Vec<SeriesPoint>) -> Self {
        Self {
            variable,
            range,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points with the given origin, in order.
    pub fn points_with_origin(&self, origin: SeriesOrigin) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter().filter(move |p| p.origin == origin)
    }

    /// Slice of the series keeping only forecast rows.
    pub fn forecast_only(&self) -> CombinedSeries {
        CombinedSeries {
            variable: self.variable,
            range: self.range,
            points: self.points_with_origin(SeriesOrigin::Forecast).cloned().collect(),
        }
    }
}

/// Result of resolving a calendar date against the forecast table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastLookup {
    pub variable: ClimateVariable,
    /// Date chosen by the user
    pub requested_date: NaiveDate,
    /// Period key the date was normalized to
    pub period: NaiveDate,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(date(2020, 1, 1), date(2020, 3, 1));
        assert!(range.contains(date(2020, 1, 1)));
        assert!(range.contains(date(2020, 3, 1)));
        assert!(!range.contains(date(2020, 3, 2)));
        assert!(!range.is_empty());
        assert!(DateRange::new(date(2021, 1, 1), date(2020, 1, 1)).is_empty());
    }

    #[test]
    fn test_forecast_only_keeps_order() {
        let points = vec![
            SeriesPoint { date: date(2024, 11, 1), value: Some(1.0), origin: SeriesOrigin::Historical },
            SeriesPoint { date: date(2024, 12, 1), value: Some(2.0), origin: SeriesOrigin::Historical },
            SeriesPoint { date: date(2025, 1, 1), value: Some(3.0), origin: SeriesOrigin::Forecast },
            SeriesPoint { date: date(2025, 2, 1), value: None, origin: SeriesOrigin::Forecast },
        ];
        let series = CombinedSeries::new(
            ClimateVariable::Rainfall,
            DateRange::new(date(2024, 1, 1), date(2025, 12, 1)),
            points,
        );

        let forecast = series.forecast_only();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast.points[0].date, date(2025, 1, 1));
        assert_eq!(forecast.points[1].value, None);
    }

    #[test]
    fn test_origin_serializes_lowercase() {
        let json = serde_json::to_string(&SeriesOrigin::Forecast).unwrap();
        assert_eq!(json, "\"forecast\"");
    }
}
