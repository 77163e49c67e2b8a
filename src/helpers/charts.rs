//! Chart rendering for the HTML views. Each function returns an inline
//! plotly `<div>` + `<script>` fragment; the page shell loads plotly.js.

use common::{CombinedSeries, ResidualReport, SeriesOrigin};
use plotly::common::{DashType, Line, Marker, Mode, Title};
use plotly::layout::{Axis, HoverMode, Layout};
use plotly::{Bar, Plot, Scatter};

pub const HISTORICAL_COLOR: &str = "#0B3C5D";
pub const FORECAST_COLOR: &str = "#F2C94C";

const HOVER_TEMPLATE: &str = "<b>Date:</b> %{x|%d %B %Y}<br><b>Value:</b> %{y}";

/// Line chart of the combined series, one trace per origin.
pub fn series_chart(series: &CombinedSeries, div_id: &str) -> String {
    let mut plot = Plot::new();

    for (origin, name, color) in [
        (SeriesOrigin::Historical, "Historical", HISTORICAL_COLOR),
        (SeriesOrigin::Forecast, "Forecast", FORECAST_COLOR),
    ] {
        let (dates, values): (Vec<String>, Vec<Option<f64>>) = series
            .points_with_origin(origin)
            .map(|p| (p.date.format("%Y-%m-%d").to_string(), p.value))
            .unzip();
        if dates.is_empty() {
            continue;
        }

        let trace = Scatter::new(dates, values)
            .mode(Mode::Lines)
            .name(name)
            .hover_template(HOVER_TEMPLATE)
            .line(Line::new().color(color).width(2.0));
        plot.add_trace(trace);
    }

    let layout = Layout::new()
        .title(Title::with_text(format!("{} - historical and forecast", series.variable.label())))
        .x_axis(Axis::new().title(Title::with_text("Date")))
        .y_axis(Axis::new().title(Title::with_text(series.variable.code())))
        .hover_mode(HoverMode::XUnified);
    plot.set_layout(layout);

    plot.to_inline_html(Some(div_id))
}

/// Scatter of (predicted, residual) with a dashed zero reference line.
pub fn residual_scatter(report: &ResidualReport, div_id: &str) -> String {
    let mut plot = Plot::new();
    let (predicted, residuals): (Vec<f64>, Vec<f64>) = report.scatter().unzip();

    if let (Some(min), Some(max)) = (
        predicted.iter().copied().reduce(f64::min),
        predicted.iter().copied().reduce(f64::max),
    ) {
        let zero = Scatter::new(vec![min, max], vec![0.0, 0.0])
            .mode(Mode::Lines)
            .name("Zero")
            .show_legend(false)
            .line(Line::new().color(FORECAST_COLOR).dash(DashType::Dash));
        plot.add_trace(zero);
    }

    let trace = Scatter::new(predicted, residuals)
        .mode(Mode::Markers)
        .name("Residual")
        .marker(Marker::new().color(HISTORICAL_COLOR));
    plot.add_trace(trace);

    let layout = Layout::new()
        .title(Title::with_text("Residual Scatter Plot"))
        .x_axis(Axis::new().title(Title::with_text("Predicted")))
        .y_axis(Axis::new().title(Title::with_text("Error")));
    plot.set_layout(layout);

    plot.to_inline_html(Some(div_id))
}

/// Bar chart of the residual histogram bins.
pub fn residual_histogram(report: &ResidualReport, div_id: &str) -> String {
    let mut plot = Plot::new();
    let midpoints: Vec<f64> = report.histogram.iter().map(|b| b.midpoint()).collect();
    let counts: Vec<usize> = report.histogram.iter().map(|b| b.count).collect();

    let trace = Bar::new(midpoints, counts)
        .name("Residuals")
        .marker(Marker::new().color(FORECAST_COLOR));
    plot.add_trace(trace);

    let layout = Layout::new()
        .title(Title::with_text("Error Distribution"))
        .x_axis(Axis::new().title(Title::with_text("Residual")))
        .y_axis(Axis::new().title(Title::with_text("Count")))
        .bar_gap(0.05);
    plot.set_layout(layout);

    plot.to_inline_html(Some(div_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ClimateVariable, DateRange, HistogramBin, ResidualPoint, SeriesPoint};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_series_chart_has_both_traces() {
        let series = CombinedSeries::new(
            ClimateVariable::Rainfall,
            DateRange::new(date(2024, 12), date(2025, 1)),
            vec![
                SeriesPoint { date: date(2024, 12), value: Some(1.0), origin: SeriesOrigin::Historical },
                SeriesPoint { date: date(2025, 1), value: Some(2.0), origin: SeriesOrigin::Forecast },
            ],
        );
        let html = series_chart(&series, "series-chart");
        assert!(html.contains("series-chart"));
        assert!(html.contains("Historical"));
        assert!(html.contains("Forecast"));
        assert!(html.contains("2025-01-01"));
    }

    #[test]
    fn test_residual_charts_render() {
        let report = ResidualReport {
            variable: ClimateVariable::Sunshine,
            points: vec![ResidualPoint {
                date: date(2023, 1),
                actual: 5.0,
                predicted: 4.0,
                residual: 1.0,
            }],
            histogram: vec![HistogramBin { lower: 1.0, upper: 1.0, count: 1 }],
            dropped_periods: 0,
            mean_residual: Some(1.0),
        };
        assert!(residual_scatter(&report, "residual-scatter").contains("residual-scatter"));
        assert!(residual_histogram(&report, "residual-histogram").contains("residual-histogram"));
    }
}
