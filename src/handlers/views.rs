//! Server-rendered HTML views: dashboard, residual diagnostics and profile.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use common::{ClimateVariable, DateRange};
use compute::{analyze_residuals, period::parse_date_key, resolve_forecast, DEFAULT_HISTOGRAM_BINS};
use std::fmt::Write as _;
use tracing::{debug, instrument, trace, warn};

use crate::error::AppError;
use crate::handlers::forecast::{cached_series, effective_range};
use crate::handlers::profile::build_profile;
use crate::handlers::variables::parse_variable;
use crate::helpers::charts::{residual_histogram, residual_scatter, series_chart};
use crate::helpers::html::{
    escape, format_long_date, format_metric, format_value, iso_date, notice, page, NoticeKind,
    SidebarControls, View,
};
use crate::schemas::{AppState, CachedData, DashboardQuery, ProfileViewQuery, ResidualViewQuery};

/// Date preselected in the point lookup control.
pub fn default_lookup_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 1).unwrap_or_default()
}

/// A submitted form control, `None` when absent or left empty.
fn form_field(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a date control; a malformed value is logged and dropped.
fn form_date(raw: &str) -> Option<NaiveDate> {
    let date = parse_date_key(raw);
    if date.is_none() {
        debug!("Ignoring malformed date '{}'", raw);
    }
    date
}

fn selected_variable(raw: Option<&str>) -> Result<ClimateVariable, AppError> {
    match form_field(raw) {
        None => Ok(ClimateVariable::default()),
        Some(code) => parse_variable(code),
    }
}

/// Renders an error as the body of `active`, with the status the JSON API
/// would use for the same error.
fn error_page(active: View, variable: ClimateVariable, err: &AppError) -> Response {
    let (status, _) = err.status_and_code();
    let controls = SidebarControls {
        variable,
        extra_inputs: "",
    };
    let body = notice(NoticeKind::Error, &escape(&err.to_string()));
    (status, Html(page(active, &controls, &body))).into_response()
}

async fn cached_page<F, Fut>(state: &AppState, key: String, render: F) -> String
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = String>,
{
    if let Some(CachedData::Page(html)) = state.cache.get(&key).await {
        trace!("Page {} served from cache", key);
        return html;
    }
    let html = render().await;
    state.cache.insert(key, CachedData::Page(html.clone())).await;
    html
}

#[instrument(skip(state))]
pub async fn dashboard_view(
    Query(query): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Response {
    let variable = match selected_variable(query.variable.as_deref()) {
        Ok(variable) => variable,
        Err(err) => return error_page(View::Dashboard, ClimateVariable::default(), &err),
    };
    // An unreadable lookup date is a lookup miss, unreadable range bounds
    // fall back to the default range.
    let lookup_date = match form_field(query.lookup_date.as_deref()) {
        None => Some(default_lookup_date()),
        Some(raw) => form_date(raw),
    };
    let start = form_field(query.start_date.as_deref()).and_then(form_date);
    let end = form_field(query.end_date.as_deref()).and_then(form_date);
    let range = effective_range(&state, start, end);

    let key = format!(
        "page_dashboard_{}_{}_{}_{}",
        variable.code(),
        range.start,
        range.end,
        lookup_date.map(iso_date).unwrap_or_default()
    );
    let html = cached_page(&state, key, || render_dashboard(&state, variable, range, lookup_date)).await;
    Html(html).into_response()
}

async fn render_dashboard(
    state: &AppState,
    variable: ClimateVariable,
    range: DateRange,
    lookup_date: Option<NaiveDate>,
) -> String {
    debug!("Rendering dashboard for {}", variable);
    let mut body = String::new();

    let _ = write!(body, "<h2>Evaluation Metrics: {}</h2>", escape(variable.label()));
    if let Some(metrics) = state.dataset.metrics_for(variable) {
        let _ = write!(
            body,
            r#"<div class="metrics"><div class="metric">RMSE<div class="value">{}</div></div><div class="metric">MAE<div class="value">{}</div></div><div class="metric">R-Squared (R2)<div class="value">{}</div></div></div>"#,
            format_metric(metrics.rmse),
            format_metric(metrics.mae),
            format_metric(metrics.r2),
        );
    }

    body.push_str("<hr><h2>Forecast Lookup (Daily/Monthly)</h2>");
    let (min, max) = match state.dataset.forecast_window() {
        Some(window) => {
            let selectable = window.selectable_range();
            (iso_date(selectable.start), iso_date(selectable.end))
        }
        None => (String::new(), String::new()),
    };
    let _ = write!(
        body,
        r#"<form method="get" action="/"><input type="hidden" name="variable" value="{code}"><input type="hidden" name="start_date" value="{start}"><input type="hidden" name="end_date" value="{end}"><label>Forecast date <input type="date" name="lookup_date" value="{lookup}" min="{min}" max="{max}"></label> <button type="submit">Search</button></form>"#,
        code = variable.code(),
        start = iso_date(range.start),
        end = iso_date(range.end),
        lookup = lookup_date.map(iso_date).unwrap_or_default(),
        min = min,
        max = max,
    );
    match lookup_date.map(|date| resolve_forecast(&state.dataset, variable, date)) {
        Some(Ok(lookup)) => {
            let _ = write!(
                body,
                r#"<div class="result-card-blue">Forecast result {}<br>Period: {}<br>Value: {}</div>"#,
                escape(variable.label()),
                format_long_date(lookup.requested_date),
                format_value(lookup.value),
            );
        }
        Some(Err(err)) if !err.is_lookup_miss() => {
            warn!("Lookup failed on dashboard: {}", err);
            body.push_str(&notice(NoticeKind::Warning, "No forecast data found for that period."));
        }
        _ => {
            debug!("Lookup miss on dashboard for {:?}", lookup_date);
            body.push_str(&notice(NoticeKind::Warning, "No forecast data found for that period."));
        }
    }

    body.push_str("<hr><h2>Historical Trend and Forecast</h2>");
    match cached_series(state, variable, range).await {
        Ok(series) if series.is_empty() => {
            body.push_str(&notice(NoticeKind::Info, "No data in the selected date range."));
        }
        Ok(series) => body.push_str(&series_chart(&series, "series-chart")),
        Err(err) => {
            warn!("Series unavailable for {}: {}", variable, err);
            body.push_str(&notice(NoticeKind::Warning, &escape(&err.to_string())));
        }
    }

    let _ = write!(
        body,
        r#"<p><a href="/api/v1/variables/{code}/export?start_date={start}&amp;end_date={end}" download>Download forecast data (CSV)</a></p>"#,
        code = variable.code(),
        start = iso_date(range.start),
        end = iso_date(range.end),
    );

    let extra_inputs = format!(
        r#"<label>Start<input type="date" name="start_date" value="{}"></label><label>End<input type="date" name="end_date" value="{}"></label><input type="hidden" name="lookup_date" value="{}">"#,
        iso_date(range.start),
        iso_date(range.end),
        lookup_date.map(iso_date).unwrap_or_default(),
    );
    let controls = SidebarControls {
        variable,
        extra_inputs: &extra_inputs,
    };
    page(View::Dashboard, &controls, &body)
}

#[instrument(skip(state))]
pub async fn residuals_view(
    Query(query): Query<ResidualViewQuery>,
    State(state): State<AppState>,
) -> Response {
    let variable = match selected_variable(query.variable.as_deref()) {
        Ok(variable) => variable,
        Err(err) => return error_page(View::Residuals, ClimateVariable::default(), &err),
    };
    let bins = form_field(query.bins.as_deref())
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HISTOGRAM_BINS);

    let report = match analyze_residuals(&state.dataset, variable, bins) {
        Ok(report) => report,
        Err(err) => return error_page(View::Residuals, variable, &AppError::from(err)),
    };

    let mut body = format!("<h2>Residual Analysis: {}</h2>", escape(variable.label()));
    if report.dropped_periods > 0 {
        body.push_str(&notice(
            NoticeKind::Warning,
            &format!(
                "{} test periods were left out because they are not present in both test tables.",
                report.dropped_periods
            ),
        ));
    }
    if let Some(mean) = report.mean_residual {
        let _ = write!(body, "<p>Mean residual: {}</p>", format_metric(mean));
    }
    let _ = write!(
        body,
        r#"<div class="charts"><div>{}</div><div>{}</div></div>"#,
        residual_scatter(&report, "residual-scatter"),
        residual_histogram(&report, "residual-histogram"),
    );

    let extra_inputs = format!(
        r#"<label>Histogram bins<input type="number" name="bins" min="1" max="200" value="{}"></label>"#,
        bins
    );
    let controls = SidebarControls {
        variable,
        extra_inputs: &extra_inputs,
    };
    Html(page(View::Residuals, &controls, &body)).into_response()
}

#[instrument(skip(state))]
pub async fn profile_view(
    Query(query): Query<ProfileViewQuery>,
    State(state): State<AppState>,
) -> Response {
    let variable = selected_variable(query.variable.as_deref()).unwrap_or_default();
    let profile = build_profile(&state);
    let researcher = &profile.researcher;

    let mut body = String::from("<h2>Researcher and Academic Profile</h2>");
    body.push_str(&notice(
        NoticeKind::Info,
        &format!(
            "<b>Researcher:</b><ul><li>Name: {}</li><li>Student ID: {}</li></ul>",
            escape(&researcher.name),
            escape(&researcher.student_id)
        ),
    ));
    body.push_str(&notice(
        NoticeKind::Warning,
        &format!("<b>Supervisor:</b><ul><li>{}</li></ul>", escape(&researcher.supervisor)),
    ));
    body.push_str(&notice(
        NoticeKind::Success,
        &format!(
            "<b>Academic information:</b><ul><li>Study program: {}</li><li>Faculty: {}</li><li>University: {}</li><li>Year: {}</li></ul>",
            escape(&researcher.study_program),
            escape(&researcher.faculty),
            escape(&researcher.university),
            researcher.year
        ),
    ));

    body.push_str("<h2>Model Configuration Metadata</h2><table>");
    for entry in &profile.metadata {
        let _ = write!(
            body,
            "<tr><th>{}</th><td>{}</td></tr>",
            escape(&entry.key),
            escape(&entry.value)
        );
    }
    body.push_str("</table>");

    let controls = SidebarControls {
        variable,
        extra_inputs: "",
    };
    (StatusCode::OK, Html(page(View::Profile, &controls, &body))).into_response()
}
