//! Page shell and formatting shared by the HTML views.

use chrono::NaiveDate;
use common::ClimateVariable;
use std::fmt::Write as _;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; color: #222; }
nav { width: 260px; min-height: 100vh; background: #F4F6F8; padding: 20px; box-sizing: border-box; }
nav a { display: block; padding: 6px 0; color: #0B3C5D; text-decoration: none; }
nav a.active { font-weight: bold; }
nav label { display: block; margin-top: 12px; font-size: 14px; }
nav select, nav input { width: 100%; margin-top: 4px; }
main { flex: 1; padding: 20px 40px; }
.header-style { text-align: center; color: #0B3C5D; font-size: 38px; font-weight: bold; font-family: 'Times New Roman', serif; }
.subheader-style { text-align: center; color: #555; font-size: 18px; margin-bottom: 30px; }
.result-card-blue { background-color: #E3F2FD; padding: 20px; border-radius: 10px; border-left: 10px solid #0B3C5D; margin-bottom: 15px; color: #0B3C5D; font-size: 20px; font-weight: bold; }
.metrics { display: flex; gap: 20px; }
.metric { flex: 1; padding: 12px; border: 1px solid #ddd; border-radius: 8px; }
.metric .value { font-size: 28px; }
.notice { padding: 14px; border-radius: 8px; margin: 10px 0; }
.notice.info { background: #E3F2FD; }
.notice.warning { background: #FFF8E1; }
.notice.success { background: #E8F5E9; }
.notice.error { background: #FDECEA; color: #8A1F11; font-weight: bold; }
.charts { display: flex; gap: 20px; }
.charts > div { flex: 1; }
table { border-collapse: collapse; }
td, th { border: 1px solid #ddd; padding: 6px 12px; text-align: left; }
"#;

/// The three views reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Residuals,
    Profile,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Residuals, View::Profile];

    pub fn path(&self) -> &'static str {
        match self {
            View::Dashboard => "/",
            View::Residuals => "/residuals",
            View::Profile => "/profile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Residuals => "Validity Test (Residuals)",
            View::Profile => "Researcher Profile",
        }
    }
}

/// Escapes text for use in element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Evaluation metrics are shown with four decimals.
pub fn format_metric(value: f64) -> String {
    format!("{:.4}", value)
}

/// Forecast values are shown with two decimals.
pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

/// `31 December 2044`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Success,
    Error,
}

pub fn notice(kind: NoticeKind, html_body: &str) -> String {
    let class = match kind {
        NoticeKind::Info => "info",
        NoticeKind::Warning => "warning",
        NoticeKind::Success => "success",
        NoticeKind::Error => "error",
    };
    format!(r#"<div class="notice {}">{}</div>"#, class, html_body)
}

/// Extra inputs a view adds to the sidebar form, already rendered.
pub struct SidebarControls<'a> {
    pub variable: ClimateVariable,
    pub extra_inputs: &'a str,
}

fn sidebar(active: View, controls: &SidebarControls<'_>) -> String {
    let mut out = String::from("<nav><h3>Navigation Menu</h3>");
    for view in View::ALL {
        let class = if view == active { r#" class="active""# } else { "" };
        let _ = write!(
            out,
            r#"<a href="{}?variable={}"{}>{}</a>"#,
            view.path(),
            controls.variable.code(),
            class,
            view.title()
        );
    }

    let _ = write!(
        out,
        r#"<hr><form method="get" action="{}"><label>Climate parameter<select name="variable" onchange="this.form.submit()">"#,
        active.path()
    );
    for variable in ClimateVariable::ALL {
        let selected = if variable == controls.variable { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{}"{}>{}</option>"#,
            variable.code(),
            selected,
            escape(variable.label())
        );
    }
    out.push_str("</select></label>");
    out.push_str(controls.extra_inputs);
    out.push_str(r#"<p><button type="submit">Apply</button></p></form></nav>"#);
    out
}

/// Wraps a view body into the full page with header and navigation.
pub fn page(active: View, controls: &SidebarControls<'_>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>MeteoForecaster Palembang - LSTM</title>
<script src="{cdn}"></script>
<style>{style}</style>
</head>
<body>
{sidebar}
<main>
<div class="header-style">PALEMBANG CITY CLIMATE FORECAST DASHBOARD</div>
<div class="subheader-style">Long-term temporal analysis based on Long Short-Term Memory (LSTM) - 2025</div>
<hr>
{body}
</main>
</body>
</html>"#,
        cdn = PLOTLY_CDN,
        style = STYLE,
        sidebar = sidebar(active, controls),
        body = body,
    )
}

/// The single blocking notice shown when the inputs could not be loaded.
pub fn unavailable_page(reason: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>MeteoForecaster Palembang - data unavailable</title><style>{style}</style></head>
<body><main>{notice}</main></body>
</html>"#,
        style = STYLE,
        notice = notice(
            NoticeKind::Error,
            &format!(
                "CSV files not found. Make sure all 6 data files are present in the data directory.<br><small>{}</small>",
                escape(reason)
            ),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_number_and_date_formats() {
        assert_eq!(format_metric(1.23456), "1.2346");
        assert_eq!(format_value(300.126), "300.13");
        let date = NaiveDate::from_ymd_opt(2044, 12, 31).unwrap();
        assert_eq!(format_long_date(date), "31 December 2044");
        assert_eq!(iso_date(date), "2044-12-31");
    }

    #[test]
    fn test_page_marks_active_view_and_selected_variable() {
        let controls = SidebarControls {
            variable: ClimateVariable::Rainfall,
            extra_inputs: "",
        };
        let html = page(View::Residuals, &controls, "<p>body</p>");
        assert!(html.contains(r#"<a href="/residuals?variable=RR" class="active">"#));
        assert!(html.contains(r#"<option value="RR" selected>"#));
        assert!(html.contains("<p>body</p>"));
    }
}
