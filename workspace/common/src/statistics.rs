use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ClimateVariable;

/// Evaluation scores of the model for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EvaluationMetrics {
    pub variable: ClimateVariable,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Coefficient of determination
    pub r2: f64,
}

/// Residual of one test period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResidualPoint {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
    /// `actual - predicted`
    pub residual: f64,
}

/// One bar of the residual histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistogramBin {
    /// Lower edge (inclusive)
    pub lower: f64,
    /// Upper edge (exclusive, except for the last bin)
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

/// Residual diagnostics for one variable over the test window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResidualReport {
    pub variable: ClimateVariable,
    /// Pointwise residuals, chronological
    pub points: Vec<ResidualPoint>,
    /// Distribution of the residuals
    pub histogram: Vec<HistogramBin>,
    /// Test periods present in only one of the test tables, or with an empty cell
    pub dropped_periods: usize,
    /// Mean of all residuals, absent when there are none
    pub mean_residual: Option<f64>,
}

impl ResidualReport {
    /// `(predicted, residual)` pairs for the scatter view.
    pub fn scatter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.predicted, p.residual))
    }
}
