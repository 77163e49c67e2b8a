use chrono::NaiveDate;
use common::{ClimateVariable, DateRange};

use crate::error::{ComputeError, Result};

/// A monthly-indexed table: one date key per row and any number of numeric
/// columns. Rows are kept sorted by date and keys are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTable {
    index_name: String,
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl MonthlyTable {
    /// Builds a table, sorting rows chronologically.
    ///
    /// Fails when a column length differs from the number of dates or when
    /// the same date appears twice.
    pub fn new(
        index_name: impl Into<String>,
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self> {
        for (name, values) in &columns {
            if values.len() != dates.len() {
                return Err(ComputeError::InvalidArgument(format!(
                    "column '{}' has {} values for {} dates",
                    name,
                    values.len(),
                    dates.len()
                )));
            }
        }

        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);
        if let Some(pair) = order.windows(2).find(|w| dates[w[0]] == dates[w[1]]) {
            return Err(ComputeError::InvalidArgument(format!(
                "duplicate date {}",
                dates[pair[0]]
            )));
        }

        let sorted_dates = order.iter().map(|&i| dates[i]).collect();
        let sorted_columns = columns
            .into_iter()
            .map(|(name, values)| (name, order.iter().map(|&i| values[i]).collect()))
            .collect();

        Ok(Self {
            index_name: index_name.into(),
            dates: sorted_dates,
            columns: sorted_columns,
        })
    }

    /// Name of the key column in the source file (may be empty).
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Values of the column named after `variable`'s code.
    pub fn variable(&self, variable: ClimateVariable) -> Option<&[Option<f64>]> {
        self.column(variable.code())
    }

    pub fn has_variable(&self, variable: ClimateVariable) -> bool {
        self.variable(variable).is_some()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Span from the first to the last key, `None` for an empty table.
    pub fn date_range(&self) -> Option<DateRange> {
        Some(DateRange::new(self.first_date()?, self.last_date()?))
    }

    /// Row index of an exact key.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Cell at an exact key. The outer `None` means no such row or column,
    /// the inner one an empty cell.
    pub fn cell(&self, variable: ClimateVariable, date: NaiveDate) -> Option<Option<f64>> {
        let values = self.variable(variable)?;
        let row = self.position(date)?;
        Some(values[row])
    }

    /// `(date, value)` pairs of one variable in chronological order.
    pub fn iter_variable(
        &self,
        variable: ClimateVariable,
    ) -> Option<impl Iterator<Item = (NaiveDate, Option<f64>)> + '_> {
        let values = self.variable(variable)?;
        Some(self.dates.iter().copied().zip(values.iter().copied()))
    }
}
