use chrono::NaiveDate;
use common::ClimateVariable;
use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// A required input file does not exist
    #[error("Required input '{name}' not found at {}", path.display())]
    MissingInput { name: &'static str, path: PathBuf },

    /// An input file exists but its content cannot be interpreted
    #[error("Failed to parse input '{name}': {reason}")]
    Parse { name: &'static str, reason: String },

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),

    /// Error from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The variable has no column in the requested table
    #[error("No data for variable {variable} in the {table} table")]
    VariableNotFound {
        variable: ClimateVariable,
        table: &'static str,
    },

    /// The forecast table holds no value for the requested month
    #[error("No forecast for {variable} in the period starting {period}")]
    PeriodNotFound {
        variable: ClimateVariable,
        period: NaiveDate,
    },

    /// A caller supplied argument is out of its domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ComputeError {
    /// True for failures that make the whole dataset unavailable.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ComputeError::MissingInput { .. }
                | ComputeError::Parse { .. }
                | ComputeError::DataFrame(_)
                | ComputeError::Io(_)
        )
    }

    /// True when a lookup found nothing; callers recover with a warning.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            ComputeError::PeriodNotFound { .. } | ComputeError::VariableNotFound { .. }
        )
    }

    pub(crate) fn parse(name: &'static str, reason: impl Into<String>) -> Self {
        ComputeError::Parse {
            name,
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for ComputeError {
    fn from(error: polars::error::PolarsError) -> Self {
        let compute_error = match error {
            polars::error::PolarsError::NoData(_) => {
                ComputeError::DataFrame(format!("No data: {}", error))
            }
            polars::error::PolarsError::SchemaMismatch(_) => {
                ComputeError::DataFrame(format!("Schema mismatch: {}", error))
            }
            polars::error::PolarsError::ColumnNotFound(_) => {
                ComputeError::DataFrame(format!("Column not found: {}", error))
            }
            polars::error::PolarsError::ComputeError(_) => {
                ComputeError::DataFrame(format!("Compute error: {}", error))
            }
            _ => ComputeError::DataFrame(error.to_string()),
        };
        error!(err = ?compute_error, "DataFrame operation failed");
        compute_error
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
