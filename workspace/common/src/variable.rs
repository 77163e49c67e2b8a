use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// The climate parameters carried by every table of the dataset.
///
/// The serialized form is the column code used in the CSV inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum ClimateVariable {
    /// Minimum temperature
    #[default]
    #[serde(rename = "TN")]
    MinTemperature,
    /// Maximum temperature
    #[serde(rename = "TX")]
    MaxTemperature,
    /// Average relative humidity
    #[serde(rename = "RH_AVG")]
    AvgHumidity,
    /// Rainfall
    #[serde(rename = "RR")]
    Rainfall,
    /// Sunshine duration
    #[serde(rename = "SS")]
    Sunshine,
    /// Maximum wind speed
    #[serde(rename = "FF_X")]
    MaxWindSpeed,
    /// Average wind speed
    #[serde(rename = "FF_AVG")]
    AvgWindSpeed,
    /// Sine component of the maximum wind direction
    #[serde(rename = "DDD_X_sin")]
    MaxWindDirectionSin,
}

impl ClimateVariable {
    /// All variables in selector order.
    pub const ALL: [ClimateVariable; 8] = [
        ClimateVariable::MinTemperature,
        ClimateVariable::MaxTemperature,
        ClimateVariable::AvgHumidity,
        ClimateVariable::Rainfall,
        ClimateVariable::Sunshine,
        ClimateVariable::MaxWindSpeed,
        ClimateVariable::AvgWindSpeed,
        ClimateVariable::MaxWindDirectionSin,
    ];

    /// Column code as it appears in the CSV headers.
    pub fn code(&self) -> &'static str {
        match self {
            ClimateVariable::MinTemperature => "TN",
            ClimateVariable::MaxTemperature => "TX",
            ClimateVariable::AvgHumidity => "RH_AVG",
            ClimateVariable::Rainfall => "RR",
            ClimateVariable::Sunshine => "SS",
            ClimateVariable::MaxWindSpeed => "FF_X",
            ClimateVariable::AvgWindSpeed => "FF_AVG",
            ClimateVariable::MaxWindDirectionSin => "DDD_X_sin",
        }
    }

    /// Human readable label shown in the selector and chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            ClimateVariable::MinTemperature => "Minimum Temperature (TN)",
            ClimateVariable::MaxTemperature => "Maximum Temperature (TX)",
            ClimateVariable::AvgHumidity => "Average Relative Humidity (RH_AVG)",
            ClimateVariable::Rainfall => "Rainfall (RR)",
            ClimateVariable::Sunshine => "Sunshine Duration (SS)",
            ClimateVariable::MaxWindSpeed => "Maximum Wind Speed (FF_X)",
            ClimateVariable::AvgWindSpeed => "Average Wind Speed (FF_AVG)",
            ClimateVariable::MaxWindDirectionSin => "Maximum Wind Direction Component (DDD_X_sin)",
        }
    }
}

impl fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string is not one of the known variable codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVariableError(pub String);

impl fmt::Display for ParseVariableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown climate variable '{}'", self.0)
    }
}

impl std::error::Error for ParseVariableError {}

impl FromStr for ClimateVariable {
    type Err = ParseVariableError;

    /// Codes are matched case-insensitively, so `rr` selects rainfall.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ClimateVariable::ALL
            .into_iter()
            .find(|v| v.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseVariableError(s.to_string()))
    }
}

/// Selector entry returned by the variables endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct VariableDto {
    pub code: String,
    pub label: String,
}

impl From<ClimateVariable> for VariableDto {
    fn from(variable: ClimateVariable) -> Self {
        Self {
            code: variable.code().to_string(),
            label: variable.label().to_string(),
        }
    }
}
