use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::DateRange;

/// Identity of the researcher shown on the profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ResearcherProfile {
    pub name: String,
    pub student_id: String,
    pub supervisor: String,
    pub study_program: String,
    pub faculty: String,
    pub university: String,
    pub year: u16,
}

impl Default for ResearcherProfile {
    fn default() -> Self {
        Self {
            name: "Amanda Rahmannisa".to_string(),
            student_id: "06111282227058".to_string(),
            supervisor: "Dr. Melly Ariska, S.Pd., M.Sc.".to_string(),
            study_program: "Pendidikan Fisika".to_string(),
            faculty: "Keguruan dan Ilmu Pendidikan".to_string(),
            university: "Universitas Sriwijaya".to_string(),
            year: 2025,
        }
    }
}

/// A key/value pair from the model metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

/// Payload of the profile endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub researcher: ResearcherProfile,
    pub metadata: Vec<MetadataEntry>,
}

/// Shape of the loaded dataset, reported by health checks and `check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DatasetSummary {
    pub historical_range: Option<DateRange>,
    pub historical_rows: usize,
    pub forecast_range: Option<DateRange>,
    pub forecast_rows: usize,
    pub test_rows: usize,
    /// Variable codes that have evaluation metrics
    pub variables_with_metrics: Vec<String>,
    pub metadata_entries: usize,
}
