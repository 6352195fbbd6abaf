use crate::types::calculation::{OptimalCombinationResult, PatternTotals, RenovationCalculation};
use crate::types::rules::Category;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLine {
    pub category: Category,
    pub calculation: RenovationCalculation,
}

/// Everything the printed certificate needs for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateSummary {
    pub id: String,
    pub title: Option<String>,
    pub has_solar_panel: bool,
    pub categories: Vec<CategoryLine>,
    pub patterns: [PatternTotals; 3],
    pub result: OptimalCombinationResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificateReport {
    pub version: String,
    pub generated_at: String,
    pub source: String,
    pub input_sha256: String,
    pub summary: CertificateSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub id: String,
    pub source: String,
    pub max_control_amount: i64,
    pub five_percent_deductible: i64,
    pub input_sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub version: String,
    pub generated_at: String,
    pub directory: String,
    pub rows: Vec<BatchRow>,
    pub failures: Vec<BatchFailure>,
}
