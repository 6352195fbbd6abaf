pub mod json;
pub mod md;

use crate::certificate::LoadedCertificate;
use crate::error::RenotaxError;
use crate::types::report::{BatchReport, CertificateReport, CertificateSummary};
use chrono::Utc;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

impl CertificateReport {
    pub fn new(source: &Path, loaded: &LoadedCertificate, summary: CertificateSummary) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now().to_rfc3339(),
            source: source.display().to_string(),
            input_sha256: loaded.sha256.clone(),
            summary,
        }
    }
}

impl BatchReport {
    pub fn new(directory: &Path) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now().to_rfc3339(),
            directory: directory.display().to_string(),
            rows: Vec::new(),
            failures: Vec::new(),
        }
    }
}

pub fn render(report: &CertificateReport, format: OutputFormat) -> Result<String, RenotaxError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(RenotaxError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
    }
}

pub fn render_batch(report: &BatchReport, format: OutputFormat) -> Result<String, RenotaxError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(RenotaxError::Json),
        OutputFormat::Md => Ok(md::batch_to_markdown(report)),
    }
}
