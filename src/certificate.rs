use crate::engine::category::{calculate_category, calculate_from_total};
use crate::engine::combination::{
    calculate_optimal_combination_with_ceiling, candidate_patterns,
};
use crate::engine::numeric::DecimalValue;
use crate::error::{RenotaxError, Result};
use crate::types::calculation::CombinedRenovations;
use crate::types::certificate::{CategorySection, CertificateInput};
use crate::types::report::{CategoryLine, CertificateSummary};
use crate::types::rules::{Category, DeductionRules};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct LoadedCertificate {
    pub input: CertificateInput,
    pub sha256: String,
}

pub fn is_certificate_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("toml") | Some("json")
    )
}

/// Certificate files under `dir` in file-name order, skipping renotax config files.
///
/// Entries the walk cannot read come back as errors so a batch can report them.
pub fn discover_certificates(dir: &Path) -> Vec<std::result::Result<PathBuf, walkdir::Error>> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".renotax")
        .filter_map(|entry| match entry {
            Ok(entry) => {
                let path = entry.path();
                let wanted = entry.file_type().is_file()
                    && entry.file_name() != crate::config::DEFAULT_CONFIG_FILE
                    && is_certificate_path(path);
                wanted.then(|| Ok(path.to_path_buf()))
            }
            Err(err) => Some(Err(err)),
        })
        .collect()
}

pub fn load_certificate(path: &Path) -> Result<LoadedCertificate> {
    if !path.exists() {
        return Err(RenotaxError::PathNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let input: CertificateInput = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => return Err(RenotaxError::UnsupportedInput(path.display().to_string())),
    };
    tracing::debug!(path = %path.display(), id = %input.id, "certificate loaded");
    Ok(LoadedCertificate {
        input,
        sha256: sha256_hex(&bytes),
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

impl CertificateInput {
    /// Rejects shapes the engine assumes never reach it.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(RenotaxError::InvalidCertificate(
                "id must not be empty".to_string(),
            ));
        }

        for category in Category::ALL {
            if let Some(section) = self.section(category) {
                validate_section(category.key(), section)?;
            }
        }

        if let Some(other) = &self.other {
            non_negative("other.total_cost", other.total_cost.as_ref())?;
            non_negative("other.subsidy", other.subsidy.as_ref())?;
        }
        Ok(())
    }
}

fn validate_section(key: &str, section: &CategorySection) -> Result<()> {
    non_negative(&format!("{key}.subsidy"), section.subsidy.as_ref())?;
    for (index, item) in section.items.iter().enumerate() {
        let prefix = format!("{key}.items[{index}]");
        non_negative(&format!("{prefix}.unit_price"), Some(&item.unit_price))?;
        non_negative(&format!("{prefix}.quantity"), Some(&item.quantity))?;
        ratio(&format!("{prefix}.resident_ratio"), item.resident_ratio.as_ref())?;
        ratio(
            &format!("{prefix}.window_area_ratio"),
            item.window_area_ratio.as_ref(),
        )?;
    }
    Ok(())
}

fn parsed(field: &str, value: &DecimalValue) -> Result<f64> {
    let number = match value {
        DecimalValue::Number(number) => *number,
        DecimalValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            RenotaxError::InvalidCertificate(format!("{field} is not a decimal: {text:?}"))
        })?,
    };
    if !number.is_finite() {
        return Err(RenotaxError::InvalidCertificate(format!(
            "{field} must be finite"
        )));
    }
    Ok(number)
}

fn non_negative(field: &str, value: Option<&DecimalValue>) -> Result<()> {
    if let Some(value) = value {
        if parsed(field, value)? < 0.0 {
            return Err(RenotaxError::InvalidCertificate(format!(
                "{field} must not be negative"
            )));
        }
    }
    Ok(())
}

fn ratio(field: &str, value: Option<&DecimalValue>) -> Result<()> {
    if let Some(value) = value {
        if !(0.0..=1.0).contains(&parsed(field, value)?) {
            return Err(RenotaxError::InvalidCertificate(format!(
                "{field} must be between 0.0 and 1.0"
            )));
        }
    }
    Ok(())
}

/// Runs every present category through the engine and picks the optimal grouping.
pub fn evaluate(input: &CertificateInput, rules: &DeductionRules) -> CertificateSummary {
    let mut combined = CombinedRenovations::default();
    let mut categories = Vec::new();

    for category in Category::ALL {
        let calculation = match category {
            Category::Other => input.other.as_ref().map(|other| {
                calculate_from_total(
                    rules.rule(Category::Other),
                    other.total_cost(),
                    other.subsidy_amount(),
                    input.has_solar_panel,
                )
            }),
            _ => input.section(category).map(|section| {
                calculate_category(
                    category,
                    &section.work_items(),
                    section.subsidy_amount(),
                    input.has_solar_panel,
                    rules,
                )
            }),
        };
        let Some(calculation) = calculation else {
            continue;
        };

        let slot = match category {
            Category::Seismic => &mut combined.seismic,
            Category::BarrierFree => &mut combined.barrier_free,
            Category::Energy => &mut combined.energy,
            Category::Cohabitation => &mut combined.cohabitation,
            Category::Childcare => &mut combined.childcare,
            Category::LongTermHousingOr => &mut combined.long_term_housing_or,
            Category::LongTermHousingAnd => &mut combined.long_term_housing_and,
            Category::Other => &mut combined.other,
        };
        *slot = Some(calculation);
        categories.push(CategoryLine {
            category,
            calculation,
        });
    }

    let result = calculate_optimal_combination_with_ceiling(&combined, rules.program_ceiling);
    tracing::info!(
        id = %input.id,
        categories = categories.len(),
        max_control_amount = result.max_control_amount,
        five_percent_deductible = result.five_percent_deductible,
        "certificate evaluated"
    );

    CertificateSummary {
        id: input.id.clone(),
        title: input.title.clone(),
        has_solar_panel: input.has_solar_panel,
        categories,
        patterns: candidate_patterns(&combined),
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::calculation::PatternKind;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
id = "CERT-001"
title = "Sample house"
has_solar_panel = true

[seismic]
subsidy = "200000"
items = [{ unit_price = "1500000", quantity = 2 }]

[energy]
subsidy = 0
items = [
  { unit_price = 80000, quantity = 10, window_area_ratio = 0.5 },
  { unit_price = "3600000", quantity = 1, resident_ratio = "1.0" },
]

[other]
total_cost = 300000
"#;

    fn sample() -> CertificateInput {
        toml::from_str(SAMPLE).expect("sample should parse")
    }

    #[test]
    fn evaluate_runs_present_categories_in_order() {
        let summary = evaluate(&sample(), &DeductionRules::statutory());
        let order = summary
            .categories
            .iter()
            .map(|line| line.category)
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![Category::Seismic, Category::Energy, Category::Other]
        );

        let seismic = summary.categories[0].calculation;
        assert_eq!(seismic.total_cost, 3_000_000);
        assert_eq!(seismic.after_subsidy, 2_800_000);
        assert_eq!(seismic.max_deduction, 2_500_000);
        assert_eq!(seismic.excess_amount, 300_000);

        let energy = summary.categories[1].calculation;
        assert_eq!(energy.total_cost, 4_000_000);
        assert_eq!(energy.max_deduction, 3_500_000);
        assert_eq!(energy.excess_amount, 500_000);
    }

    #[test]
    fn evaluate_selects_general_pattern_and_credit_basis() {
        let summary = evaluate(&sample(), &DeductionRules::statutory());
        let result = summary.result;
        assert_eq!(result.selected_pattern, PatternKind::General);
        assert_eq!(result.total_deductible, 6_800_000);
        assert_eq!(result.max_control_amount, 6_000_000);
        assert_eq!(result.excess_amount, 800_000);
        assert_eq!(result.remaining, 4_000_000);
        assert_eq!(result.final_deductible, 1_100_000);
        assert_eq!(result.five_percent_deductible, 1_100_000);
    }

    #[test]
    fn evaluate_honours_configured_ceiling() {
        let mut rules = DeductionRules::statutory();
        rules.program_ceiling = 5_000_000;
        let summary = evaluate(&sample(), &rules);
        assert_eq!(summary.result.max_control_amount, 5_000_000);
        assert_eq!(summary.result.remaining, 0);
        assert_eq!(summary.result.five_percent_deductible, 0);
    }

    #[test]
    fn validate_accepts_sample() {
        sample().validate().expect("sample should validate");
    }

    #[test]
    fn validate_names_offending_field() {
        let mut input = sample();
        if let Some(energy) = input.energy.as_mut() {
            energy.items[0].window_area_ratio = Some(DecimalValue::Number(1.5));
        }
        let err = input.validate().expect_err("ratio above one should fail");
        assert!(err
            .to_string()
            .contains("energy.items[0].window_area_ratio"));
    }

    #[test]
    fn validate_rejects_negative_price_and_bad_text() {
        let mut input = sample();
        if let Some(seismic) = input.seismic.as_mut() {
            seismic.items[0].unit_price = DecimalValue::Text("-1".to_string());
        }
        assert!(input.validate().is_err());

        let mut input = sample();
        if let Some(seismic) = input.seismic.as_mut() {
            seismic.subsidy = Some(DecimalValue::Text("two hundred".to_string()));
        }
        let err = input.validate().expect_err("non-numeric subsidy should fail");
        assert!(err.to_string().contains("seismic.subsidy"));
    }

    #[test]
    fn load_certificate_reads_json_and_fingerprints_bytes() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("cert.json");
        fs::write(
            &path,
            r#"{"id":"J-1","cohabitation":{"subsidy":"0","items":[{"unit_price":"700000","quantity":"1"}]}}"#,
        )
        .expect("certificate should write");

        let loaded = load_certificate(&path).expect("json certificate should load");
        assert_eq!(loaded.input.id, "J-1");
        assert_eq!(loaded.sha256.len(), 64);

        let again = load_certificate(&path).expect("json certificate should load");
        assert_eq!(loaded.sha256, again.sha256);
    }

    #[test]
    fn discover_certificates_sorts_and_skips_config_files() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(dir.path().join("b.json"), "{}").expect("file should write");
        fs::write(dir.path().join("a.toml"), "").expect("file should write");
        fs::write(dir.path().join("notes.txt"), "").expect("file should write");
        fs::write(dir.path().join(crate::config::DEFAULT_CONFIG_FILE), "")
            .expect("file should write");
        fs::create_dir_all(dir.path().join(".renotax")).expect("dir should create");
        fs::write(dir.path().join(".renotax/local.toml"), "").expect("file should write");

        let found = discover_certificates(dir.path())
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()
            .expect("walk should succeed");
        assert_eq!(
            found,
            vec![dir.path().join("a.toml"), dir.path().join("b.json")]
        );
    }

    #[test]
    fn discover_certificates_reports_unreadable_entries() {
        let dir = TempDir::new().expect("temp dir should be created");
        let missing = dir.path().join("gone");
        let found = discover_certificates(&missing);
        assert_eq!(found.len(), 1);
        let err = found[0].as_ref().expect_err("missing root should be reported");
        assert_eq!(err.path(), Some(missing.as_path()));
    }

    #[test]
    fn load_certificate_rejects_unknown_extension() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("cert.yaml");
        fs::write(&path, "id: x").expect("file should write");
        let err = load_certificate(&path).expect_err("yaml is not supported");
        assert!(matches!(err, RenotaxError::UnsupportedInput(_)));
    }
}
