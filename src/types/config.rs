use crate::error::RenotaxError;
use crate::types::rules::{Category, DeductionRules};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenotaxConfig {
    pub program: Option<ProgramConfig>,
    pub rules: Option<BTreeMap<String, RuleOverride>>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramConfig {
    pub ceiling: Option<i64>,
}

/// Partial override of one category's statutory parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleOverride {
    pub threshold: Option<i64>,
    pub cap: Option<i64>,
    pub solar_cap: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl RenotaxConfig {
    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().map(|logging| logging.level.as_str())
    }

    pub fn program_ceiling(&self) -> i64 {
        self.program
            .as_ref()
            .and_then(|program| program.ceiling)
            .unwrap_or_else(|| DeductionRules::statutory().program_ceiling)
    }

    /// Effective rules: statutory defaults with any configured overrides applied.
    pub fn rules(&self) -> DeductionRules {
        let mut rules = DeductionRules::statutory();
        rules.program_ceiling = self.program_ceiling();
        if let Some(overrides) = &self.rules {
            for (key, rule_override) in overrides {
                let Some(category) = Category::from_key(key) else {
                    continue;
                };
                let rule = rules.rule_mut(category);
                if let Some(threshold) = rule_override.threshold {
                    rule.threshold = Some(threshold);
                }
                if let Some(cap) = rule_override.cap {
                    rule.cap = Some(cap);
                }
                if let Some(solar_cap) = rule_override.solar_cap {
                    rule.solar_cap = Some(solar_cap);
                }
            }
        }
        rules
    }

    pub fn validate(&self) -> Result<(), RenotaxError> {
        if self.program_ceiling() <= 0 {
            return Err(RenotaxError::ConfigParse(
                "program.ceiling must be positive".to_string(),
            ));
        }

        if let Some(overrides) = &self.rules {
            let unknown = overrides
                .keys()
                .filter(|key| Category::from_key(key).is_none())
                .cloned()
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                return Err(RenotaxError::ConfigParse(format!(
                    "rules contains unknown category key(s): {}",
                    unknown.join(", ")
                )));
            }

            for (key, rule_override) in overrides {
                let fields = [
                    ("threshold", rule_override.threshold),
                    ("cap", rule_override.cap),
                    ("solar_cap", rule_override.solar_cap),
                ];
                for (field, value) in fields {
                    if value.is_some_and(|value| value < 0) {
                        return Err(RenotaxError::ConfigParse(format!(
                            "rules.{key}.{field} must not be negative"
                        )));
                    }
                }
            }
        }

        let rules = self.rules();
        for category in Category::ALL {
            let rule = rules.rule(category);
            if let (Some(cap), Some(solar_cap)) = (rule.cap, rule.solar_cap) {
                if solar_cap < cap {
                    return Err(RenotaxError::ConfigParse(format!(
                        "rules.{category}.solar_cap ({solar_cap}) is below cap ({cap})"
                    )));
                }
            }
        }

        if let Some(level) = self.log_level() {
            if !matches!(level, "error" | "warn" | "info" | "debug" | "trace") {
                return Err(RenotaxError::ConfigParse(format!(
                    "unsupported logging.level: {level}"
                )));
            }
        }
        Ok(())
    }
}
