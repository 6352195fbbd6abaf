use serde::{Deserialize, Serialize};

/// A persisted decimal: either a JSON/TOML number or its string form (`"1234.50"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecimalValue {
    Number(f64),
    Text(String),
}

impl From<f64> for DecimalValue {
    fn from(value: f64) -> Self {
        DecimalValue::Number(value)
    }
}

impl From<&str> for DecimalValue {
    fn from(value: &str) -> Self {
        DecimalValue::Text(value.to_string())
    }
}

/// Converts a persisted decimal into `f64`. Missing values are `0.0`.
///
/// Text that does not parse also yields `0.0`; the engine has no failure path.
pub fn decimal_to_number(value: Option<&DecimalValue>) -> f64 {
    match value {
        None => 0.0,
        Some(DecimalValue::Number(number)) => *number,
        Some(DecimalValue::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return 0.0;
            }
            match trimmed.parse::<f64>() {
                Ok(number) if number.is_finite() => number,
                _ => {
                    tracing::warn!(value = %text, "unparseable decimal treated as zero");
                    0.0
                }
            }
        }
    }
}

/// Rounds to the nearest whole yen, halves toward positive infinity.
pub fn round_yen(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
