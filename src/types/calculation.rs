use serde::Serialize;
use std::fmt;

/// Audited result of applying one category's rule to an aggregated total.
///
/// Amounts are whole yen. `after_subsidy` may be negative; every other field is not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenovationCalculation {
    pub total_cost: i64,
    pub after_subsidy: i64,
    pub deductible_amount: i64,
    pub max_deduction: i64,
    pub excess_amount: i64,
}

/// Per-category results for one certificate. Absent categories contribute zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CombinedRenovations {
    pub seismic: Option<RenovationCalculation>,
    pub barrier_free: Option<RenovationCalculation>,
    pub energy: Option<RenovationCalculation>,
    pub cohabitation: Option<RenovationCalculation>,
    pub childcare: Option<RenovationCalculation>,
    pub other: Option<RenovationCalculation>,
    pub long_term_housing_or: Option<RenovationCalculation>,
    pub long_term_housing_and: Option<RenovationCalculation>,
}

/// The three statutory groupings the optimizer compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// seismic + barrier-free + energy + cohabitation + childcare
    General,
    /// barrier-free + cohabitation + long-term-housing (OR) + childcare
    LongTermOr,
    /// barrier-free + cohabitation + long-term-housing (AND) + childcare
    LongTermAnd,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PatternKind::General => "general",
            PatternKind::LongTermOr => "long_term_or",
            PatternKind::LongTermAnd => "long_term_and",
        };
        f.write_str(label)
    }
}

/// Summed figures for one candidate grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternTotals {
    pub kind: PatternKind,
    pub total: i64,
    pub max: i64,
    pub excess: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimalCombinationResult {
    pub total_deductible: i64,
    pub max_control_amount: i64,
    pub excess_amount: i64,
    pub remaining: i64,
    pub final_deductible: i64,
    pub five_percent_deductible: i64,
    /// Pattern whose excess was carried into the result.
    pub selected_pattern: PatternKind,
}
