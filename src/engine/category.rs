//! Category deduction calculator.
//!
//! Every category runs the same five steps against its `CategoryRule`:
//! subtract the subsidy, gate on the qualifying threshold (strictly greater than),
//! cap, derive the excess, then round all outputs once.

use crate::engine::aggregate::{sum_contributions, WindowRatio};
use crate::engine::numeric::round_yen;
use crate::types::calculation::RenovationCalculation;
use crate::types::rules::{Category, CategoryRule, DeductionRules, LongTermMode};
use crate::types::work_item::WorkItem;

/// Applies `rule` to an already-aggregated cost.
pub fn calculate_from_total(
    rule: &CategoryRule,
    total_cost: f64,
    subsidy_amount: f64,
    has_solar_panel: bool,
) -> RenovationCalculation {
    let after_subsidy = total_cost - subsidy_amount;
    let qualifies = match rule.threshold {
        Some(threshold) => after_subsidy > threshold as f64,
        None => true,
    };
    let deductible = if qualifies { after_subsidy.max(0.0) } else { 0.0 };
    let max_deduction = match rule.effective_cap(has_solar_panel) {
        Some(cap) => deductible.min(cap as f64),
        None => deductible,
    };
    let excess = (deductible - max_deduction).max(0.0);

    RenovationCalculation {
        total_cost: round_yen(total_cost),
        after_subsidy: round_yen(after_subsidy),
        deductible_amount: round_yen(deductible),
        max_deduction: round_yen(max_deduction),
        excess_amount: round_yen(excess),
    }
}

pub fn calculate_category(
    category: Category,
    items: &[WorkItem],
    subsidy_amount: f64,
    has_solar_panel: bool,
    rules: &DeductionRules,
) -> RenovationCalculation {
    let rule = rules.rule(category);
    let total = sum_contributions(items, WindowRatio::from_flag(rule.applies_window_ratio));
    let calculation = calculate_from_total(rule, total, subsidy_amount, has_solar_panel);
    tracing::debug!(
        %category,
        items = items.len(),
        total_cost = calculation.total_cost,
        deductible = calculation.deductible_amount,
        max_deduction = calculation.max_deduction,
        excess = calculation.excess_amount,
        "category calculated"
    );
    calculation
}

pub fn calculate_seismic(items: &[WorkItem], subsidy_amount: f64) -> RenovationCalculation {
    calculate_statutory(Category::Seismic, items, subsidy_amount, false)
}

pub fn calculate_barrier_free(items: &[WorkItem], subsidy_amount: f64) -> RenovationCalculation {
    calculate_statutory(Category::BarrierFree, items, subsidy_amount, false)
}

pub fn calculate_energy(
    items: &[WorkItem],
    subsidy_amount: f64,
    has_solar_panel: bool,
) -> RenovationCalculation {
    calculate_statutory(Category::Energy, items, subsidy_amount, has_solar_panel)
}

pub fn calculate_cohabitation(items: &[WorkItem], subsidy_amount: f64) -> RenovationCalculation {
    calculate_statutory(Category::Cohabitation, items, subsidy_amount, false)
}

pub fn calculate_childcare(items: &[WorkItem], subsidy_amount: f64) -> RenovationCalculation {
    calculate_statutory(Category::Childcare, items, subsidy_amount, false)
}

pub fn calculate_long_term_housing(
    items: &[WorkItem],
    subsidy_amount: f64,
    mode: LongTermMode,
    has_solar_panel: bool,
) -> RenovationCalculation {
    calculate_statutory(mode.category(), items, subsidy_amount, has_solar_panel)
}

/// "Other renovation" always qualifies and is never capped; only the delta is clamped.
pub fn calculate_other_renovation(total_cost: f64, subsidy_amount: f64) -> RenovationCalculation {
    calculate_from_total(&CategoryRule::uncapped(), total_cost, subsidy_amount, false)
}

fn calculate_statutory(
    category: Category,
    items: &[WorkItem],
    subsidy_amount: f64,
    has_solar_panel: bool,
) -> RenovationCalculation {
    calculate_category(
        category,
        items,
        subsidy_amount,
        has_solar_panel,
        &DeductionRules::statutory(),
    )
}
