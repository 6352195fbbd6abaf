//! Combination optimizer.
//!
//! Builds the three statutory groupings, picks the largest capped deduction, applies the
//! program ceiling and derives the 5% credit basis.

use crate::types::calculation::{
    CombinedRenovations, OptimalCombinationResult, PatternKind, PatternTotals,
    RenovationCalculation,
};
use crate::types::rules::PROGRAM_CEILING;

/// Candidate patterns in tie-break priority order: AND, then OR, then general.
///
/// When several patterns share the winning total, the first positive one here supplies
/// the excess. The general pattern is the fallback.
pub const PATTERN_PRIORITY: [PatternKind; 3] = [
    PatternKind::LongTermAnd,
    PatternKind::LongTermOr,
    PatternKind::General,
];

pub fn pattern_members(
    kind: PatternKind,
    renovations: &CombinedRenovations,
) -> Vec<Option<&RenovationCalculation>> {
    let shared = [
        renovations.barrier_free.as_ref(),
        renovations.cohabitation.as_ref(),
        renovations.childcare.as_ref(),
    ];
    let specific = match kind {
        PatternKind::General => vec![renovations.seismic.as_ref(), renovations.energy.as_ref()],
        PatternKind::LongTermOr => vec![renovations.long_term_housing_or.as_ref()],
        PatternKind::LongTermAnd => vec![renovations.long_term_housing_and.as_ref()],
    };
    shared.into_iter().chain(specific).collect()
}

pub fn pattern_totals(kind: PatternKind, renovations: &CombinedRenovations) -> PatternTotals {
    pattern_members(kind, renovations).into_iter().flatten().fold(
        PatternTotals {
            kind,
            total: 0,
            max: 0,
            excess: 0,
        },
        |mut totals, calculation| {
            totals.total = totals.total.saturating_add(calculation.deductible_amount);
            totals.max = totals.max.saturating_add(calculation.max_deduction);
            totals.excess = totals.excess.saturating_add(calculation.excess_amount);
            totals
        },
    )
}

pub fn candidate_patterns(renovations: &CombinedRenovations) -> [PatternTotals; 3] {
    PATTERN_PRIORITY.map(|kind| pattern_totals(kind, renovations))
}

/// Picks the pattern whose excess accompanies `total_deductible`.
pub fn select_excess_pattern(
    candidates: &[PatternTotals; 3],
    total_deductible: i64,
) -> PatternTotals {
    let general = candidates
        .iter()
        .find(|pattern| pattern.kind == PatternKind::General)
        .copied()
        .unwrap_or(PatternTotals {
            kind: PatternKind::General,
            total: 0,
            max: 0,
            excess: 0,
        });
    candidates
        .iter()
        .find(|pattern| pattern.total == total_deductible && pattern.total > 0)
        .copied()
        .unwrap_or(general)
}

pub fn calculate_optimal_combination(renovations: &CombinedRenovations) -> OptimalCombinationResult {
    calculate_optimal_combination_with_ceiling(renovations, PROGRAM_CEILING)
}

pub fn calculate_optimal_combination_with_ceiling(
    renovations: &CombinedRenovations,
    ceiling: i64,
) -> OptimalCombinationResult {
    let candidates = candidate_patterns(renovations);

    let mut max_control_amount = candidates.iter().map(|pattern| pattern.max).max().unwrap_or(0);
    let total_deductible = candidates
        .iter()
        .map(|pattern| pattern.total)
        .max()
        .unwrap_or(0);
    let selected = select_excess_pattern(&candidates, total_deductible);
    let excess_amount = selected.excess;

    if max_control_amount > ceiling {
        tracing::debug!(max_control_amount, ceiling, "capped deduction clamped to program ceiling");
        max_control_amount = ceiling;
    }
    let remaining = (ceiling - max_control_amount).max(0);

    let other_deductible = renovations
        .other
        .as_ref()
        .map(|other| other.deductible_amount)
        .unwrap_or(0);
    let credit_source = excess_amount.saturating_add(other_deductible);
    let final_deductible = if total_deductible <= 0 {
        0
    } else if credit_source > 0 {
        total_deductible.min(credit_source)
    } else {
        total_deductible
    };
    let five_percent_deductible = final_deductible.min(remaining);

    tracing::debug!(
        selected = %selected.kind,
        total_deductible,
        max_control_amount,
        excess_amount,
        remaining,
        final_deductible,
        five_percent_deductible,
        "optimal combination selected"
    );

    OptimalCombinationResult {
        total_deductible,
        max_control_amount,
        excess_amount,
        remaining,
        final_deductible,
        five_percent_deductible,
        selected_pattern: selected.kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::category::{
        calculate_barrier_free, calculate_cohabitation, calculate_energy,
        calculate_long_term_housing, calculate_other_renovation, calculate_seismic,
    };
    use crate::types::rules::LongTermMode;
    use crate::types::work_item::WorkItem;

    fn calc(deductible: i64, max: i64) -> RenovationCalculation {
        RenovationCalculation {
            total_cost: deductible,
            after_subsidy: deductible,
            deductible_amount: deductible,
            max_deduction: max,
            excess_amount: deductible - max,
        }
    }

    fn single(cost: f64) -> Vec<WorkItem> {
        vec![WorkItem::new(cost, 1.0)]
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let result = calculate_optimal_combination(&CombinedRenovations::default());
        assert_eq!(result.total_deductible, 0);
        assert_eq!(result.max_control_amount, 0);
        assert_eq!(result.remaining, PROGRAM_CEILING);
        assert_eq!(result.final_deductible, 0);
        assert_eq!(result.five_percent_deductible, 0);
        assert_eq!(result.selected_pattern, PatternKind::General);
    }

    #[test]
    fn general_pattern_wins_without_long_term_housing() {
        let renovations = CombinedRenovations {
            seismic: Some(calc(2_500_000, 2_500_000)),
            barrier_free: Some(calc(2_000_000, 2_000_000)),
            ..Default::default()
        };
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.max_control_amount, 4_500_000);
        assert_eq!(result.total_deductible, 4_500_000);
        assert_eq!(result.remaining, 5_500_000);
        assert_eq!(result.selected_pattern, PatternKind::General);
    }

    #[test]
    fn no_overflow_uses_whole_total_as_credit_basis() {
        let renovations = CombinedRenovations {
            seismic: Some(calc(1_000_000, 1_000_000)),
            cohabitation: Some(calc(800_000, 800_000)),
            ..Default::default()
        };
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.excess_amount, 0);
        assert_eq!(result.final_deductible, result.total_deductible);
        assert_eq!(result.final_deductible, 1_800_000);
        assert_eq!(result.five_percent_deductible, 1_800_000);
    }

    #[test]
    fn excess_and_other_form_the_credit_basis() {
        let renovations = CombinedRenovations {
            seismic: Some(calculate_seismic(&single(3_000_000.0), 0.0)),
            other: Some(calculate_other_renovation(400_000.0, 0.0)),
            ..Default::default()
        };
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.max_control_amount, 2_500_000);
        assert_eq!(result.excess_amount, 500_000);
        assert_eq!(result.final_deductible, 900_000);
        assert_eq!(result.five_percent_deductible, 900_000);
    }

    #[test]
    fn credit_basis_never_exceeds_total_deductible() {
        let renovations = CombinedRenovations {
            barrier_free: Some(calc(600_000, 600_000)),
            other: Some(calc(5_000_000, 5_000_000)),
            ..Default::default()
        };
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.final_deductible, 600_000);
    }

    #[test]
    fn other_alone_without_capped_work_yields_zero_basis() {
        let renovations = CombinedRenovations {
            other: Some(calc(5_000_000, 5_000_000)),
            ..Default::default()
        };
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.total_deductible, 0);
        assert_eq!(result.final_deductible, 0);
    }

    #[test]
    fn program_ceiling_clamps_max_control_amount() {
        let renovations = CombinedRenovations {
            seismic: Some(calc(2_500_000, 2_500_000)),
            barrier_free: Some(calc(2_000_000, 2_000_000)),
            energy: Some(calc(3_500_000, 3_500_000)),
            cohabitation: Some(calc(2_500_000, 2_500_000)),
            childcare: Some(calc(2_500_000, 2_500_000)),
            ..Default::default()
        };
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.max_control_amount, 10_000_000);
        assert_eq!(result.remaining, 0);
        assert_eq!(result.five_percent_deductible, 0);
        assert_eq!(result.total_deductible, 13_000_000);
    }

    #[test]
    fn custom_ceiling_is_honoured() {
        let renovations = CombinedRenovations {
            seismic: Some(calc(2_500_000, 2_500_000)),
            ..Default::default()
        };
        let result = calculate_optimal_combination_with_ceiling(&renovations, 2_000_000);
        assert_eq!(result.max_control_amount, 2_000_000);
        assert_eq!(result.remaining, 0);
    }

    #[test]
    fn general_total_wins_when_long_term_only_ties_on_max() {
        let items = single(7_000_000.0);
        let renovations = CombinedRenovations {
            seismic: Some(calculate_seismic(&items, 0.0)),
            energy: Some(calculate_energy(&items, 0.0, false)),
            long_term_housing_and: Some(calculate_long_term_housing(
                &items,
                0.0,
                LongTermMode::And,
                false,
            )),
            ..Default::default()
        };
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.max_control_amount, 5_000_000);
        assert_eq!(result.total_deductible, 14_000_000);
        assert_eq!(result.selected_pattern, PatternKind::General);
        assert_eq!(result.excess_amount, 9_000_000);
    }

    #[test]
    fn tied_totals_prefer_and_then_or() {
        let shared = calc(1_000_000, 1_000_000);
        let renovations = CombinedRenovations {
            barrier_free: Some(shared),
            long_term_housing_or: Some(calc(3_000_000, 2_500_000)),
            long_term_housing_and: Some(calc(3_000_000, 3_000_000)),
            ..Default::default()
        };
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.total_deductible, 4_000_000);
        assert_eq!(result.selected_pattern, PatternKind::LongTermAnd);
        assert_eq!(result.excess_amount, 0);

        let without_and = CombinedRenovations {
            long_term_housing_and: None,
            ..renovations
        };
        let result = calculate_optimal_combination(&without_and);
        assert_eq!(result.selected_pattern, PatternKind::LongTermOr);
        assert_eq!(result.excess_amount, 500_000);
    }

    #[test]
    fn shared_categories_tie_across_all_patterns_and_fall_to_and() {
        let renovations = CombinedRenovations {
            barrier_free: Some(calc(2_500_000, 2_000_000)),
            ..Default::default()
        };
        let candidates = candidate_patterns(&renovations);
        assert!(candidates.iter().all(|pattern| pattern.total == 2_500_000));
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.selected_pattern, PatternKind::LongTermAnd);
        assert_eq!(result.excess_amount, 500_000);
    }

    #[test]
    fn totals_and_max_are_maximized_independently() {
        let renovations = CombinedRenovations {
            seismic: Some(calc(9_000_000, 2_500_000)),
            long_term_housing_and: Some(calc(6_000_000, 5_000_000)),
            ..Default::default()
        };
        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.total_deductible, 9_000_000);
        assert_eq!(result.max_control_amount, 5_000_000);
        assert_eq!(result.selected_pattern, PatternKind::General);
        assert_eq!(result.excess_amount, 6_500_000);
    }

    #[test]
    fn candidate_patterns_exclude_seismic_and_energy_from_long_term_groupings() {
        let renovations = CombinedRenovations {
            seismic: Some(calc(1_000_000, 1_000_000)),
            energy: Some(calc(700_000, 700_000)),
            cohabitation: Some(calc(600_000, 600_000)),
            long_term_housing_or: Some(calc(900_000, 900_000)),
            ..Default::default()
        };
        let [and, or, general] = candidate_patterns(&renovations);
        assert_eq!(general.total, 2_300_000);
        assert_eq!(or.total, 1_500_000);
        assert_eq!(and.total, 600_000);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_wrapping() {
        let items = single(5.0e18);
        let renovations = CombinedRenovations {
            seismic: Some(calculate_seismic(&items, 0.0)),
            barrier_free: Some(calculate_barrier_free(&items, 0.0)),
            other: Some(calc(i64::MAX, i64::MAX)),
            ..Default::default()
        };
        let [and, _, general] = candidate_patterns(&renovations);
        assert_eq!(general.total, i64::MAX);
        assert_eq!(and.total, 5_000_000_000_000_000_000);

        let result = calculate_optimal_combination(&renovations);
        assert_eq!(result.selected_pattern, PatternKind::General);
        assert_eq!(result.total_deductible, i64::MAX);
        assert_eq!(result.max_control_amount, 4_500_000);
        assert_eq!(result.final_deductible, i64::MAX);
        assert_eq!(result.five_percent_deductible, 5_500_000);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let renovations = CombinedRenovations {
            cohabitation: Some(calculate_cohabitation(&single(3_100_000.0), 50_000.0)),
            barrier_free: Some(calculate_barrier_free(&single(700_000.0), 0.0)),
            ..Default::default()
        };
        assert_eq!(
            calculate_optimal_combination(&renovations),
            calculate_optimal_combination(&renovations)
        );
    }
}
