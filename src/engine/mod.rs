//! Pure calculation engine: work-item aggregation, per-category deductions and the
//! combination optimizer. Nothing here performs I/O or fails.

pub mod aggregate;
pub mod category;
pub mod combination;
pub mod numeric;

pub use aggregate::{aggregate_work_items, WindowRatio};
pub use category::{
    calculate_barrier_free, calculate_category, calculate_childcare, calculate_cohabitation,
    calculate_energy, calculate_from_total, calculate_long_term_housing,
    calculate_other_renovation, calculate_seismic,
};
pub use combination::{
    calculate_optimal_combination, calculate_optimal_combination_with_ceiling,
    candidate_patterns,
};
pub use numeric::{decimal_to_number, round_yen, DecimalValue};
