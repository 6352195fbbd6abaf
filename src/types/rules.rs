use serde::{Deserialize, Serialize};
use std::fmt;

pub const STANDARD_THRESHOLD: i64 = 500_000;
pub const PROGRAM_CEILING: i64 = 10_000_000;

/// Renovation categories that can appear on one certificate.
///
/// Variant order is the order categories are listed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Seismic,
    BarrierFree,
    Energy,
    Cohabitation,
    Childcare,
    LongTermHousingOr,
    LongTermHousingAnd,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Seismic,
        Category::BarrierFree,
        Category::Energy,
        Category::Cohabitation,
        Category::Childcare,
        Category::LongTermHousingOr,
        Category::LongTermHousingAnd,
        Category::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Seismic => "seismic",
            Category::BarrierFree => "barrier_free",
            Category::Energy => "energy",
            Category::Cohabitation => "cohabitation",
            Category::Childcare => "childcare",
            Category::LongTermHousingOr => "long_term_housing_or",
            Category::LongTermHousingAnd => "long_term_housing_and",
            Category::Other => "other",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Long-term-excellent-housing grouping: seismic-or-energy versus seismic-and-energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LongTermMode {
    Or,
    And,
}

impl LongTermMode {
    pub fn category(self) -> Category {
        match self {
            LongTermMode::Or => Category::LongTermHousingOr,
            LongTermMode::And => Category::LongTermHousingAnd,
        }
    }
}

/// Threshold and cap parameters for one category.
///
/// `threshold: None` means the category always qualifies; `cap: None` means uncapped.
/// `solar_cap` replaces `cap` when the dwelling has a solar panel installed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryRule {
    pub threshold: Option<i64>,
    pub cap: Option<i64>,
    pub solar_cap: Option<i64>,
    pub applies_window_ratio: bool,
}

impl CategoryRule {
    pub const fn capped(cap: i64) -> Self {
        Self {
            threshold: Some(STANDARD_THRESHOLD),
            cap: Some(cap),
            solar_cap: None,
            applies_window_ratio: false,
        }
    }

    pub fn with_solar_cap(mut self, solar_cap: i64) -> Self {
        self.solar_cap = Some(solar_cap);
        self
    }

    pub fn with_window_ratio(mut self) -> Self {
        self.applies_window_ratio = true;
        self
    }

    pub const fn uncapped() -> Self {
        Self {
            threshold: None,
            cap: None,
            solar_cap: None,
            applies_window_ratio: false,
        }
    }

    pub fn effective_cap(&self, has_solar_panel: bool) -> Option<i64> {
        if has_solar_panel {
            self.solar_cap.or(self.cap)
        } else {
            self.cap
        }
    }
}

/// The full parameter set the engine runs against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeductionRules {
    pub seismic: CategoryRule,
    pub barrier_free: CategoryRule,
    pub energy: CategoryRule,
    pub cohabitation: CategoryRule,
    pub childcare: CategoryRule,
    pub long_term_housing_or: CategoryRule,
    pub long_term_housing_and: CategoryRule,
    pub other: CategoryRule,
    pub program_ceiling: i64,
}

impl DeductionRules {
    pub fn statutory() -> Self {
        Self {
            seismic: CategoryRule::capped(2_500_000),
            barrier_free: CategoryRule::capped(2_000_000),
            energy: CategoryRule::capped(2_500_000)
                .with_solar_cap(3_500_000)
                .with_window_ratio(),
            cohabitation: CategoryRule::capped(2_500_000),
            childcare: CategoryRule::capped(2_500_000),
            long_term_housing_or: CategoryRule::capped(2_500_000)
                .with_solar_cap(3_500_000)
                .with_window_ratio(),
            long_term_housing_and: CategoryRule::capped(5_000_000)
                .with_solar_cap(6_000_000)
                .with_window_ratio(),
            other: CategoryRule::uncapped(),
            program_ceiling: PROGRAM_CEILING,
        }
    }

    pub fn rule(&self, category: Category) -> &CategoryRule {
        match category {
            Category::Seismic => &self.seismic,
            Category::BarrierFree => &self.barrier_free,
            Category::Energy => &self.energy,
            Category::Cohabitation => &self.cohabitation,
            Category::Childcare => &self.childcare,
            Category::LongTermHousingOr => &self.long_term_housing_or,
            Category::LongTermHousingAnd => &self.long_term_housing_and,
            Category::Other => &self.other,
        }
    }

    pub fn rule_mut(&mut self, category: Category) -> &mut CategoryRule {
        match category {
            Category::Seismic => &mut self.seismic,
            Category::BarrierFree => &mut self.barrier_free,
            Category::Energy => &mut self.energy,
            Category::Cohabitation => &mut self.cohabitation,
            Category::Childcare => &mut self.childcare,
            Category::LongTermHousingOr => &mut self.long_term_housing_or,
            Category::LongTermHousingAnd => &mut self.long_term_housing_and,
            Category::Other => &mut self.other,
        }
    }
}

impl Default for DeductionRules {
    fn default() -> Self {
        Self::statutory()
    }
}
