use crate::engine::numeric::{decimal_to_number, DecimalValue};
use crate::types::rules::Category;
use crate::types::work_item::WorkItem;
use serde::{Deserialize, Serialize};

/// One certificate as submitted by the form layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateInput {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub has_solar_panel: bool,
    pub seismic: Option<CategorySection>,
    pub barrier_free: Option<CategorySection>,
    pub energy: Option<CategorySection>,
    pub cohabitation: Option<CategorySection>,
    pub childcare: Option<CategorySection>,
    pub long_term_housing_or: Option<CategorySection>,
    pub long_term_housing_and: Option<CategorySection>,
    pub other: Option<OtherSection>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CategorySection {
    pub subsidy: Option<DecimalValue>,
    #[serde(default)]
    pub items: Vec<WorkItemInput>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkItemInput {
    pub unit_price: DecimalValue,
    pub quantity: DecimalValue,
    pub resident_ratio: Option<DecimalValue>,
    pub window_area_ratio: Option<DecimalValue>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OtherSection {
    pub total_cost: Option<DecimalValue>,
    pub subsidy: Option<DecimalValue>,
}

impl CertificateInput {
    /// Section for an item-based category. `Category::Other` has no items and yields `None`.
    pub fn section(&self, category: Category) -> Option<&CategorySection> {
        match category {
            Category::Seismic => self.seismic.as_ref(),
            Category::BarrierFree => self.barrier_free.as_ref(),
            Category::Energy => self.energy.as_ref(),
            Category::Cohabitation => self.cohabitation.as_ref(),
            Category::Childcare => self.childcare.as_ref(),
            Category::LongTermHousingOr => self.long_term_housing_or.as_ref(),
            Category::LongTermHousingAnd => self.long_term_housing_and.as_ref(),
            Category::Other => None,
        }
    }
}

impl CategorySection {
    pub fn subsidy_amount(&self) -> f64 {
        decimal_to_number(self.subsidy.as_ref())
    }

    pub fn work_items(&self) -> Vec<WorkItem> {
        self.items.iter().map(WorkItemInput::to_work_item).collect()
    }
}

impl WorkItemInput {
    pub fn to_work_item(&self) -> WorkItem {
        let mut item = WorkItem::new(
            decimal_to_number(Some(&self.unit_price)),
            decimal_to_number(Some(&self.quantity)),
        );
        if let Some(ratio) = &self.resident_ratio {
            item = item.with_resident_ratio(decimal_to_number(Some(ratio)));
        }
        if let Some(ratio) = &self.window_area_ratio {
            item = item.with_window_area_ratio(decimal_to_number(Some(ratio)));
        }
        item
    }
}

impl OtherSection {
    pub fn total_cost(&self) -> f64 {
        decimal_to_number(self.total_cost.as_ref())
    }

    pub fn subsidy_amount(&self) -> f64 {
        decimal_to_number(self.subsidy.as_ref())
    }
}
