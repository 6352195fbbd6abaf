use serde::Serialize;

/// One priced line of work within a single category.
///
/// Omitted ratios default to `1.0` here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkItem {
    unit_price: f64,
    quantity: f64,
    resident_ratio: f64,
    window_area_ratio: f64,
}

impl WorkItem {
    pub fn new(unit_price: f64, quantity: f64) -> Self {
        Self {
            unit_price,
            quantity,
            resident_ratio: 1.0,
            window_area_ratio: 1.0,
        }
    }

    pub fn with_resident_ratio(mut self, ratio: f64) -> Self {
        self.resident_ratio = ratio;
        self
    }

    pub fn with_window_area_ratio(mut self, ratio: f64) -> Self {
        self.window_area_ratio = ratio;
        self
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn resident_ratio(&self) -> f64 {
        self.resident_ratio
    }

    pub fn window_area_ratio(&self) -> f64 {
        self.window_area_ratio
    }
}
