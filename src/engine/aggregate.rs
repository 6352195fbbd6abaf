use crate::engine::numeric::round_yen;
use crate::types::work_item::WorkItem;

/// Whether an item's window-area ratio participates in its contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRatio {
    Applies,
    Ignored,
}

impl WindowRatio {
    pub fn from_flag(applies: bool) -> Self {
        if applies {
            WindowRatio::Applies
        } else {
            WindowRatio::Ignored
        }
    }
}

pub fn item_contribution(item: &WorkItem, window: WindowRatio) -> f64 {
    let window_ratio = match window {
        WindowRatio::Applies => item.window_area_ratio(),
        WindowRatio::Ignored => 1.0,
    };
    item.unit_price() * item.quantity() * item.resident_ratio() * window_ratio
}

/// Unrounded sum of item contributions. Inputs are not clamped.
pub fn sum_contributions(items: &[WorkItem], window: WindowRatio) -> f64 {
    items
        .iter()
        .map(|item| item_contribution(item, window))
        .sum()
}

pub fn aggregate_work_items(items: &[WorkItem], window: WindowRatio) -> i64 {
    round_yen(sum_contributions(items, window))
}
