//! Ordering of results by their computed percentage change.

use std::cmp::Ordering;

/// Whether, and in which direction, results are sorted by percentage change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PercentageOrder {
    #[default]
    Unordered,
    Ascending,
    Descending,
}

impl PercentageOrder {
    pub fn is_ordered(self) -> bool {
        !matches!(self, Self::Unordered)
    }
}

/// Compare two percentage changes.
///
/// Ascending puts `NaN` first, descending puts it last. Two `NaN`s compare equal.
pub fn compare_percentage_change(a: f64, b: f64, order: PercentageOrder) -> Ordering {
    match order {
        PercentageOrder::Unordered => Ordering::Equal,
        PercentageOrder::Ascending => match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        },
        PercentageOrder::Descending => match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        },
    }
}

/// Stable in-place sort of `items` by the percentage change `metric` extracts.
pub fn sort_by_percentage_change<T>(
    items: &mut [T],
    order: PercentageOrder,
    metric: impl Fn(&T) -> f64,
) {
    if !order.is_ordered() {
        return;
    }
    items.sort_by(|a, b| compare_percentage_change(metric(a), metric(b), order));
}
