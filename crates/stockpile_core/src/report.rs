//! Inventory report aggregates.

use crate::collection::Collection;
use crate::item::Item;
use chrono::{Local, NaiveDateTime};

/// Deterministic aggregate over the collection.
///
/// This is the structured payload the presentation layer renders; the core
/// does not format text.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryReport {
    /// When the report was generated.
    pub generated_at: NaiveDateTime,
    /// Number of distinct items.
    pub total_items: usize,
    /// Sum of all quantities.
    pub total_units: u64,
    /// Sum of quantity times unit price over all items.
    pub total_value: f64,
    /// Threshold used for the low-stock subset.
    pub low_stock_threshold: u64,
    /// Items at or below the threshold, in collection order.
    pub low_stock: Vec<Item>,
}

impl InventoryReport {
    /// Builds a report over `collection` at the given threshold.
    #[must_use]
    pub fn build(collection: &Collection, threshold: u64) -> Self {
        Self::build_at(collection, threshold, Local::now().naive_local())
    }

    /// As [`build`](Self::build), with an explicit timestamp.
    #[must_use]
    pub fn build_at(collection: &Collection, threshold: u64, at: NaiveDateTime) -> Self {
        Self {
            generated_at: at,
            total_items: collection.len(),
            total_units: collection.total_units(),
            total_value: collection.total_value(),
            low_stock_threshold: threshold,
            low_stock: collection.low_stock(threshold).into_iter().cloned().collect(),
        }
    }

    /// True if any item is at or below the threshold.
    #[must_use]
    pub fn has_low_stock(&self) -> bool {
        !self.low_stock.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDraft;
    use crate::validate::validate_new;

    fn collection() -> Collection {
        let mut c = Collection::new();
        for (id, name, quantity, price) in
            [("1", "A", 0i64, 1.0), ("2", "B", 2, 2.5), ("3", "C", 10, 0.5)]
        {
            let item = validate_new(&ItemDraft::new(id, name, quantity, price), &c.ids()).unwrap();
            c.push(item);
        }
        c
    }

    #[test]
    fn aggregates_are_deterministic() {
        let c = collection();
        let report = InventoryReport::build(&c, 3);

        assert_eq!(report.total_items, 3);
        assert_eq!(report.total_units, 12);
        assert!((report.total_value - 10.0).abs() < f64::EPSILON);
        let low: Vec<_> = report.low_stock.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(low, vec!["1", "2"]);
        assert!(report.has_low_stock());
    }

    #[test]
    fn empty_collection_reports_zeroes() {
        let report = InventoryReport::build(&Collection::new(), 5);
        assert_eq!(report.total_items, 0);
        assert_eq!(report.total_units, 0);
        assert_eq!(report.total_value, 0.0);
        assert!(!report.has_low_stock());
    }
}
