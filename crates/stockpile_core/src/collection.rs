//! The insertion-ordered in-memory item collection.

use crate::item::Item;
use stockpile_codec::ItemRecord;
use std::collections::HashSet;

/// The full in-memory set of inventory items.
///
/// Items keep insertion order (listing and reports are deterministic) and
/// are looked up by id with a linear scan - the store is sized for a
/// single-user session, not bulk data.
///
/// The collection is owned exclusively by the [`crate::Store`]; accessors
/// hand out clones or borrows, never mutable references into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    items: Vec<Item>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from decoded wire records, preserving order.
    pub(crate) fn from_records(records: Vec<ItemRecord>) -> Self {
        Self {
            items: records.into_iter().map(Item::from_record).collect(),
        }
    }

    /// Converts the collection into wire records, preserving order.
    pub(crate) fn to_records(&self) -> Vec<ItemRecord> {
        self.items.iter().map(Item::to_record).collect()
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrows the items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Iterates the items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// The set of ids currently in use.
    #[must_use]
    pub fn ids(&self) -> HashSet<&str> {
        self.items.iter().map(|i| i.id().as_str()).collect()
    }

    /// Looks up an item by exact id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id().as_str() == id)
    }

    /// Position of an item by id, if present.
    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id().as_str() == id)
    }

    /// Appends an item. The caller has already checked id uniqueness.
    pub(crate) fn push(&mut self, item: Item) {
        debug_assert!(self.get(item.id().as_str()).is_none());
        self.items.push(item);
    }

    /// Removes and returns the item at `index`.
    pub(crate) fn remove_at(&mut self, index: usize) -> Item {
        self.items.remove(index)
    }

    /// Replaces the item at `index`, keeping its position.
    pub(crate) fn replace_at(&mut self, index: usize, item: Item) {
        self.items[index] = item;
    }

    /// Case-insensitive substring search over item names, in order.
    ///
    /// An empty query matches every item.
    #[must_use]
    pub fn find_by_name(&self, query: &str) -> Vec<&Item> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|i| needle.is_empty() || i.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Items with `quantity <= threshold`, in insertion order.
    #[must_use]
    pub fn low_stock(&self, threshold: u64) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| i.quantity() <= threshold)
            .collect()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(Item::quantity).sum()
    }

    /// Sum of quantity times unit price over all items.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.items.iter().map(Item::total_value).sum()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
