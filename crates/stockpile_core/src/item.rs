//! Inventory item value types.

use chrono::NaiveDateTime;
use stockpile_codec::ItemRecord;

/// Opaque, caller-assigned item identifier.
///
/// Immutable after creation; its only invariant is uniqueness across the
/// collection, enforced by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One validated inventory record.
///
/// `Item` is an immutable value type: fields are private and there are no
/// setters. The only way to obtain one is through the validator
/// ([`crate::validate_new`] / [`crate::validate_update`]) or by decoding a
/// snapshot whose records have already passed the same invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: u64,
    unit_price: f64,
    created_at: NaiveDateTime,
}

impl Item {
    /// Assembles an item from parts that already satisfy the invariants.
    ///
    /// Crate-private: callers go through the validator.
    pub(crate) fn from_parts(
        id: ItemId,
        name: String,
        quantity: u64,
        unit_price: f64,
        created_at: NaiveDateTime,
    ) -> Self {
        debug_assert!(!name.trim().is_empty());
        debug_assert!(unit_price.is_finite() && unit_price >= 0.0);
        Self {
            id,
            name,
            quantity,
            unit_price,
            created_at,
        }
    }

    /// Converts a decoded wire record into an item.
    pub(crate) fn from_record(record: ItemRecord) -> Self {
        Self::from_parts(
            ItemId::from(record.id),
            record.name,
            record.quantity,
            record.unit_price,
            record.created_at,
        )
    }

    /// Converts this item into its wire record.
    pub(crate) fn to_record(&self) -> ItemRecord {
        ItemRecord {
            id: self.id.as_str().to_string(),
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            created_at: self.created_at,
        }
    }

    /// The unique identifier.
    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// The trimmed item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units in stock.
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Price per unit.
    #[must_use]
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// When the item was first added.
    #[must_use]
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Stock value of this line: quantity times unit price.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// A candidate item as supplied by the caller, before validation.
///
/// Quantity and price are signed so out-of-range input is representable and
/// can be rejected with a specific error instead of failing at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    /// Caller-assigned id.
    pub id: String,
    /// Proposed name; will be trimmed.
    pub name: String,
    /// Proposed quantity; must be >= 0.
    pub quantity: i64,
    /// Proposed unit price; must be finite and >= 0.
    pub unit_price: f64,
}

impl ItemDraft {
    /// Convenience constructor.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
        unit_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            unit_price,
        }
    }
}

/// A partial update to an existing item.
///
/// `None` fields are left unchanged. The id is not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    /// New name, if changing.
    pub name: Option<String>,
    /// New quantity, if changing.
    pub quantity: Option<i64>,
    /// New unit price, if changing.
    pub unit_price: Option<f64>,
}

impl ItemPatch {
    /// A patch that changes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the name field.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the quantity field.
    #[must_use]
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the unit price field.
    #[must_use]
    pub fn unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.unit_price.is_none()
    }
}
