//! Pure validation of item drafts and patches.
//!
//! All field invariants are enforced here and nowhere else: the rest of the
//! crate only handles [`Item`] values that have already passed.

use crate::item::{Item, ItemDraft, ItemId, ItemPatch};
use chrono::{Local, NaiveDateTime, Timelike};
use std::collections::HashSet;
use thiserror::Error;

/// A field rule or uniqueness violation in a candidate item.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// An item with this id already exists.
    #[error("an item with id '{id}' already exists")]
    DuplicateId {
        /// The conflicting id.
        id: ItemId,
    },

    /// The name is empty after trimming.
    #[error("item name must not be empty")]
    InvalidName,

    /// The quantity is negative.
    #[error("quantity must not be negative (got {quantity})")]
    InvalidQuantity {
        /// The rejected quantity.
        quantity: i64,
    },

    /// The price is negative or not a finite number.
    #[error("unit price must be a finite non-negative number (got {price})")]
    InvalidPrice {
        /// The rejected price.
        price: f64,
    },
}

fn check_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidName);
    }
    Ok(trimmed.to_string())
}

fn check_quantity(quantity: i64) -> Result<u64, ValidationError> {
    u64::try_from(quantity).map_err(|_| ValidationError::InvalidQuantity { quantity })
}

fn check_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidPrice { price });
    }
    Ok(price)
}

/// Validates a draft against the field rules and the existing id set.
///
/// On success returns a normalized [`Item`] (name trimmed) stamped with the
/// current local time.
///
/// # Errors
///
/// - `DuplicateId` if the draft's id is already taken
/// - `InvalidName` if the name is empty after trimming
/// - `InvalidQuantity` if the quantity is negative
/// - `InvalidPrice` if the price is negative or not finite
pub fn validate_new(
    draft: &ItemDraft,
    existing_ids: &HashSet<&str>,
) -> Result<Item, ValidationError> {
    // Second resolution, matching the snapshot timestamp format, so an item
    // compares equal to itself after a save/load cycle.
    let now = Local::now().naive_local();
    validate_new_at(draft, existing_ids, now.with_nanosecond(0).unwrap_or(now))
}

/// As [`validate_new`], with an explicit creation timestamp.
pub fn validate_new_at(
    draft: &ItemDraft,
    existing_ids: &HashSet<&str>,
    created_at: NaiveDateTime,
) -> Result<Item, ValidationError> {
    if existing_ids.contains(draft.id.as_str()) {
        return Err(ValidationError::DuplicateId {
            id: ItemId::from(draft.id.as_str()),
        });
    }
    let name = check_name(&draft.name)?;
    let quantity = check_quantity(draft.quantity)?;
    let price = check_price(draft.unit_price)?;

    Ok(Item::from_parts(
        ItemId::from(draft.id.as_str()),
        name,
        quantity,
        price,
        created_at,
    ))
}

/// Applies a patch to an existing item, checking only the fields present.
///
/// The id and creation timestamp are never touched. On success returns the
/// updated item; the input item is untouched on failure.
///
/// # Errors
///
/// Same field rules as [`validate_new`]; `DuplicateId` cannot occur since
/// the id is immutable.
pub fn validate_update(existing: &Item, patch: &ItemPatch) -> Result<Item, ValidationError> {
    let name = match &patch.name {
        Some(name) => check_name(name)?,
        None => existing.name().to_string(),
    };
    let quantity = match patch.quantity {
        Some(quantity) => check_quantity(quantity)?,
        None => existing.quantity(),
    };
    let price = match patch.unit_price {
        Some(price) => check_price(price)?,
        None => existing.unit_price(),
    };

    Ok(Item::from_parts(
        existing.id().clone(),
        name,
        quantity,
        price,
        existing.created_at(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_ids() -> HashSet<&'static str> {
        HashSet::new()
    }

    #[test]
    fn accepts_and_normalizes() {
        let draft = ItemDraft::new("W1", "  Widget  ", 5, 2.5);
        let item = validate_new(&draft, &no_ids()).unwrap();
        assert_eq!(item.name(), "Widget");
        assert_eq!(item.quantity(), 5);
        assert_eq!(item.id().as_str(), "W1");
    }

    #[test]
    fn rejects_duplicate_id() {
        let mut ids = HashSet::new();
        ids.insert("W1");
        let draft = ItemDraft::new("W1", "Widget", 5, 2.5);
        assert_eq!(
            validate_new(&draft, &ids),
            Err(ValidationError::DuplicateId {
                id: ItemId::from("W1")
            })
        );
    }

    #[test]
    fn rejects_blank_name() {
        let draft = ItemDraft::new("W1", "   ", 5, 2.5);
        assert_eq!(validate_new(&draft, &no_ids()), Err(ValidationError::InvalidName));
    }

    #[test]
    fn rejects_negative_quantity() {
        let draft = ItemDraft::new("W1", "Widget", -1, 2.5);
        assert_eq!(
            validate_new(&draft, &no_ids()),
            Err(ValidationError::InvalidQuantity { quantity: -1 })
        );
    }

    #[test]
    fn rejects_bad_price() {
        let draft = ItemDraft::new("W1", "Widget", 5, -0.5);
        assert!(matches!(
            validate_new(&draft, &no_ids()),
            Err(ValidationError::InvalidPrice { .. })
        ));

        let nan = ItemDraft::new("W1", "Widget", 5, f64::NAN);
        assert!(matches!(
            validate_new(&nan, &no_ids()),
            Err(ValidationError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn zero_price_and_quantity_are_valid() {
        let draft = ItemDraft::new("W1", "Widget", 0, 0.0);
        assert!(validate_new(&draft, &no_ids()).is_ok());
    }

    #[test]
    fn update_touches_only_patched_fields() {
        let draft = ItemDraft::new("W1", "Widget", 5, 2.5);
        let item = validate_new(&draft, &no_ids()).unwrap();

        let updated = validate_update(&item, &ItemPatch::empty().quantity(9)).unwrap();
        assert_eq!(updated.quantity(), 9);
        assert_eq!(updated.name(), "Widget");
        assert_eq!(updated.created_at(), item.created_at());
        assert_eq!(updated.id(), item.id());
    }

    #[test]
    fn update_rejects_bad_fields() {
        let draft = ItemDraft::new("W1", "Widget", 5, 2.5);
        let item = validate_new(&draft, &no_ids()).unwrap();

        assert_eq!(
            validate_update(&item, &ItemPatch::empty().quantity(-1)),
            Err(ValidationError::InvalidQuantity { quantity: -1 })
        );
        assert_eq!(
            validate_update(&item, &ItemPatch::empty().name("  ")),
            Err(ValidationError::InvalidName)
        );
    }

    #[test]
    fn empty_update_is_identity() {
        let draft = ItemDraft::new("W1", "Widget", 5, 2.5);
        let item = validate_new(&draft, &no_ids()).unwrap();
        assert_eq!(validate_update(&item, &ItemPatch::empty()).unwrap(), item);
    }
}
