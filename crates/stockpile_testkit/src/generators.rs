//! Property-based test generators.

use proptest::prelude::*;
use stockpile_core::ItemDraft;

/// Strategy for a valid item name (non-empty after trimming).
pub fn valid_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,16}".prop_map(|s| s.trim_end().to_string())
}

/// Strategy for a valid quantity.
pub fn valid_quantity() -> impl Strategy<Value = i64> {
    0i64..100_000
}

/// Strategy for a valid unit price with two-decimal precision.
pub fn valid_price() -> impl Strategy<Value = f64> {
    (0u32..10_000_000).prop_map(|cents| f64::from(cents) / 100.0)
}

/// Strategy for a valid draft with the given id.
pub fn valid_draft(id: String) -> impl Strategy<Value = ItemDraft> {
    (valid_name(), valid_quantity(), valid_price())
        .prop_map(move |(name, quantity, price)| ItemDraft::new(id.clone(), name, quantity, price))
}

/// Strategy for up to `max` drafts with pairwise-distinct ids.
pub fn unique_drafts(max: usize) -> impl Strategy<Value = Vec<ItemDraft>> {
    prop::collection::hash_set("[a-z]{1,8}", 0..max)
        .prop_flat_map(|ids| ids.into_iter().map(valid_draft).collect::<Vec<_>>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    proptest! {
        #[test]
        fn generated_drafts_have_unique_ids(drafts in unique_drafts(8)) {
            let ids: HashSet<_> = drafts.iter().map(|d| d.id.clone()).collect();
            prop_assert_eq!(ids.len(), drafts.len());
        }

        #[test]
        fn generated_drafts_are_valid(draft in valid_draft("id".to_string())) {
            prop_assert!(!draft.name.trim().is_empty());
            prop_assert!(draft.quantity >= 0);
            prop_assert!(draft.unit_price >= 0.0 && draft.unit_price.is_finite());
        }
    }
}
