//! Add, remove, and update commands.

use stockpile_core::{ItemDraft, ItemPatch, Store};
use tracing::info;

/// Adds a new item to the store.
pub fn add(
    store: &mut Store,
    id: String,
    name: String,
    quantity: i64,
    price: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let item = store.add(ItemDraft::new(id, name, quantity, price))?;
    println!("✓ Added '{}' (id {})", item.name(), item.id());
    Ok(())
}

/// Removes an item by id.
pub fn remove(store: &mut Store, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let removed = store.remove(id)?;
    println!("✓ Removed '{}' (id {})", removed.name(), removed.id());
    Ok(())
}

/// Applies the given field changes to an item.
pub fn update(
    store: &mut Store,
    id: &str,
    name: Option<String>,
    quantity: Option<i64>,
    price: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let patch = ItemPatch {
        name,
        quantity,
        unit_price: price,
    };
    if patch.is_empty() {
        println!("Nothing to update: pass --name, --quantity, or --price");
        return Ok(());
    }

    info!(id, "updating item");
    let updated = store.update(id, &patch)?;
    println!(
        "✓ Updated '{}': qty {}, price {:.2}",
        updated.name(),
        updated.quantity(),
        updated.unit_price()
    );
    Ok(())
}
