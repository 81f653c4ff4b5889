//! List, find, get, and low-stock commands.

use crate::commands::line;
use stockpile_core::Store;

/// Prints every item in collection order.
pub fn list(store: &Store) {
    if store.is_empty() {
        println!("Inventory is empty.");
        return;
    }

    println!("Inventory ({} items):", store.len());
    for item in store.items() {
        println!("  {}", line(item));
    }
}

/// Prints items whose names contain `query`, case-insensitively.
pub fn find(store: &Store, query: &str) {
    let matches = store.find_by_name(query);
    if matches.is_empty() {
        println!("No items match '{query}'.");
        return;
    }

    println!("{} match(es):", matches.len());
    for item in &matches {
        println!("  {}", line(item));
    }
}

/// Prints one item by exact id.
pub fn get(store: &Store, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let item = store.find_by_id(id)?;
    println!("{}", line(&item));
    Ok(())
}

/// Prints items at or below the threshold.
pub fn low_stock(store: &Store, threshold: Option<u64>) {
    let threshold = threshold.unwrap_or(store.config().low_stock_threshold);
    let items = store.low_stock(threshold);
    if items.is_empty() {
        println!("All items are above stock level {threshold}.");
        return;
    }

    println!("⚠ {} item(s) at or below stock level {threshold}:", items.len());
    for item in &items {
        println!("  {}", line(item));
    }
}
