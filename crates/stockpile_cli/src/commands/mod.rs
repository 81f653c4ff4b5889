//! CLI command implementations.

pub mod backups;
pub mod mutate;
pub mod query;
pub mod report;

use stockpile_core::Item;

/// One-line rendering shared by list, find, and low-stock output.
pub fn line(item: &Item) -> String {
    format!(
        "{}  {}  qty {}  @ {:.2}  (added {})",
        item.id(),
        item.name(),
        item.quantity(),
        item.unit_price(),
        item.created_at().format("%Y-%m-%d %H:%M:%S"),
    )
}
