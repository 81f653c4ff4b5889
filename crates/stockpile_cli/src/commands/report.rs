//! Report command: renders the core's report aggregate to a text artifact.
//!
//! The core only supplies structured data; the text layout and the file
//! write live here, on the presentation side.

use chrono::Local;
use std::fmt::Write as _;
use std::path::Path;
use stockpile_core::{InventoryReport, Store};
use tracing::info;

/// Builds the report and writes it to `inventory_report_<ts>.txt` under
/// `out_dir`.
pub fn run(
    store: &Store,
    threshold: Option<u64>,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let threshold = threshold.unwrap_or(store.config().low_stock_threshold);
    let report = store.report(threshold);

    let name = format!(
        "inventory_report_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = out_dir.join(&name);
    std::fs::write(&path, render(&report, store))?;

    info!(path = %path.display(), "report written");
    println!("✓ Report written to {}", path.display());
    Ok(())
}

fn render(report: &InventoryReport, store: &Store) -> String {
    let mut out = String::new();
    let rule = "=".repeat(72);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "INVENTORY REPORT");
    let _ = writeln!(
        out,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out);

    if store.is_empty() {
        let _ = writeln!(out, "Inventory is empty.");
        return out;
    }

    let _ = writeln!(out, "Items: {}", report.total_items);
    for (i, item) in store.items().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:3}. {}  {}  qty {}  @ {:.2}",
            i + 1,
            item.id(),
            item.name(),
            item.quantity(),
            item.unit_price()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total units: {}", report.total_units);
    let _ = writeln!(out, "Total value: {:.2}", report.total_value);

    if report.has_low_stock() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Low stock (<= {}): {} item(s)",
            report.low_stock_threshold,
            report.low_stock.len()
        );
        for item in &report.low_stock {
            let _ = writeln!(
                out,
                "  - {} (id {}, stock {})",
                item.name(),
                item.id(),
                item.quantity()
            );
        }
    }

    out
}
