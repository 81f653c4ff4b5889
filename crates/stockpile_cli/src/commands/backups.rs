//! Backups command: lists backup artifacts.
//!
//! Restoring from a backup is a manual operator action - copy the chosen
//! file over the durable file while the store is closed. The store itself
//! never reads backups back.

use stockpile_core::Store;

/// Prints all backup files, oldest first.
pub fn run(store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let names = store.backups().list()?;
    if names.is_empty() {
        println!("No backups yet.");
        return Ok(());
    }

    println!("{} backup(s) in {}:", names.len(), store.backups().dir().display());
    for name in &names {
        println!("  {name}");
    }
    Ok(())
}
