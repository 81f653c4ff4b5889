//! Stockpile CLI
//!
//! Command-line front end for the Stockpile inventory store.
//!
//! # Commands
//!
//! - `add` / `remove` / `update` - mutate the inventory
//! - `list` / `find` / `get` / `low-stock` - query it
//! - `report` - write a timestamped report artifact
//! - `backups` - list backup files
//!
//! The CLI is a thin presentation layer: it calls store operations,
//! renders their results, and performs no file I/O against the durable
//! file or backups itself.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stockpile_core::Store;
use tracing_subscriber::EnvFilter;

/// Stockpile inventory command-line tools.
#[derive(Parser)]
#[command(name = "stockpile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short, long, default_value = "inventory")]
    path: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new item
    Add {
        /// Unique item id
        id: String,
        /// Item name
        name: String,
        /// Units in stock
        quantity: i64,
        /// Price per unit
        price: f64,
    },

    /// Remove an item by id
    Remove {
        /// Id of the item to remove
        id: String,
    },

    /// Update fields of an existing item
    Update {
        /// Id of the item to update
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New quantity
        #[arg(long)]
        quantity: Option<i64>,

        /// New unit price
        #[arg(long)]
        price: Option<f64>,
    },

    /// List all items
    List,

    /// Find items by name (case-insensitive substring)
    Find {
        /// Name or part of a name; empty matches all
        query: String,
    },

    /// Show one item by id
    Get {
        /// Id of the item
        id: String,
    },

    /// List items at or below a stock threshold
    LowStock {
        /// Stock threshold (defaults to the store configuration)
        #[arg(short, long)]
        threshold: Option<u64>,
    },

    /// Write a timestamped inventory report
    Report {
        /// Low-stock threshold for the report
        #[arg(short, long)]
        threshold: Option<u64>,

        /// Output directory for the report file
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// List backup files
    Backups,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut store = Store::open(&cli.path)?;
    if store.last_load().recovered_from_corruption() {
        eprintln!("⚠ inventory file was unreadable; it has been quarantined and the store reset");
    }

    match cli.command {
        Commands::Add {
            id,
            name,
            quantity,
            price,
        } => commands::mutate::add(&mut store, id, name, quantity, price)?,
        Commands::Remove { id } => commands::mutate::remove(&mut store, &id)?,
        Commands::Update {
            id,
            name,
            quantity,
            price,
        } => commands::mutate::update(&mut store, &id, name, quantity, price)?,
        Commands::List => commands::query::list(&store),
        Commands::Find { query } => commands::query::find(&store, &query),
        Commands::Get { id } => commands::query::get(&store, &id)?,
        Commands::LowStock { threshold } => commands::query::low_stock(&store, threshold),
        Commands::Report { threshold, out_dir } => {
            commands::report::run(&store, threshold, &out_dir)?;
        }
        Commands::Backups => commands::backups::run(&store)?,
    }

    Ok(())
}
