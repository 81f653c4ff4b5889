//! # Stockpile Storage
//!
//! Durable-file backend trait and implementations for Stockpile.
//!
//! This crate provides the lowest-level storage abstraction for Stockpile.
//! Backends are **opaque snapshot stores** - they hold the full serialized
//! inventory as a single byte blob and replace it atomically. They do not
//! interpret the data they store.
//!
//! ## Design Principles
//!
//! - Backends hold one snapshot (read all, replace all)
//! - `replace` is all-or-nothing: readers observe either the prior snapshot
//!   or the new one, never a truncated or interleaved write
//! - Stockpile owns all format interpretation
//!
//! ## Available Backends
//!
//! - [`MemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - For persistent storage using write-to-temp plus
//!   atomic rename
//!
//! ## Example
//!
//! ```rust
//! use stockpile_storage::{SnapshotBackend, MemoryBackend};
//!
//! let mut backend = MemoryBackend::new();
//! assert!(backend.read_all().unwrap().is_none());
//! backend.replace(b"[]").unwrap();
//! assert_eq!(backend.read_all().unwrap().as_deref(), Some(&b"[]"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::SnapshotBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
