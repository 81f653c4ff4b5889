//! # Stockpile Testkit
//!
//! Test utilities for Stockpile.
//!
//! This crate provides:
//! - Test fixtures and store helpers
//! - Failure-injecting storage backends for atomicity testing
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use stockpile_testkit::prelude::*;
//!
//! let mut store = TestStore::new();
//! store.add(draft("W1", "Widget", 5, 2.5)).unwrap();
//! assert_eq!(store.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod failpoint;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::failpoint::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use failpoint::*;
pub use fixtures::*;
pub use generators::*;
