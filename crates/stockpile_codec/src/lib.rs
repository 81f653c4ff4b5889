//! # Stockpile Codec
//!
//! JSON snapshot encoding/decoding for Stockpile.
//!
//! The durable inventory snapshot is a pretty-printed JSON array of item
//! records, in insertion order. This crate owns the wire schema and the
//! strict decode rules:
//!
//! - Input that is not valid JSON fails with [`CodecError::Malformed`]
//! - Valid JSON that is missing required fields, has wrong types, violates
//!   an item invariant, or repeats an id fails with
//!   [`CodecError::SchemaMismatch`]
//! - Decode is all-or-nothing: no record is ever silently dropped or coerced
//!
//! ## Wire format
//!
//! ```json
//! [
//!   {
//!     "id": "SKU-001",
//!     "name": "Widget",
//!     "quantity": 5,
//!     "unit_price": 2.5,
//!     "created_at": "2026-08-30 10:15:00"
//!   }
//! ]
//! ```
//!
//! ## Usage
//!
//! ```
//! use stockpile_codec::{decode, encode, ItemRecord};
//!
//! let records = decode(br#"[{"id":"a","name":"Bolt","quantity":3,
//!     "unit_price":0.1,"created_at":"2026-08-30 10:15:00"}]"#).unwrap();
//! let bytes = encode(&records).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), records);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod record;
mod snapshot;

pub use error::{CodecError, CodecResult};
pub use record::{ItemRecord, TIMESTAMP_FORMAT};
pub use snapshot::{decode, encode};
