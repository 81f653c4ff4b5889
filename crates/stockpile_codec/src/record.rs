//! Wire-level item record and timestamp format.

use crate::error::{CodecError, CodecResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used in snapshots and backup names.
///
/// Second resolution, no timezone - the store is a single-user local file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One inventory item as it appears in the durable snapshot.
///
/// This is the wire representation. Field invariants (non-empty trimmed
/// name, finite non-negative price) are enforced by [`ItemRecord::validate`]
/// during decode, not by the type itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemRecord {
    /// Caller-assigned unique identifier.
    pub id: String,
    /// Item name, non-empty after trimming.
    pub name: String,
    /// Units in stock.
    pub quantity: u64,
    /// Price per unit.
    pub unit_price: f64,
    /// Creation timestamp, `%Y-%m-%d %H:%M:%S`.
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

impl ItemRecord {
    /// Checks the item invariants this record must satisfy in a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if the name is empty after trimming or the
    /// price is negative or not finite. Quantity is non-negative by type.
    pub fn validate(&self) -> CodecResult<()> {
        if self.name.trim().is_empty() {
            return Err(CodecError::schema_mismatch(format!(
                "item '{}' has an empty name",
                self.id
            )));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(CodecError::schema_mismatch(format!(
                "item '{}' has invalid unit_price {}",
                self.id, self.unit_price
            )));
        }
        Ok(())
    }
}

/// Serde adapter for the snapshot timestamp format.
mod timestamp {
    use super::{NaiveDateTime, TIMESTAMP_FORMAT};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
