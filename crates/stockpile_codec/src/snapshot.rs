//! Snapshot encode and decode.

use crate::error::{CodecError, CodecResult};
use crate::record::ItemRecord;
use serde_json::error::Category;
use std::collections::HashSet;

/// Encodes records into snapshot bytes.
///
/// The output is pretty-printed JSON preserving record order, followed by a
/// trailing newline.
///
/// # Errors
///
/// Returns `EncodingFailed` if serialization fails (a non-string map key or
/// similar - not reachable for well-formed records).
pub fn encode(records: &[ItemRecord]) -> CodecResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(records)
        .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decodes snapshot bytes into records.
///
/// Decode is all-or-nothing: either every record parses and satisfies the
/// item invariants (including id uniqueness across the snapshot), or the
/// whole call fails.
///
/// # Errors
///
/// - `Malformed` if the input is not valid JSON
/// - `SchemaMismatch` if the JSON does not match the record schema, a record
///   violates an item invariant, or two records share an id
pub fn decode(bytes: &[u8]) -> CodecResult<Vec<ItemRecord>> {
    let records: Vec<ItemRecord> =
        serde_json::from_slice(bytes).map_err(|e| match e.classify() {
            Category::Syntax | Category::Eof | Category::Io => {
                CodecError::malformed(e.to_string())
            }
            Category::Data => CodecError::schema_mismatch(e.to_string()),
        })?;

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        record.validate()?;
        if !seen.insert(record.id.as_str()) {
            return Err(CodecError::schema_mismatch(format!(
                "duplicate id '{}' in snapshot",
                record.id
            )));
        }
    }

    Ok(records)
}
