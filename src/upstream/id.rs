//! Resource identifier validation.
//!
//! Catalog identifiers are opaque 22-character base62 strings. Anything
//! failing that shape is rejected here, before the token cache or the
//! network is touched.

use crate::error::RelayError;
use crate::upstream::types::ResourceKind;

const ID_LENGTH: usize = 22;

/// True when `id` matches `^[A-Za-z0-9]{22}$`.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Validate a single identifier, naming the kind in the failure message.
pub fn validate_id(kind: ResourceKind, id: &str) -> Result<(), RelayError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(RelayError::InvalidId {
            kind,
            id: id.to_string(),
        })
    }
}

/// Validate a batch: non-empty, within the per-kind cap, every element well
/// formed.
pub fn validate_batch(kind: ResourceKind, ids: &[String]) -> Result<(), RelayError> {
    if ids.is_empty() {
        return Err(RelayError::InvalidBatch(format!(
            "At least one {} ID is required.",
            kind.label()
        )));
    }

    let limit = kind.batch_limit();
    if ids.len() > limit {
        return Err(RelayError::InvalidBatch(format!(
            "Maximum {} {} IDs allowed per batch request, got {}.",
            limit,
            kind.label(),
            ids.len()
        )));
    }

    for id in ids {
        if !is_valid_id(id) {
            return Err(RelayError::InvalidBatch(format!(
                "Invalid {} ID: \"{}\". All IDs must be 22 alphanumeric characters.",
                kind.label(),
                id
            )));
        }
    }

    Ok(())
}
