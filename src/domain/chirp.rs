//! The chirp record

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store. Always greater than zero.
pub type ChirpId = u64;

/// A single stored chirp.
///
/// Only the store creates these; callers receive clones and never see the
/// persisted bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    /// Unique, immutable once assigned
    pub id: ChirpId,
    /// Message text
    pub body: String,
}

impl Chirp {
    pub(crate) fn new(id: ChirpId, body: impl Into<String>) -> Self {
        Self { id, body: body.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chirp_serializes_id_and_body() {
        let chirp = Chirp::new(7, "hello");
        let json = serde_json::to_value(&chirp).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "body": "hello"}));
    }

    #[test]
    fn test_chirp_deserializes() {
        let chirp: Chirp = serde_json::from_str(r#"{"id": 2, "body": "world"}"#).unwrap();
        assert_eq!(chirp, Chirp::new(2, "world"));
    }
}
