//! Conversion between the external hex form of an identifier and the
//! store's binary [`ObjectId`].
//!
//! Every identifier that arrives over HTTP passes through [`parse_object_id`]
//! before it reaches a query, so a malformed id is rejected without any
//! round trip to the store.

use mongodb::bson::oid::ObjectId;

/// Length of the hex representation of an [`ObjectId`].
pub const OBJECT_ID_HEX_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier '{input}': expected {OBJECT_ID_HEX_LEN} hex characters")]
pub struct InvalidObjectId {
    pub input: String,
}

/// Decode a 24-character hex string (either case) into an [`ObjectId`].
pub fn parse_object_id(raw: &str) -> Result<ObjectId, InvalidObjectId> {
    let invalid = || InvalidObjectId {
        input: raw.to_string(),
    };

    if raw.len() != OBJECT_ID_HEX_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    ObjectId::parse_str(raw).map_err(|_| invalid())
}

/// Encode an [`ObjectId`] as its lowercase hex string.
pub fn to_hex(id: &ObjectId) -> String {
    id.to_hex()
}
