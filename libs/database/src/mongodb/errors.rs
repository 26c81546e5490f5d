//! Classification of driver errors that callers branch on.

use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server error code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// True when the write was rejected by a unique index.
pub fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// True when no server could be reached, as opposed to a rejected operation.
pub fn is_unavailable(err: &Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_)
    )
}

/// True when a document could not be mapped to or from BSON.
pub fn is_serialization(err: &Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_)
    )
}
