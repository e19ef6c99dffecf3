use jiff::Timestamp;
use tinylink_core::error::{StorageError, StorageResult};

/// The current time, truncated to the microsecond precision stores persist.
pub(crate) fn now() -> StorageResult<Timestamp> {
    from_micros(Timestamp::now().as_microsecond())
}

pub(crate) fn from_micros(value: i64) -> StorageResult<Timestamp> {
    Timestamp::from_microsecond(value)
        .map_err(|e| StorageError::InvalidData(format!("invalid timestamp '{}': {e}", value)))
}
