//! Record definition
//!
//! The unit of data stored in a log.

use serde::{Deserialize, Serialize};

/// A single record in a log: an opaque payload plus its assigned offset.
///
/// Offsets are dense and zero-based: the store assigns `size` at append
/// time and never reuses or reassigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The payload. Opaque to the store; no size limit is enforced.
    pub value: Vec<u8>,

    /// Position of this record in its log, assigned at append time.
    pub offset: u64,
}

impl Record {
    /// Create a record with the given payload and offset
    pub fn new(value: impl Into<Vec<u8>>, offset: u64) -> Self {
        Self {
            value: value.into(),
            offset,
        }
    }
}
