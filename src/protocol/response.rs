//! Response definitions
//!
//! Represents responses to clients.

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (offset/record bytes for OK, message for ERROR)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create an OK response carrying an assigned offset (PRODUCE)
    pub fn produced(offset: u64) -> Self {
        Self::ok(Some(offset.to_be_bytes().to_vec()))
    }

    /// Create an OK response carrying a record (FETCH): offset (8) + value
    pub fn fetched(offset: u64, value: &[u8]) -> Self {
        let mut payload = Vec::with_capacity(8 + value.len());
        payload.extend_from_slice(&offset.to_be_bytes());
        payload.extend_from_slice(value);
        Self::ok(Some(payload))
    }

    /// Create a NOT_FOUND response
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }
}
