//! Command definitions
//!
//! Represents commands from clients.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Produce = 0x01,
    Fetch = 0x02,
    Ping = 0x03,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a record to a topic
    Produce { topic: String, value: Vec<u8> },

    /// Read the record at an offset of a topic
    Fetch { topic: String, offset: u64 },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Produce { .. } => CommandType::Produce,
            Command::Fetch { .. } => CommandType::Fetch,
            Command::Ping => CommandType::Ping,
        }
    }
}
