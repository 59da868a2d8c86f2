//! Error types for ferrolog
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FerroError
pub type Result<T> = std::result::Result<T, FerroError>;

/// Unified error type for ferrolog operations
#[derive(Debug, Error)]
pub enum FerroError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    #[error("offset not found")]
    OffsetNotFound,

    #[error("log corruption detected: {0}")]
    Corruption(String),

    #[error("store is closed")]
    StoreClosed,

    // -------------------------------------------------------------------------
    // Registry Errors
    // -------------------------------------------------------------------------
    #[error("invalid topic name: {0}")]
    InvalidTopic(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
