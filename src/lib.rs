//! # ferrolog
//!
//! A minimal commit-log storage engine with:
//! - Per-topic append-only log files
//! - In-memory offset index rebuilt by scanning the file on open
//! - Crash recovery with torn-write detection
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Multiple Clients)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Registry                                 │
//! │            (topic name → owned Store)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼────────────┐
//!          ▼            ▼            ▼
//!   ┌─────────────┐┌─────────────┐┌─────────────┐
//!   │   Store     ││   Store     ││   Store     │
//!   │ (orders)    ││ (payments)  ││ (audit)     │
//!   └─────────────┘└─────────────┘└─────────────┘
//!      one file       one file       one file
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod protocol;
pub mod server;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FerroError, Result};
pub use config::{Config, SyncPolicy};
pub use log::{Record, Registry, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ferrolog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
