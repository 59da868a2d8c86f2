//! Commit Log Module
//!
//! Append-only persisted record logs and the topic registry that owns them.
//!
//! ## Responsibilities
//! - Append length-prefixed records to a single backing file per topic
//! - Translate offsets to byte positions via an in-memory index
//! - Rebuild the index from the file on open (crash recovery)
//! - Multiplex topics under one data directory
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Record 0                                │
//! │ ┌──────────────────┬──────────────────┐ │
//! │ │ Length (8, BE)   │ Payload (L)      │ │
//! │ └──────────────────┴──────────────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Record 1                                │
//! │ ┌──────────────────┬──────────────────┐ │
//! │ │ Length (8, BE)   │ Payload (L)      │ │
//! │ └──────────────────┴──────────────────┘ │
//! └─────────────────────────────────────────┘
//! ```
//!
//! No header, footer, padding, or alignment. Offsets are not stored in the
//! file: the n-th record in file order is offset n.

mod record;
mod store;
mod registry;

pub use record::Record;
pub use store::{Store, LEN_PREFIX_SIZE};
pub use registry::{Registry, STORE_FILENAME};
