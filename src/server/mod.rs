//! Server Module
//!
//! TCP server and client connection handling.
//!
//! ## Architecture
//! - Single acceptor thread, nonblocking accept loop
//! - Fixed worker pool fed over a crossbeam channel
//! - Commands routed through the Registry

mod listener;
mod connection;

pub use listener::Server;
pub use connection::Connection;
