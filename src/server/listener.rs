//! TCP Server
//!
//! Accepts connections and dispatches them to a worker pool.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel;

use crate::config::Config;
use crate::error::{FerroError, Result};
use crate::log::Registry;

use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for ferrolog
pub struct Server {
    /// Server configuration
    config: Config,

    /// Topic registry shared with every connection
    registry: Arc<Registry>,

    /// Bound listener (nonblocking, polled against the shutdown flag)
    listener: TcpListener,

    /// Set to request a graceful shutdown
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listen address and create a server.
    ///
    /// The listener is bound here so callers can learn the actual address
    /// (e.g. when listening on port 0) before calling [`Server::run`].
    pub fn new(config: Config, registry: Arc<Registry>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)
            .map_err(|e| FerroError::Network(format!("bind {}: {}", config.listen_addr, e)))?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            registry,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The address the server is actually listening on
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle that can be used to request shutdown from another thread
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the server to shut down gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Run the accept loop (blocking until shutdown).
    ///
    /// Accepted streams are handed to a fixed pool of worker threads over a
    /// channel; each worker drives one connection at a time. On shutdown the
    /// acceptor stops, workers drain, and every open store is closed.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            addr = %self.listener.local_addr()?,
            workers = self.config.max_connections,
            "server listening"
        );

        // Step 1: Start the worker pool
        let (tx, rx) = channel::unbounded::<TcpStream>();
        let mut workers = Vec::with_capacity(self.config.max_connections);

        for worker_id in 0..self.config.max_connections {
            let rx = rx.clone();
            let registry = Arc::clone(&self.registry);
            let read_timeout_ms = self.config.read_timeout_ms;
            let write_timeout_ms = self.config.write_timeout_ms;

            workers.push(thread::spawn(move || {
                // Channel closes when the acceptor drops the sender
                for stream in rx.iter() {
                    if let Err(e) = serve_stream(stream, &registry, read_timeout_ms, write_timeout_ms)
                    {
                        tracing::warn!(worker_id, error = %e, "connection ended with error");
                    }
                }
            }));
        }
        drop(rx);

        // Step 2: Accept until shutdown is requested
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    tracing::trace!(%peer, "accepted connection");

                    // The listener is nonblocking; the connection must not be
                    stream.set_nonblocking(false)?;

                    if tx.send(stream).is_err() {
                        break;
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }

        tracing::info!("server shutting down");

        // Step 3: Stop feeding workers and wait for in-flight connections
        drop(tx);
        for worker in workers {
            let _ = worker.join();
        }

        // Step 4: Flush and release every open store
        self.registry.close_all()
    }
}

/// Serve one client connection to completion
fn serve_stream(
    stream: TcpStream,
    registry: &Arc<Registry>,
    read_timeout_ms: u64,
    write_timeout_ms: u64,
) -> Result<()> {
    let mut conn = Connection::new(stream, Arc::clone(registry))?;
    conn.set_timeouts(read_timeout_ms, write_timeout_ms)?;
    conn.handle()
}
