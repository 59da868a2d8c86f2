//! End-to-end tests for the TCP server
//!
//! Drives a real server over a loopback socket: produce, fetch, not-found
//! mapping, ping, and graceful shutdown.

use std::net::TcpStream;
use std::sync::Arc;
use std::thread;

use ferrolog::protocol::{read_response, write_command, Command, Status};
use ferrolog::server::Server;
use ferrolog::{Config, Registry, SyncPolicy};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    addr: std::net::SocketAddr,
    shutdown: Arc<std::sync::atomic::AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
    _temp: TempDir,
}

impl TestServer {
    fn start() -> Self {
        let temp = TempDir::new().unwrap();
        let config = Config::builder()
            .data_dir(temp.path())
            .listen_addr("127.0.0.1:0") // let the OS pick a port
            .max_connections(4)
            .sync_policy(SyncPolicy::EveryAppend)
            .build();

        let registry = Arc::new(Registry::open(&config.data_dir, config.sync_policy).unwrap());
        let mut server = Server::new(config, registry).unwrap();

        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();
        let thread = thread::spawn(move || server.run().unwrap());

        Self {
            addr,
            shutdown,
            thread: Some(thread),
            _temp: temp,
        }
    }

    fn connect(&self) -> TcpStream {
        TcpStream::connect(self.addr).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown
            .store(true, std::sync::atomic::Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            thread.join().unwrap();
        }
    }
}

fn roundtrip(stream: &mut TcpStream, command: Command) -> ferrolog::protocol::Response {
    write_command(stream, &command).unwrap();
    read_response(stream).unwrap()
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[test]
fn test_produce_then_fetch() {
    let server = TestServer::start();
    let mut stream = server.connect();

    // Produce assigns offset 0 on a fresh topic
    let response = roundtrip(
        &mut stream,
        Command::Produce {
            topic: "orders".to_string(),
            value: b"hello world".to_vec(),
        },
    );
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload, Some(0u64.to_be_bytes().to_vec()));

    // Fetch it back
    let response = roundtrip(
        &mut stream,
        Command::Fetch {
            topic: "orders".to_string(),
            offset: 0,
        },
    );
    assert_eq!(response.status, Status::Ok);
    let payload = response.payload.unwrap();
    assert_eq!(&payload[..8], &0u64.to_be_bytes());
    assert_eq!(&payload[8..], b"hello world");
}

#[test]
fn test_fetch_past_end_maps_to_not_found() {
    let server = TestServer::start();
    let mut stream = server.connect();

    let response = roundtrip(
        &mut stream,
        Command::Fetch {
            topic: "empty-topic".to_string(),
            offset: 0,
        },
    );
    assert_eq!(response.status, Status::NotFound);
}

#[test]
fn test_invalid_topic_maps_to_error() {
    let server = TestServer::start();
    let mut stream = server.connect();

    let response = roundtrip(
        &mut stream,
        Command::Produce {
            topic: "../escape".to_string(),
            value: b"x".to_vec(),
        },
    );
    assert_eq!(response.status, Status::Error);
}

#[test]
fn test_ping() {
    let server = TestServer::start();
    let mut stream = server.connect();

    let response = roundtrip(&mut stream, Command::Ping);
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload, Some(b"PONG".to_vec()));
}

#[test]
fn test_appends_from_multiple_connections_share_one_log() {
    let server = TestServer::start();

    let mut first = server.connect();
    let mut second = server.connect();

    let r1 = roundtrip(
        &mut first,
        Command::Produce {
            topic: "shared".to_string(),
            value: b"one".to_vec(),
        },
    );
    let r2 = roundtrip(
        &mut second,
        Command::Produce {
            topic: "shared".to_string(),
            value: b"two".to_vec(),
        },
    );

    // Both producers hit the same store: offsets are 0 and 1 in some order
    let mut offsets = vec![
        u64::from_be_bytes(r1.payload.unwrap()[..8].try_into().unwrap()),
        u64::from_be_bytes(r2.payload.unwrap()[..8].try_into().unwrap()),
    ];
    offsets.sort();
    assert_eq!(offsets, vec![0, 1]);

    // And both records are visible from a third connection
    let mut third = server.connect();
    for offset in 0..2u64 {
        let response = roundtrip(
            &mut third,
            Command::Fetch {
                topic: "shared".to_string(),
                offset,
            },
        );
        assert_eq!(response.status, Status::Ok);
    }
}
