//! Tests for the wire protocol codec
//!
//! These tests verify:
//! - Command and response encode/decode round-trips
//! - Payload layouts for PRODUCE/FETCH responses
//! - Rejection of malformed and oversized frames
//! - Stream-based read/write helpers

use std::io::Cursor;

use ferrolog::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, Response, Status, HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
use ferrolog::FerroError;

// =============================================================================
// Command Round-Trip Tests
// =============================================================================

#[test]
fn test_produce_command_round_trip() {
    let command = Command::Produce {
        topic: "orders".to_string(),
        value: b"hello world".to_vec(),
    };

    let bytes = encode_command(&command);
    let decoded = decode_command(&bytes).unwrap();

    assert_eq!(decoded, command);
}

#[test]
fn test_fetch_command_round_trip() {
    let command = Command::Fetch {
        topic: "payments".to_string(),
        offset: 42,
    };

    let bytes = encode_command(&command);
    let decoded = decode_command(&bytes).unwrap();

    assert_eq!(decoded, command);
}

#[test]
fn test_ping_command_round_trip() {
    let bytes = encode_command(&Command::Ping);
    assert_eq!(bytes.len(), HEADER_SIZE);

    let decoded = decode_command(&bytes).unwrap();
    assert_eq!(decoded, Command::Ping);
}

#[test]
fn test_produce_with_empty_value() {
    let command = Command::Produce {
        topic: "t".to_string(),
        value: Vec::new(),
    };

    let decoded = decode_command(&encode_command(&command)).unwrap();
    assert_eq!(decoded, command);
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_produced_response_layout() {
    let response = Response::produced(7);

    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload, Some(7u64.to_be_bytes().to_vec()));

    let decoded = decode_response(&encode_response(&response)).unwrap();
    assert_eq!(decoded, response);
}

#[test]
fn test_fetched_response_layout() {
    let response = Response::fetched(3, b"abc");

    let payload = response.payload.as_ref().unwrap();
    assert_eq!(&payload[..8], &3u64.to_be_bytes());
    assert_eq!(&payload[8..], b"abc");

    let decoded = decode_response(&encode_response(&response)).unwrap();
    assert_eq!(decoded, response);
}

#[test]
fn test_not_found_and_error_responses() {
    let not_found = decode_response(&encode_response(&Response::not_found())).unwrap();
    assert_eq!(not_found.status, Status::NotFound);
    assert_eq!(not_found.payload, None);

    let error = decode_response(&encode_response(&Response::error("boom"))).unwrap();
    assert_eq!(error.status, Status::Error);
    assert_eq!(error.payload, Some(b"boom".to_vec()));
}

// =============================================================================
// Malformed Frame Tests
// =============================================================================

#[test]
fn test_decode_rejects_short_header() {
    assert!(matches!(
        decode_command(&[0x01, 0x00]),
        Err(FerroError::Protocol(_))
    ));
}

#[test]
fn test_decode_rejects_unknown_command_type() {
    let mut bytes = vec![0x7f];
    bytes.extend_from_slice(&0u32.to_be_bytes());

    assert!(matches!(
        decode_command(&bytes),
        Err(FerroError::Protocol(_))
    ));
}

#[test]
fn test_decode_rejects_unknown_status() {
    let mut bytes = vec![0x7f];
    bytes.extend_from_slice(&0u32.to_be_bytes());

    assert!(matches!(
        decode_response(&bytes),
        Err(FerroError::Protocol(_))
    ));
}

#[test]
fn test_decode_rejects_oversized_payload() {
    let mut bytes = vec![0x01];
    bytes.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());

    assert!(matches!(
        decode_command(&bytes),
        Err(FerroError::Protocol(_))
    ));
}

#[test]
fn test_decode_rejects_ping_with_payload() {
    let mut bytes = vec![0x03];
    bytes.extend_from_slice(&2u32.to_be_bytes());
    bytes.extend_from_slice(b"no");

    assert!(matches!(
        decode_command(&bytes),
        Err(FerroError::Protocol(_))
    ));
}

#[test]
fn test_decode_rejects_fetch_without_offset() {
    // topic only, missing the trailing 8-byte offset
    let mut payload = Vec::new();
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(b"t");

    let mut bytes = vec![0x02];
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&payload);

    assert!(matches!(
        decode_command(&bytes),
        Err(FerroError::Protocol(_))
    ));
}

#[test]
fn test_decode_rejects_non_utf8_topic() {
    let mut payload = Vec::new();
    payload.extend_from_slice(&2u32.to_be_bytes());
    payload.extend_from_slice(&[0xff, 0xfe]);

    let mut bytes = vec![0x01];
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&payload);

    assert!(matches!(
        decode_command(&bytes),
        Err(FerroError::Protocol(_))
    ));
}

// =============================================================================
// Stream Helper Tests
// =============================================================================

#[test]
fn test_stream_round_trip() {
    let command = Command::Produce {
        topic: "stream".to_string(),
        value: b"payload".to_vec(),
    };

    let mut buf = Vec::new();
    write_command(&mut buf, &command).unwrap();
    let decoded = read_command(&mut Cursor::new(&buf)).unwrap();
    assert_eq!(decoded, command);

    let response = Response::fetched(0, b"payload");
    let mut buf = Vec::new();
    write_response(&mut buf, &response).unwrap();
    let decoded = read_response(&mut Cursor::new(&buf)).unwrap();
    assert_eq!(decoded, response);
}

#[test]
fn test_read_command_truncated_stream() {
    let command = Command::Produce {
        topic: "t".to_string(),
        value: b"value".to_vec(),
    };

    let mut buf = Vec::new();
    write_command(&mut buf, &command).unwrap();
    buf.truncate(buf.len() - 2);

    let result = read_command(&mut Cursor::new(&buf));
    assert!(matches!(result, Err(FerroError::Io(_))));
}
