//! ferrolog CLI Client
//!
//! Command-line interface for producing to and fetching from a ferrolog
//! server. Results are printed as JSON ({"offset": N} / {"record": {...}}).

use std::net::TcpStream;
use std::process::exit;

use clap::{Parser, Subcommand};
use serde::Serialize;

use ferrolog::protocol::{read_response, write_command, Command, Status};
use ferrolog::Record;

/// ferrolog CLI
#[derive(Parser, Debug)]
#[command(name = "ferrolog-cli")]
#[command(about = "CLI for the ferrolog commit-log broker")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append a record to a topic
    Produce {
        /// The topic to append to
        topic: String,

        /// The record payload
        value: String,
    },

    /// Read the record at an offset of a topic
    Fetch {
        /// The topic to read from
        topic: String,

        /// The offset to read
        offset: u64,
    },

    /// Ping the server
    Ping,
}

#[derive(Serialize)]
struct ProduceOutput {
    offset: u64,
}

#[derive(Serialize)]
struct FetchOutput {
    record: Record,
}

fn main() {
    let args = Args::parse();

    let command = match &args.command {
        Commands::Produce { topic, value } => Command::Produce {
            topic: topic.clone(),
            value: value.clone().into_bytes(),
        },
        Commands::Fetch { topic, offset } => Command::Fetch {
            topic: topic.clone(),
            offset: *offset,
        },
        Commands::Ping => Command::Ping,
    };

    let response = match send(&args.server, &command) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    };

    match response.status {
        Status::Ok => print_ok(&args.command, response.payload.unwrap_or_default()),
        Status::NotFound => {
            eprintln!("not found");
            exit(1);
        }
        Status::Error => {
            let msg = response
                .payload
                .map(|p| String::from_utf8_lossy(&p).into_owned())
                .unwrap_or_else(|| "unknown error".to_string());
            eprintln!("server error: {msg}");
            exit(1);
        }
    }
}

/// Connect, send one command, read one response
fn send(server: &str, command: &Command) -> ferrolog::Result<ferrolog::protocol::Response> {
    let mut stream = TcpStream::connect(server)
        .map_err(|e| ferrolog::FerroError::Network(format!("connect {server}: {e}")))?;
    write_command(&mut stream, command)?;
    read_response(&mut stream)
}

/// Decode and print an OK payload for the command that produced it
fn print_ok(command: &Commands, payload: Vec<u8>) {
    match command {
        Commands::Produce { .. } => {
            if payload.len() != 8 {
                eprintln!("error: malformed produce response");
                exit(1);
            }
            let offset = u64::from_be_bytes(payload[..8].try_into().expect("8-byte offset"));
            println!(
                "{}",
                serde_json::to_string(&ProduceOutput { offset }).expect("serialize offset")
            );
        }
        Commands::Fetch { .. } => {
            if payload.len() < 8 {
                eprintln!("error: malformed fetch response");
                exit(1);
            }
            let offset = u64::from_be_bytes(payload[..8].try_into().expect("8-byte offset"));
            let record = Record::new(payload[8..].to_vec(), offset);
            println!(
                "{}",
                serde_json::to_string(&FetchOutput { record }).expect("serialize record")
            );
        }
        Commands::Ping => {
            println!("{}", String::from_utf8_lossy(&payload));
        }
    }
}
