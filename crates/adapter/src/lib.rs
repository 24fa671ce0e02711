//! Adapter module - agent control via TCP socket with JSON protocol
//!
//! This crate lets external agents (trainers, scripted bots, evaluation
//! harnesses) drive a single 2048 game through a TCP socket connection.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7777)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends an observation after every command
//! 5. **Commanding**: Controller sends batches of moves (at most 32 per command)
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: Apply moves (`left`/`up`/`right`/`down`, WASD keys) or `restart`
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with role and capabilities
//! - **observation**: Grid, score, status, valid actions, log2 vector, last move, state hash
//! - **ack**: The command with this `seq` was applied
//! - **error**: Error response with code and message
//!
//! # Error Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | `handshake_required` | Message other than hello before the handshake |
//! | `protocol_mismatch` | Major protocol version differs (connection closed) |
//! | `not_controller` | Command or release from a non-controller |
//! | `controller_active` | Claim while another client holds control |
//! | `invalid_command` | Malformed JSON, unknown action or type, stale `seq` |
//! | `backpressure` | Command queue full; the command was dropped |
//!
//! # Environment Variables
//!
//! - `TWENTY48_HOST`: Bind address (default: "127.0.0.1")
//! - `TWENTY48_PORT`: Port number (default: 7777)
//! - `TWENTY48_MAX_PENDING`: Command queue capacity (default: 10)
//! - `TWENTY48_SEED`: Seed of the first episode (default: 1)
//! - `TWENTY48_LOG_PATH`: Append every wire line to this file
//! - `TWENTY48_DISABLED`: Set to "1" or "true" to disable the adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"my-ai","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"ts":1234567891,"board":{"size":4,"cells":[[0,2,0,0],...]},...}
//! Client -> Server: {"type":"command","seq":2,"ts":1234567892,"actions":["left","up"]}
//! Server -> Client: {"type":"ack","seq":2,"ts":1234567892,"status":"ok"}
//! Server -> Client: {"type":"observation","seq":2,...}
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for async networking
//! - Multiple clients can connect (only one controller at a time)
//! - See [`protocol`] for message structure definitions
//! - See [`server`] for TCP server implementation
//! - See [`runtime`] for the game loop that owns the state

pub mod protocol;
pub mod runtime;
pub mod server;

pub use twenty48_core as core;
pub use twenty48_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{run_game_loop, serve, InboundCommand, InboundPayload, OutboundMessage};
pub use server::*;
