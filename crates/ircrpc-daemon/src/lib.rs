//! ircrpc Daemon Library
//!
//! JSON-RPC administration API for an IRC network, exposed as a library for testing.

pub mod api;
pub mod network;
pub mod rpc;

pub use api::{ApiHandler, Method};
pub use network::{MemoryNetwork, Network, NetworkError};
pub use rpc::{serve, Credentials, ProcessedResponse, RequestProcessor};
