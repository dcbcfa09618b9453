//! JSON-RPC over HTTP

pub mod auth;
pub mod processor;
pub mod protocol;
pub mod server;

pub use auth::Credentials;
pub use processor::{ProcessedResponse, RequestProcessor};
pub use protocol::{ErrorCode, JsonRpcError, Request, RequestId, Response};
pub use server::{serve, ServerError};
