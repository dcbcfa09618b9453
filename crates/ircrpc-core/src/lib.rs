//! Shared types for the IRC administrative JSON-RPC service.
//!
//! Holds the configuration model, the request-scoped projections returned to
//! clients, and configuration storage.

pub mod error;
pub mod models;
pub mod storage;

pub use error::{Error, Result};
