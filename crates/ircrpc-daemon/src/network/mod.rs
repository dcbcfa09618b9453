//! Capability interface to the host IRC service
//!
//! The RPC layer never touches server state directly. Everything it reads or
//! changes goes through [`Network`], which the host service implements and
//! which is responsible for its own synchronisation. Every call is a separate
//! step: an entity found by one call may be gone by the next, and
//! implementations report that through [`NetworkError`] instead of panicking.

pub mod memory;

pub use memory::MemoryNetwork;

use ircrpc_core::models::{BanKind, ChannelInfo, NewBan, ServerBan, ServerInfo, UserInfo};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("No such channel: {0}")]
    NoSuchChannel(String),

    #[error("No such user: {0}")]
    NoSuchUser(String),

    #[error("No such ban: {0}")]
    NoSuchBan(String),

    #[error("Ban already exists: {0}")]
    BanExists(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("Denied: {0}")]
    Denied(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Lookup and mutate operations the host service exposes to the API.
pub trait Network: Send + Sync {
    /// All servers currently linked, local server included
    fn servers(&self) -> Result<Vec<ServerInfo>>;

    /// Reload the host service configuration
    fn rehash(&self) -> Result<()>;

    fn bans(&self, kind: BanKind) -> Result<Vec<ServerBan>>;

    fn add_ban(&self, ban: NewBan) -> Result<()>;

    fn remove_ban(&self, mask: &str, kind: BanKind) -> Result<()>;

    fn channels(&self) -> Result<Vec<ChannelInfo>>;

    fn find_channel(&self, name: &str) -> Result<Option<ChannelInfo>>;

    /// Set a channel mode by name, e.g. `moderated` or `key`
    fn set_channel_mode(&self, channel: &str, mode: &str, param: &str) -> Result<()>;

    /// Remove `nick` from `channel`, acting as `source`
    fn kick_user(&self, source: &str, channel: &str, nick: &str, reason: &str) -> Result<()>;

    fn users(&self) -> Result<Vec<UserInfo>>;

    fn find_user(&self, nick: &str) -> Result<Option<UserInfo>>;

    fn change_nick(&self, nick: &str, new_nick: &str) -> Result<()>;

    fn change_realname(&self, nick: &str, realname: &str) -> Result<()>;

    fn change_host(&self, nick: &str, host: &str) -> Result<()>;

    /// Apply a user mode change string such as `+iw-x`
    fn change_modes(&self, nick: &str, modes: &str) -> Result<()>;

    /// Name the local server acts under (kicks, ban sources)
    fn local_server(&self) -> String;
}
