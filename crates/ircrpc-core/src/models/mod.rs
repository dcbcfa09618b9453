pub mod ban;
pub mod channel;
pub mod config;
pub mod server;
pub mod user;

pub use ban::{BanKind, NewBan, ServerBan};
pub use channel::ChannelInfo;
pub use config::{Config, DaemonConfig, NetworkConfig, RpcConfig};
pub use server::ServerInfo;
pub use user::UserInfo;
