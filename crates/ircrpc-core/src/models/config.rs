//! Application configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const DEFAULT_API_USER: &str = "apiuser";
pub const DEFAULT_API_PASSWORD: &str = "password";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// HTTP endpoint and the credential pair clients must present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcConfig {
    pub listen: String,
    pub path: String,
    pub api_user: String,
    pub api_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonConfig {
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

/// Identity of the local server in the network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    pub server_name: String,
    pub description: String,
    pub network_name: String,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.rpc.validate()?;
        self.daemon.validate()?;
        self.network.validate()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            rpc: RpcConfig::default(),
            daemon: DaemonConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl RpcConfig {
    /// Validate RPC endpoint configuration
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<SocketAddr>().is_err() {
            return Err(Error::Validation(format!(
                "Invalid listen address '{}'",
                self.listen
            )));
        }

        if !self.path.starts_with('/') {
            return Err(Error::Validation(
                "RPC path must start with '/'".to_string(),
            ));
        }

        if self.api_user.is_empty() {
            return Err(Error::Validation("API user cannot be empty".to_string()));
        }

        if self.api_password.is_empty() {
            return Err(Error::Validation(
                "API password cannot be empty".to_string(),
            ));
        }

        // The Basic scheme splits on the first ':'
        if self.api_user.contains(':') {
            return Err(Error::Validation(
                "API user cannot contain ':'".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether the shipped default password is still in use
    pub fn uses_default_password(&self) -> bool {
        self.api_password == DEFAULT_API_PASSWORD
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8081".to_string(),
            path: "/jsonrpc".to_string(),
            api_user: DEFAULT_API_USER.to_string(),
            api_password: DEFAULT_API_PASSWORD.to_string(),
        }
    }
}

impl DaemonConfig {
    /// Validate daemon configuration
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(Error::Validation(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if let Some(ref path) = self.log_file {
            if path.trim().is_empty() {
                return Err(Error::Validation("Log file path cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl NetworkConfig {
    /// Validate the local server identity
    pub fn validate(&self) -> Result<()> {
        if self.server_name.trim().is_empty() {
            return Err(Error::Validation("Server name cannot be empty".to_string()));
        }

        if self.server_name.contains(char::is_whitespace) {
            return Err(Error::Validation(
                "Server name cannot contain whitespace".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_name: "irc.local".to_string(),
            description: "Local IRC server".to_string(),
            network_name: "LocalNet".to_string(),
        }
    }
}
