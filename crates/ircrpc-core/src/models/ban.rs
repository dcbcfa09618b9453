//! Server ban (X-line) projection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ban classes known to the network. The RPC surface only manages G-lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BanKind {
    #[serde(rename = "G")]
    GLine,
    #[serde(rename = "K")]
    KLine,
    #[serde(rename = "Z")]
    ZLine,
}

impl BanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BanKind::GLine => "G",
            BanKind::KLine => "K",
            BanKind::ZLine => "Z",
        }
    }
}

impl fmt::Display for BanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An active ban.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerBan {
    pub mask: String,
    pub set_by: String,
    pub reason: String,
    /// Unix timestamp at which the ban lapses; 0 means permanent
    pub expiry: i64,
}

impl ServerBan {
    pub fn is_permanent(&self) -> bool {
        self.expiry == 0
    }

    pub fn is_expired(&self, now: i64) -> bool {
        !self.is_permanent() && self.expiry <= now
    }
}

/// A ban to be added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBan {
    pub kind: BanKind,
    pub mask: String,
    pub set_by: String,
    pub reason: String,
    /// Seconds from now; 0 means permanent
    pub duration: u64,
}
