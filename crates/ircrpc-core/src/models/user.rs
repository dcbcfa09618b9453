//! User projection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub nick: String,
    pub uuid: String,
    pub realname: String,
    /// Displayed host (vhost or cloak when set)
    pub host: String,
    pub ip: String,
    pub oper: bool,
    pub away: bool,
}
