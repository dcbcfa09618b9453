//! Channel projection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelInfo {
    pub name: String,
    pub num_users: u32,
    pub topic: String,
    /// Mode string including parameters, e.g. `+klnt key 10`
    pub modes: String,
}
