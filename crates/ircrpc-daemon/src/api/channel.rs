//! Channel API methods

use serde::Deserialize;
use serde_json::Value;

use super::{confirmation, parse_params, ApiError, Params, Result};
use crate::network::{Network, NetworkError};

#[derive(Debug, Deserialize)]
struct ChannelParams {
    channel: String,
}

#[derive(Debug, Deserialize)]
struct SetModeParams {
    channel: String,
    mode: String,
    param: String,
}

#[derive(Debug, Deserialize)]
struct KickParams {
    channel: String,
    nick: String,
    reason: String,
}

fn channel_not_found() -> ApiError {
    ApiError::NotFound("Channel not found".to_string())
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// List all channels
pub fn list(network: &dyn Network, _params: &Params) -> Result<Value> {
    let channels = network.channels()?;
    Ok(serde_json::to_value(&channels)?)
}

/// Get a single channel by name
pub fn get(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: ChannelParams = parse_params(params, &["channel"])?;

    let channel = network
        .find_channel(&params.channel)?
        .ok_or_else(channel_not_found)?;

    Ok(serde_json::to_value(&channel)?)
}

/// Set a channel mode by name, e.g. `moderated` or `limit`
pub fn set_mode(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: SetModeParams = parse_params(params, &["channel", "mode", "param"])?;

    if network.find_channel(&params.channel)?.is_none() {
        return Err(channel_not_found());
    }

    match network.set_channel_mode(&params.channel, &params.mode, &params.param) {
        Ok(()) => Ok(confirmation("Mode set successfully")),
        Err(NetworkError::NoSuchChannel(_)) => Err(channel_not_found()),
        Err(NetworkError::UnknownMode(_)) | Err(NetworkError::Denied(_)) => {
            Err(ApiError::InvalidParams("Invalid mode".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Kick a user from a channel, acting as the local server
pub fn kick(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: KickParams = parse_params(params, &["channel", "nick", "reason"])?;

    if network.find_channel(&params.channel)?.is_none() {
        return Err(channel_not_found());
    }
    if network.find_user(&params.nick)?.is_none() {
        return Err(user_not_found());
    }

    let source = network.local_server();
    match network.kick_user(&source, &params.channel, &params.nick, &params.reason) {
        Ok(()) => {
            tracing::info!(
                "channel.kick: {} removed from {} ({})",
                params.nick,
                params.channel,
                params.reason
            );
            Ok(confirmation("User kicked successfully by server"))
        }
        Err(NetworkError::NoSuchChannel(_)) => Err(channel_not_found()),
        Err(NetworkError::NoSuchUser(_)) => Err(user_not_found()),
        Err(NetworkError::Denied(reason)) => {
            tracing::debug!("channel.kick denied: {}", reason);
            Err(ApiError::Denied("Failed to kick user".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
