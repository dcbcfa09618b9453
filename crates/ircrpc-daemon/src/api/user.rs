//! User API methods

use serde::Deserialize;
use serde_json::Value;

use super::{confirmation, parse_params, ApiError, Params, Result};
use crate::network::{Network, NetworkError};

#[derive(Debug, Deserialize)]
struct NickParams {
    nick: String,
}

#[derive(Debug, Deserialize)]
struct SetNickParams {
    nick: String,
    newnick: String,
}

#[derive(Debug, Deserialize)]
struct SetRealnameParams {
    nick: String,
    realname: String,
}

#[derive(Debug, Deserialize)]
struct SetVhostParams {
    nick: String,
    vhost: String,
}

#[derive(Debug, Deserialize)]
struct SetModeParams {
    nick: String,
    modes: String,
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

fn require_user(network: &dyn Network, nick: &str) -> Result<()> {
    match network.find_user(nick)? {
        Some(_) => Ok(()),
        None => Err(user_not_found()),
    }
}

/// Map the outcome of a user mutation onto the API result
fn finish(result: crate::network::Result<()>, success: &str, failure: &str) -> Result<Value> {
    match result {
        Ok(()) => Ok(confirmation(success)),
        Err(NetworkError::NoSuchUser(_)) => Err(user_not_found()),
        Err(NetworkError::Denied(reason)) => {
            tracing::debug!("{}: {}", failure, reason);
            Err(ApiError::Denied(failure.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// List all users
pub fn list(network: &dyn Network, _params: &Params) -> Result<Value> {
    let users = network.users()?;
    Ok(serde_json::to_value(&users)?)
}

/// Get a single user by nick
pub fn get(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: NickParams = parse_params(params, &["nick"])?;

    let user = network.find_user(&params.nick)?.ok_or_else(user_not_found)?;
    Ok(serde_json::to_value(&user)?)
}

pub fn set_nick(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: SetNickParams = parse_params(params, &["nick", "newnick"])?;
    require_user(network, &params.nick)?;

    finish(
        network.change_nick(&params.nick, &params.newnick),
        "Nickname changed successfully",
        "Nickname change failed",
    )
}

pub fn set_realname(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: SetRealnameParams = parse_params(params, &["nick", "realname"])?;
    require_user(network, &params.nick)?;

    finish(
        network.change_realname(&params.nick, &params.realname),
        "Real name changed successfully",
        "Real name change failed",
    )
}

pub fn set_vhost(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: SetVhostParams = parse_params(params, &["nick", "vhost"])?;
    require_user(network, &params.nick)?;

    finish(
        network.change_host(&params.nick, &params.vhost),
        "Virtual host changed successfully",
        "Virtual host change failed",
    )
}

/// Apply a mode change string such as `+iw-x`
pub fn set_mode(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: SetModeParams = parse_params(params, &["nick", "modes"])?;
    require_user(network, &params.nick)?;

    finish(
        network.change_modes(&params.nick, &params.modes),
        "User mode changed successfully",
        "User mode change failed",
    )
}
