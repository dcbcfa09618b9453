//! ircrpc Client Library
//!
//! Provides a client for the ircrpc JSON-RPC administration API over HTTP.

pub mod error;
pub mod protocol;

pub use error::{ClientError, Result};
pub use protocol::{Request, RequestId, Response, ResponseError};

use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};

pub const DEFAULT_URL: &str = "http://127.0.0.1:8081/jsonrpc";

/// ircrpc API client
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    user: String,
    password: String,
    request_counter: AtomicI64,
}

impl RpcClient {
    /// Create a new client for the endpoint at `url`
    pub fn new(url: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            user: user.into(),
            password: password.into(),
            request_counter: AtomicI64::new(1),
        }
    }

    /// Endpoint this client posts to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get next request ID
    fn next_id(&self) -> RequestId {
        RequestId::Number(self.request_counter.fetch_add(1, Ordering::SeqCst))
    }

    /// Send a request and return its result, or the server's error as [`ClientError::Rpc`]
    pub async fn call(&self, method: impl Into<String>, params: Option<Value>) -> Result<Value> {
        let request = Request::new(method, params, self.next_id());

        let response = self
            .http
            .post(&self.url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&request)
            .send()
            .await?;

        // Error envelopes arrive with 401 as well as 200
        let status = response.status();
        let body = response.bytes().await?;
        let response: Response = serde_json::from_slice(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("HTTP {}: {}", status, e))
        })?;

        into_result(response)
    }

    // Server methods

    pub async fn server_list(&self) -> Result<Value> {
        self.call("server.list", None).await
    }

    pub async fn server_get(&self, server: &str) -> Result<Value> {
        self.call("server.get", Some(json!({ "server": server })))
            .await
    }

    pub async fn server_rehash(&self) -> Result<Value> {
        self.call("server.rehash", None).await
    }

    pub async fn server_connect(&self, server: &str) -> Result<Value> {
        self.call("server.connect", Some(json!({ "server": server })))
            .await
    }

    pub async fn server_disconnect(&self, server: &str) -> Result<Value> {
        self.call("server.disconnect", Some(json!({ "server": server })))
            .await
    }

    // Server ban methods

    pub async fn server_ban_list(&self) -> Result<Value> {
        self.call("server_ban.list", None).await
    }

    /// Add a G-line. `duration` in seconds; the server defaults to one hour.
    pub async fn server_ban_add(
        &self,
        mask: &str,
        reason: &str,
        duration: Option<u64>,
    ) -> Result<Value> {
        let mut params = json!({
            "mask": mask,
            "reason": reason,
        });
        if let Some(duration) = duration {
            params["duration"] = json!(duration);
        }

        self.call("server_ban.add", Some(params)).await
    }

    pub async fn server_ban_del(&self, mask: &str) -> Result<Value> {
        self.call("server_ban.del", Some(json!({ "mask": mask })))
            .await
    }

    // Channel methods

    pub async fn channel_list(&self) -> Result<Value> {
        self.call("channel.list", None).await
    }

    pub async fn channel_get(&self, channel: &str) -> Result<Value> {
        self.call("channel.get", Some(json!({ "channel": channel })))
            .await
    }

    /// Set a channel mode by name, e.g. `moderated` or `limit`
    pub async fn channel_set_mode(&self, channel: &str, mode: &str, param: &str) -> Result<Value> {
        self.call(
            "channel.set_mode",
            Some(json!({
                "channel": channel,
                "mode": mode,
                "param": param,
            })),
        )
        .await
    }

    pub async fn channel_kick(&self, channel: &str, nick: &str, reason: &str) -> Result<Value> {
        self.call(
            "channel.kick",
            Some(json!({
                "channel": channel,
                "nick": nick,
                "reason": reason,
            })),
        )
        .await
    }

    // User methods

    pub async fn user_list(&self) -> Result<Value> {
        self.call("user.list", None).await
    }

    pub async fn user_get(&self, nick: &str) -> Result<Value> {
        self.call("user.get", Some(json!({ "nick": nick }))).await
    }

    pub async fn user_set_nick(&self, nick: &str, newnick: &str) -> Result<Value> {
        self.call(
            "user.set_nick",
            Some(json!({
                "nick": nick,
                "newnick": newnick,
            })),
        )
        .await
    }

    pub async fn user_set_realname(&self, nick: &str, realname: &str) -> Result<Value> {
        self.call(
            "user.set_realname",
            Some(json!({
                "nick": nick,
                "realname": realname,
            })),
        )
        .await
    }

    pub async fn user_set_vhost(&self, nick: &str, vhost: &str) -> Result<Value> {
        self.call(
            "user.set_vhost",
            Some(json!({
                "nick": nick,
                "vhost": vhost,
            })),
        )
        .await
    }

    /// Apply a user mode change string such as `+iw-x`
    pub async fn user_set_mode(&self, nick: &str, modes: &str) -> Result<Value> {
        self.call(
            "user.set_mode",
            Some(json!({
                "nick": nick,
                "modes": modes,
            })),
        )
        .await
    }
}

/// Turn a response envelope into its result or error
fn into_result(response: Response) -> Result<Value> {
    if let Some(error) = response.error {
        return Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    response
        .result
        .ok_or_else(|| ClientError::InvalidResponse("Response has neither result nor error".to_string()))
}
