//! API handlers

pub mod channel;
pub mod method;
pub mod server;
pub mod server_ban;
pub mod user;

pub use method::Method;

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::network::{Network, NetworkError};
use crate::rpc::protocol::{ErrorCode, JsonRpcError};

/// Named request parameters
pub type Params = Map<String, Value>;

/// API error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unsupported(&'static str),

    #[error("{0}")]
    InvalidParams(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Denied(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Unsupported(_) => ErrorCode::MethodNotFound,
            ApiError::InvalidParams(_) => ErrorCode::InvalidParams,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            ApiError::Denied(_) => ErrorCode::Denied,
            ApiError::Network(_) | ApiError::Json(_) => ErrorCode::InternalError,
        }
    }

    /// Error object sent to the client. Internal failures are not described.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        match self.code() {
            ErrorCode::InternalError => JsonRpcError::internal_error(),
            code => JsonRpcError::new(self.to_string(), code),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Check that every required key is present, then deserialize.
///
/// A missing key reports all of the method's required keys, e.g.
/// `Missing parameters: mask, reason`.
pub fn parse_params<T: DeserializeOwned>(params: &Params, required: &[&str]) -> Result<T> {
    if required.iter().any(|key| !params.contains_key(*key)) {
        let label = if required.len() == 1 {
            "parameter"
        } else {
            "parameters"
        };
        return Err(ApiError::InvalidParams(format!(
            "Missing {}: {}",
            label,
            required.join(", ")
        )));
    }

    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|e| ApiError::InvalidParams(format!("Invalid parameters: {}", e)))
}

/// `{"result": message}` payload returned by mutating methods
pub fn confirmation(message: &str) -> Value {
    json!({ "result": message })
}

/// Main API handler that routes requests to appropriate handlers
pub struct ApiHandler {
    network: Arc<dyn Network>,
}

impl ApiHandler {
    pub fn new(network: Arc<dyn Network>) -> Self {
        Self { network }
    }

    pub fn handle(&self, method: Method, params: &Params) -> Result<Value> {
        let network = self.network.as_ref();

        match method {
            // Server methods
            Method::ServerList => server::list(network, params),
            Method::ServerGet => server::get(network, params),
            Method::ServerRehash => server::rehash(network, params),
            Method::ServerConnect | Method::ServerDisconnect => unsupported(method),

            // Server ban methods
            Method::ServerBanList => server_ban::list(network, params),
            Method::ServerBanAdd => server_ban::add(network, params),
            Method::ServerBanDel => server_ban::del(network, params),

            // Channel methods
            Method::ChannelList => channel::list(network, params),
            Method::ChannelGet => channel::get(network, params),
            Method::ChannelSetMode => channel::set_mode(network, params),
            Method::ChannelKick => channel::kick(network, params),

            // User methods
            Method::UserList => user::list(network, params),
            Method::UserGet => user::get(network, params),
            Method::UserSetNick => user::set_nick(network, params),
            Method::UserSetRealname => user::set_realname(network, params),
            Method::UserSetVhost => user::set_vhost(network, params),
            Method::UserSetMode => user::set_mode(network, params),
        }
    }
}

fn unsupported(method: Method) -> Result<Value> {
    Err(ApiError::Unsupported(
        method
            .unsupported_reason()
            .unwrap_or("Method is not supported"),
    ))
}


#[cfg(test)]
mod tests {
    use super::test_support::{network, params};
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct TwoKeys {
        mask: String,
        reason: String,
    }

    #[test]
    fn test_missing_single_parameter() {
        let err = parse_params::<Value>(&Params::new(), &["server"]).unwrap_err();
        assert_eq!(err.to_string(), "Missing parameter: server");
        assert_eq!(err.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn test_missing_parameters_lists_all_required() {
        let err = parse_params::<TwoKeys>(&params(json!({"mask": "*@x"})), &["mask", "reason"])
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing parameters: mask, reason");
    }

    #[test]
    fn test_wrong_parameter_type() {
        let err = parse_params::<TwoKeys>(
            &params(json!({"mask": 5, "reason": "r"})),
            &["mask", "reason"],
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams(_)));
        assert!(err.to_string().starts_with("Invalid parameters:"));
    }

    #[test]
    fn test_parse_params_success() {
        let parsed: TwoKeys = parse_params(
            &params(json!({"mask": "*@x", "reason": "r", "extra": true})),
            &["mask", "reason"],
        )
        .unwrap();
        assert_eq!(parsed.mask, "*@x");
        assert_eq!(parsed.reason, "r");
    }

    #[test]
    fn test_internal_errors_are_not_described() {
        let err = ApiError::Network(NetworkError::Unavailable("db down".to_string()));
        let rpc = err.to_rpc_error();
        assert_eq!(rpc.code, -32603);
        assert_eq!(rpc.message, "Internal error");
    }

    #[test]
    fn test_unsupported_methods_return_fixed_error() {
        let handler = ApiHandler::new(Arc::new(network()));

        let err = handler
            .handle(Method::ServerConnect, &params(json!({"server": "hub"})))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MethodNotFound);
        assert_eq!(err.to_string(), "Server connection via RPC is not supported");

        let err = handler
            .handle(Method::ServerDisconnect, &Params::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Server disconnection via RPC is not supported");
    }

    #[test]
    fn test_every_supported_method_is_dispatched() {
        let handler = ApiHandler::new(Arc::new(network()));

        for method in Method::ALL {
            if method.unsupported_reason().is_some() {
                continue;
            }
            // With no params a method either succeeds or reports missing params
            match handler.handle(method, &Params::new()) {
                Ok(_) => {}
                Err(ApiError::InvalidParams(message)) => {
                    assert!(message.starts_with("Missing parameter"), "{method}: {message}")
                }
                Err(other) => panic!("{method}: unexpected error {other}"),
            }
        }
    }
}
