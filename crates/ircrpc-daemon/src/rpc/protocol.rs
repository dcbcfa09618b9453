//! JSON-RPC 2.0 envelope types and the error taxonomy

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// Every error code the API can emit.
///
/// The first five are the reserved JSON-RPC protocol codes; the rest are
/// application codes shared by all handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ApiCallDenied,
    ServerGone,
    Timeout,
    RemoteServerNoRpc,
    NotFound,
    AlreadyExists,
    InvalidName,
    UserNotInChannel,
    TooManyEntries,
    Denied,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 15] = [
        ErrorCode::ParseError,
        ErrorCode::InvalidRequest,
        ErrorCode::MethodNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::InternalError,
        ErrorCode::ApiCallDenied,
        ErrorCode::ServerGone,
        ErrorCode::Timeout,
        ErrorCode::RemoteServerNoRpc,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidName,
        ErrorCode::UserNotInChannel,
        ErrorCode::TooManyEntries,
        ErrorCode::Denied,
    ];

    pub fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ApiCallDenied => -32000,
            ErrorCode::ServerGone => -32001,
            ErrorCode::Timeout => -32002,
            ErrorCode::RemoteServerNoRpc => -32003,
            ErrorCode::NotFound => -1000,
            ErrorCode::AlreadyExists => -1001,
            ErrorCode::InvalidName => -1002,
            ErrorCode::UserNotInChannel => -1003,
            ErrorCode::TooManyEntries => -1004,
            ErrorCode::Denied => -1005,
        }
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Request ID: an integer or a string, echoed back untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
    Null,
}

impl RequestId {
    /// Accepts integers and strings; anything else is not a usable id
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(RequestId::Number(n.clone())),
            Value::String(s) => Some(RequestId::String(s.clone())),
            _ => None,
        }
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Number(id.into())
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    /// Build an error object. The code is taken as given.
    pub fn new(message: impl Into<String>, code: impl Into<i32>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new("Unauthorized", ErrorCode::ApiCallDenied)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(message, ErrorCode::InvalidRequest)
    }

    pub fn method_not_found() -> Self {
        Self::new("Method not found", ErrorCode::MethodNotFound)
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(message, ErrorCode::InvalidParams)
    }

    pub fn internal_error() -> Self {
        Self::new("Internal error", ErrorCode::InternalError)
    }
}

/// A request that passed envelope validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub params: Option<Value>,
    pub id: RequestId,
}

/// A request rejected during envelope validation, with whatever id could be recovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub id: RequestId,
    pub error: JsonRpcError,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Option<Value>, id: RequestId) -> Self {
        Self {
            method: method.into(),
            params,
            id,
        }
    }

    /// Parse a request body: one JSON object with `method` and `id`
    pub fn parse(body: &[u8]) -> Result<Self, Rejection> {
        let value: Value = serde_json::from_slice(body).map_err(|_| Rejection {
            id: RequestId::Null,
            error: JsonRpcError::invalid_request("Invalid JSON request"),
        })?;

        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, Rejection> {
        let Value::Object(mut object) = value else {
            return Err(Rejection {
                id: RequestId::Null,
                error: JsonRpcError::invalid_request("Invalid JSON-RPC request format"),
            });
        };

        let id = object.get("id").and_then(RequestId::from_value);
        let method = match object.remove("method") {
            Some(Value::String(method)) => Some(method),
            _ => None,
        };

        match (method, id) {
            (Some(method), Some(id)) => Ok(Self {
                method,
                params: object.remove("params"),
                id,
            }),
            (_, id) => Err(Rejection {
                id: id.unwrap_or(RequestId::Null),
                error: JsonRpcError::invalid_request("Invalid JSON-RPC request format"),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl Response {
    pub fn success(result: Value, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(error: JsonRpcError, id: RequestId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl From<Rejection> for Response {
    fn from(rejection: Rejection) -> Self {
        Response::error(rejection.error, rejection.id)
    }
}
