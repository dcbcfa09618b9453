//! Request processing pipeline
//!
//! `authenticate → parse → validate envelope → dispatch → check params → invoke → respond`.
//! Every step short-circuits into a complete JSON-RPC error envelope; nothing
//! is ever handed back to the transport as a bare failure.

use std::panic::{catch_unwind, AssertUnwindSafe};

use http::StatusCode;
use serde_json::Value;

use super::auth::Credentials;
use super::protocol::{ErrorCode, JsonRpcError, Request, RequestId, Response};
use crate::api::{ApiHandler, Method, Params};

/// Body sent if a response envelope ever fails to serialize
const INTERNAL_ERROR_BODY: &[u8] =
    br#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

/// HTTP status plus serialized envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ProcessedResponse {
    fn new(status: StatusCode, response: &Response) -> Self {
        let body = serde_json::to_vec(response).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize response: {}", e);
            INTERNAL_ERROR_BODY.to_vec()
        });
        Self { status, body }
    }

    /// Parse the body back into an envelope
    pub fn envelope(&self) -> serde_json::Result<Response> {
        serde_json::from_slice(&self.body)
    }
}

pub struct RequestProcessor {
    credentials: Credentials,
    handler: ApiHandler,
}

impl RequestProcessor {
    pub fn new(credentials: Credentials, handler: ApiHandler) -> Self {
        Self {
            credentials,
            handler,
        }
    }

    /// Process one request body with its `Authorization` header value
    pub fn process(&self, body: &[u8], authorization: Option<&str>) -> ProcessedResponse {
        if !self.credentials.check(authorization) {
            tracing::warn!("Rejected request with missing or invalid credentials");
            let response = Response::error(JsonRpcError::unauthorized(), RequestId::Null);
            return ProcessedResponse::new(StatusCode::UNAUTHORIZED, &response);
        }

        let response = match Request::parse(body) {
            Ok(request) => self.handle_request(request),
            Err(rejection) => {
                tracing::debug!("Rejected request: {}", rejection.error.message);
                Response::from(rejection)
            }
        };

        ProcessedResponse::new(StatusCode::OK, &response)
    }

    fn handle_request(&self, request: Request) -> Response {
        let Some(method) = Method::from_name(&request.method) else {
            tracing::debug!("Unknown method: {}", request.method);
            return Response::error(JsonRpcError::method_not_found(), request.id);
        };

        let params = match request.params {
            None | Some(Value::Null) => Params::new(),
            Some(Value::Object(params)) => params,
            Some(_) => {
                return Response::error(
                    JsonRpcError::invalid_params("Params must be an object"),
                    request.id,
                )
            }
        };

        tracing::info!("handler: received request: {}", method);

        match self.invoke(method, &params) {
            Ok(result) => Response::success(result, request.id),
            Err(error) => Response::error(error, request.id),
        }
    }

    fn invoke(&self, method: Method, params: &Params) -> Result<Value, JsonRpcError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.handler.handle(method, params)));

        match outcome {
            Ok(Ok(result)) => {
                if method.is_mutation() {
                    tracing::info!("{} completed", method);
                }
                Ok(result)
            }
            Ok(Err(error)) => {
                if error.code() == ErrorCode::InternalError {
                    tracing::error!("{} failed: {}", method, error);
                } else {
                    tracing::debug!("{} returned error: {}", method, error);
                }
                Err(error.to_rpc_error())
            }
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!("{} panicked: {}", method, reason);
                Err(JsonRpcError::internal_error())
            }
        }
    }
}
