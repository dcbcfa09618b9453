use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;

use super::processor::RequestProcessor;
use super::protocol::{JsonRpcError, RequestId, Response as RpcResponse};

const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid endpoint path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Build the router serving `POST <path>`
pub fn router(processor: Arc<RequestProcessor>, path: &str) -> Result<Router> {
    if !path.starts_with('/') {
        return Err(ServerError::InvalidPath(path.to_string()));
    }

    Ok(Router::new()
        .route(path, post(handle_rpc))
        .with_state(processor))
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(
    listener: TcpListener,
    processor: Arc<RequestProcessor>,
    path: &str,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(processor, path)?;

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("JSON-RPC endpoint listening on http://{}{}", addr, path);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("JSON-RPC endpoint stopped");
    Ok(())
}

async fn handle_rpc(
    State(processor): State<Arc<RequestProcessor>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    // Handlers take the network lock synchronously
    let outcome = tokio::task::spawn_blocking(move || {
        processor.process(&body, authorization.as_deref())
    })
    .await;

    let (status, body) = match outcome {
        Ok(processed) => (processed.status, processed.body),
        Err(e) => {
            tracing::error!("Request task failed: {}", e);
            let response = RpcResponse::error(JsonRpcError::internal_error(), RequestId::Null);
            let body = serde_json::to_vec(&response).unwrap_or_default();
            (StatusCode::OK, body)
        }
    };

    (status, [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)], body).into_response()
}
