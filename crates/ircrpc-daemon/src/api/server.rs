//! Server API methods

use serde::Deserialize;
use serde_json::Value;

use super::{confirmation, parse_params, ApiError, Params, Result};
use crate::network::Network;

#[derive(Debug, Deserialize)]
struct ServerParams {
    server: String,
}

/// List all linked servers
pub fn list(network: &dyn Network, _params: &Params) -> Result<Value> {
    let servers = network.servers()?;
    Ok(serde_json::to_value(&servers)?)
}

/// Get a single server by name
pub fn get(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: ServerParams = parse_params(params, &["server"])?;

    let server = network
        .servers()?
        .into_iter()
        .find(|server| server.name == params.server)
        .ok_or_else(|| ApiError::NotFound("Server not found".to_string()))?;

    Ok(serde_json::to_value(&server)?)
}

/// Reload the host service configuration
pub fn rehash(network: &dyn Network, _params: &Params) -> Result<Value> {
    network.rehash()?;
    tracing::info!("server.rehash: rehash requested over RPC");

    Ok(confirmation("Server rehashed successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{network, params};
    use ircrpc_core::models::ServerInfo;
    use serde_json::json;

    #[test]
    fn test_list_servers() {
        let network = network();
        network.add_server(ServerInfo {
            name: "leaf.example.net".to_string(),
            parent: "irc.local".to_string(),
            description: "Leaf".to_string(),
            user_count: 12,
            op_count: 1,
            latency_ms: 40,
        });

        let result = list(&network, &Params::new()).unwrap();
        let servers = result.as_array().unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0]["name"], "irc.local");
        assert_eq!(servers[0]["user_count"], 3);
        assert_eq!(servers[1]["parent"], "irc.local");
        assert_eq!(servers[1]["latency_ms"], 40);
    }

    #[test]
    fn test_get_server() {
        let network = network();

        let result = get(&network, &params(json!({"server": "irc.local"}))).unwrap();
        assert_eq!(result["name"], "irc.local");
        assert_eq!(result["parent"], "");
        assert_eq!(result["description"], "Local IRC server");
        assert_eq!(result["op_count"], 0);
    }

    #[test]
    fn test_get_server_not_found() {
        let network = network();

        let err = get(&network, &params(json!({"server": "nope.example"}))).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Server not found"));
    }

    #[test]
    fn test_get_server_missing_param() {
        let network = network();

        let err = get(&network, &Params::new()).unwrap_err();
        assert_eq!(err.to_string(), "Missing parameter: server");
    }

    #[test]
    fn test_rehash() {
        let network = network();

        let result = rehash(&network, &Params::new()).unwrap();
        assert_eq!(result, json!({"result": "Server rehashed successfully"}));
        assert_eq!(network.rehash_count(), 1);
    }
}
