//! Server ban API methods
//!
//! The RPC surface manages network-wide G-lines only.

use serde::Deserialize;
use serde_json::Value;

use super::{confirmation, parse_params, ApiError, Params, Result};
use crate::network::{Network, NetworkError};
use ircrpc_core::models::{BanKind, NewBan};

const BAN_KIND: BanKind = BanKind::GLine;
const BAN_SOURCE: &str = "JSON-RPC";
const DEFAULT_DURATION_SECS: u64 = 3600;
/// Longest accepted ban, about 100 years
const MAX_DURATION_SECS: u64 = 100 * 365 * 24 * 3600;

fn default_duration() -> u64 {
    DEFAULT_DURATION_SECS
}

#[derive(Debug, Deserialize)]
struct AddBanParams {
    mask: String,
    reason: String,
    #[serde(default = "default_duration")]
    duration: u64,
}

#[derive(Debug, Deserialize)]
struct MaskParams {
    mask: String,
}

/// List active G-lines
pub fn list(network: &dyn Network, _params: &Params) -> Result<Value> {
    let bans = network.bans(BAN_KIND)?;
    Ok(serde_json::to_value(&bans)?)
}

/// Add a G-line. `duration` is in seconds, 0 for permanent.
pub fn add(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: AddBanParams = parse_params(params, &["mask", "reason"])?;

    if params.duration > MAX_DURATION_SECS {
        return Err(ApiError::InvalidParams("Invalid duration".to_string()));
    }

    let ban = NewBan {
        kind: BAN_KIND,
        mask: params.mask,
        set_by: BAN_SOURCE.to_string(),
        reason: params.reason,
        duration: params.duration,
    };

    match network.add_ban(ban) {
        Ok(()) => Ok(confirmation("Ban added successfully")),
        Err(NetworkError::BanExists(_)) => {
            Err(ApiError::AlreadyExists("Ban already exists".to_string()))
        }
        Err(NetworkError::Denied(reason)) => {
            tracing::debug!("server_ban.add denied: {}", reason);
            Err(ApiError::InvalidParams("Invalid duration".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove a G-line
pub fn del(network: &dyn Network, params: &Params) -> Result<Value> {
    let params: MaskParams = parse_params(params, &["mask"])?;

    match network.remove_ban(&params.mask, BAN_KIND) {
        Ok(()) => Ok(confirmation("Ban removed successfully")),
        Err(NetworkError::NoSuchBan(_)) => Err(ApiError::NotFound("Ban not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{network, params};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_add_and_list() {
        let network = network();

        let result = add(
            &network,
            &params(json!({"mask": "*@evil.example", "reason": "spam"})),
        )
        .unwrap();
        assert_eq!(result, json!({"result": "Ban added successfully"}));

        let result = list(&network, &Params::new()).unwrap();
        let bans = result.as_array().unwrap();
        assert_eq!(bans.len(), 1);
        assert_eq!(bans[0]["mask"], "*@evil.example");
        assert_eq!(bans[0]["set_by"], "JSON-RPC");
        assert_eq!(bans[0]["reason"], "spam");

        // Default duration is one hour
        let expiry = bans[0]["expiry"].as_i64().unwrap();
        let now = Utc::now().timestamp();
        assert!(expiry > now + 3500 && expiry <= now + 3600);
    }

    #[test]
    fn test_add_with_duration() {
        let network = network();

        add(
            &network,
            &params(json!({"mask": "*@perm.example", "reason": "r", "duration": 0})),
        )
        .unwrap();

        let result = list(&network, &Params::new()).unwrap();
        assert_eq!(result[0]["expiry"], 0);
    }

    #[test]
    fn test_add_duplicate() {
        let network = network();
        let ban = params(json!({"mask": "*@dup.example", "reason": "r"}));

        add(&network, &ban).unwrap();
        let err = add(&network, &ban).unwrap_err();
        assert!(matches!(err, ApiError::AlreadyExists(ref m) if m == "Ban already exists"));
    }

    #[test]
    fn test_add_missing_reason() {
        let network = network();

        let err = add(&network, &params(json!({"mask": "*@evil.example"}))).unwrap_err();
        assert_eq!(err.to_string(), "Missing parameters: mask, reason");
    }

    #[test]
    fn test_add_negative_duration() {
        let network = network();

        let err = add(
            &network,
            &params(json!({"mask": "*@x", "reason": "r", "duration": -5})),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams(_)));
        assert!(list(&network, &Params::new()).unwrap().as_array().unwrap().is_empty());
    }

    #[test]
    fn test_add_oversized_duration() {
        let network = network();

        for duration in [u64::MAX, i64::MAX as u64, MAX_DURATION_SECS + 1] {
            let err = add(
                &network,
                &params(json!({"mask": "*@far.example", "reason": "r", "duration": duration})),
            )
            .unwrap_err();
            assert!(matches!(err, ApiError::InvalidParams(ref m) if m == "Invalid duration"));
        }
        assert!(list(&network, &Params::new()).unwrap().as_array().unwrap().is_empty());

        // The bound itself is accepted and listed as a future expiry
        add(
            &network,
            &params(json!({"mask": "*@far.example", "reason": "r", "duration": MAX_DURATION_SECS})),
        )
        .unwrap();
        let result = list(&network, &Params::new()).unwrap();
        assert!(result[0]["expiry"].as_i64().unwrap() > Utc::now().timestamp());
    }

    #[test]
    fn test_del_twice() {
        let network = network();
        add(&network, &params(json!({"mask": "*@gone.example", "reason": "r"}))).unwrap();

        let mask = params(json!({"mask": "*@gone.example"}));
        let result = del(&network, &mask).unwrap();
        assert_eq!(result, json!({"result": "Ban removed successfully"}));

        let err = del(&network, &mask).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Ban not found"));
    }
}
