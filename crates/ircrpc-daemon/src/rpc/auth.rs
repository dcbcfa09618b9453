//! HTTP Basic authentication against the configured API account

use base64::{engine::general_purpose::STANDARD, Engine as _};
use subtle::ConstantTimeEq;

use ircrpc_core::models::RpcConfig;

const BASIC_PREFIX: &str = "Basic ";

/// The single account allowed to call the API
#[derive(Clone)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &RpcConfig) -> Self {
        Self::new(config.api_user.clone(), config.api_password.clone())
    }

    /// Check an `Authorization` header value. Absent or malformed headers are denied.
    pub fn check(&self, header: Option<&str>) -> bool {
        let Some((user, password)) = header.and_then(decode_basic) else {
            return false;
        };

        // Both comparisons always run
        let user_ok = user.as_bytes().ct_eq(self.user.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        bool::from(user_ok & password_ok)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Split `Basic base64(user:password)` into its parts
fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix(BASIC_PREFIX)?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Build a header value for `user:password`
pub fn basic_header(user: &str, password: &str) -> String {
    format!("{}{}", BASIC_PREFIX, STANDARD.encode(format!("{}:{}", user, password)))
}
