//! Configuration module for environment variable parsing.
//!
//! The configuration is read once at startup and handed to the handlers
//! through `AppState`; nothing reads the environment per request.

use std::env;
use std::fmt;

use tracing::warn;

use crate::error::{ShimError, ShimResult};

/// Port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 3000;

/// Origin allowed to call the app from the browser when `ALLOWED_ORIGIN` is unset.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://admin.shopify.com";

/// The app's shared secret.
///
/// `Debug` is redacted so the value cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecret(Vec<u8>);

impl ApiSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret(<redacted>)")
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret used for webhook HMACs and session token signatures
    pub api_secret: Option<ApiSecret>,

    /// App client id, checked against the `aud` claim when set
    pub api_key: Option<String>,

    /// Port for the web server to listen on
    pub port: u16,

    /// The single origin allowed to make cross-origin requests
    pub allowed_origin: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(env_var = "PORT", value = %raw, "Invalid port, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Config {
            api_secret: non_blank(lookup("SHOPIFY_API_SECRET")).map(ApiSecret::new),
            api_key: non_blank(lookup("SHOPIFY_API_KEY")),
            port,
            allowed_origin: non_blank(lookup("ALLOWED_ORIGIN"))
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
        }
    }

    /// Configuration with a fixed secret and defaults everywhere else.
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Config {
            api_secret: Some(ApiSecret::new(secret)),
            ..Self::from_lookup(|_| None)
        }
    }

    /// The shared secret, or a configuration error when it was never set.
    pub fn secret(&self) -> ShimResult<&ApiSecret> {
        self.api_secret.as_ref().ok_or(ShimError::MissingSecret)
    }
}

/// Treat empty and whitespace-only values the same as unset ones.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert!(config.api_secret.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
        assert!(matches!(config.secret(), Err(ShimError::MissingSecret)));
    }

    #[test]
    fn test_reads_all_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("SHOPIFY_API_SECRET", "shhh"),
            ("SHOPIFY_API_KEY", "client-id"),
            ("PORT", "8080"),
            ("ALLOWED_ORIGIN", "https://example.test"),
        ]));
        assert_eq!(config.secret().unwrap().as_bytes(), b"shhh");
        assert_eq!(config.api_key.as_deref(), Some("client-id"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_origin, "https://example.test");
    }

    #[test]
    fn test_blank_secret_is_missing() {
        let config = Config::from_lookup(lookup_from(&[("SHOPIFY_API_SECRET", "   ")]));
        assert!(config.api_secret.is_none());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let config = Config::with_secret("super-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
