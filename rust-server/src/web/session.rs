//! Session token verification for `GET /api/ping`.
//!
//! The embedded app frontend sends a Shopify session token (a compact JWT
//! signed with HS256 under the app's shared secret) as a bearer credential.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ApiSecret;
use crate::error::{ShimError, ShimResult};

/// The only algorithm a session token may declare.
pub const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

/// `aud` may be a single string or a list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

/// Claims carried by a session token.
///
/// Only `dest` is required; the time claims are typed so a malformed value
/// fails deserialization instead of being ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionClaims {
    /// Shop the token was issued for, e.g. `https://example.myshopify.com`
    pub dest: String,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub aud: Option<Audience>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub nbf: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub sid: Option<String>,
}

impl SessionClaims {
    /// The shop identifier.
    pub fn shop(&self) -> &str {
        &self.dest
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// An absent header, an empty one, another scheme, or a blank token are all
/// reported as a missing credential.
pub fn bearer_token(headers: &HeaderMap) -> ShimResult<&str> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .and_then(|raw| raw.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();

    if token.is_empty() {
        return Err(ShimError::MissingBearer);
    }

    Ok(token)
}

/// Verifies session tokens against the shared secret.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    /// Build a verifier; `api_key`, when set, must appear in the `aud` claim.
    pub fn new(secret: &ApiSecret, api_key: Option<&str>) -> Self {
        let mut validation = Validation::new(SESSION_ALGORITHM);
        // exp and nbf are checked when present, never demanded.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;

        match api_key {
            Some(key) => {
                validation.set_audience(&[key]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify signature, algorithm and time claims, returning the claims.
    ///
    /// All failures collapse into [`ShimError::InvalidSessionToken`].
    pub fn verify(&self, token: &str) -> ShimResult<SessionClaims> {
        match decode::<SessionClaims>(token, &self.key, &self.validation) {
            Ok(data) => {
                debug!(shop = %data.claims.dest, "session_token_verified");
                Ok(data.claims)
            }
            Err(err) => {
                warn!(reason = ?err.kind(), "session_token_invalid");
                Err(ShimError::InvalidSessionToken)
            }
        }
    }
}
