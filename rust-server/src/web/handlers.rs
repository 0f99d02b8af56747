//! Route handlers.
//!
//! Both authenticated handlers resolve the shared secret first, so an
//! unconfigured deployment answers 500 before any credential is looked at.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ShimError, ShimResult};
use crate::web::session::{bearer_token, SessionVerifier};
use crate::web::signature::{verify_webhook_hmac, HMAC_HEADER};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    session: Option<Arc<SessionVerifier>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let session = config
            .api_secret
            .as_ref()
            .map(|secret| Arc::new(SessionVerifier::new(secret, config.api_key.as_deref())));

        Self {
            config: Arc::new(config),
            session,
        }
    }

    fn session_verifier(&self) -> ShimResult<&SessionVerifier> {
        self.session.as_deref().ok_or(ShimError::MissingSecret)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Shopify Webhook
// =============================================================================

/// Shopify webhook endpoint.
///
/// The body is taken as `Bytes`, the exact octets received. It must not be
/// swapped for a `Json`/`Form` extractor or routed through any middleware
/// that rewrites the body, since the HMAC is computed over these bytes.
pub async fn shopify_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ShimResult<StatusCode> {
    let secret = state.config.secret().map_err(|e| {
        warn!("webhook_secret_not_configured");
        e
    })?;

    let topic = header_str(&headers, "X-Shopify-Topic").unwrap_or_default();
    let shop = header_str(&headers, "X-Shopify-Shop-Domain").unwrap_or_default();

    if !verify_webhook_hmac(secret, &body, header_str(&headers, HMAC_HEADER)) {
        warn!(topic = %topic, shop = %shop, "webhook_rejected");
        return Err(ShimError::InvalidHmac);
    }

    info!(
        topic = %topic,
        shop = %shop,
        webhook_id = header_str(&headers, "X-Shopify-Webhook-Id").unwrap_or_default(),
        body_length = body.len(),
        "webhook_accepted"
    );

    Ok(StatusCode::OK)
}

// =============================================================================
// Session Ping
// =============================================================================

/// Ping response.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub ok: bool,
    pub shop: String,
}

/// Session token check used by the embedded app frontend.
pub async fn ping(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ShimResult<impl IntoResponse> {
    let verifier = state.session_verifier().map_err(|e| {
        warn!("session_secret_not_configured");
        e
    })?;

    let token = bearer_token(&headers).map_err(|e| {
        warn!("session_bearer_missing");
        e
    })?;

    let claims = verifier.verify(token)?;

    Ok(Json(PingResponse {
        ok: true,
        shop: claims.shop().to_string(),
    }))
}
