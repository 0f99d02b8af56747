//! Web server module.
//!
//! Two routes, each a thin shell around one verification:
//! - `POST /webhooks` checks the Shopify HMAC over the raw body
//! - `GET /api/ping` checks the embedded app's session token
//!
//! Plus an unauthenticated `GET /health` for liveness probes.

pub mod cors;
pub mod handlers;
pub mod session;
pub mod signature;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use cors::{cors_layer, reject_foreign_origin, TrustedOrigin};
pub use handlers::{health, ping, shopify_webhook, AppState, HealthResponse, PingResponse};
pub use session::{bearer_token, SessionClaims, SessionVerifier};
pub use signature::{compute_webhook_hmac, verify_webhook_hmac, HMAC_HEADER};

/// Build the application router.
///
/// The origin guard sits outside the CORS layer so foreign pre-flight
/// requests are refused instead of being answered by `CorsLayer`.
/// `/webhooks` must keep receiving the body untouched: no body-rewriting
/// layer (decompression, JSON normalisation) may be added in front of it.
pub fn router(state: AppState, origin: TrustedOrigin) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhooks", post(shopify_webhook))
        .route("/api/ping", get(ping))
        .with_state(state)
        .layer(cors_layer(&origin))
        .layer(middleware::from_fn_with_state(
            origin.clone(),
            reject_foreign_origin,
        ))
        .layer(TraceLayer::new_for_http())
}
