//! Cross-origin policy.
//!
//! Exactly one browser origin may call these routes. The `CorsLayer` answers
//! pre-flight and decorates responses for that origin; `reject_foreign_origin`
//! turns away any other origin before a handler runs. Requests with no
//! `Origin` header (Shopify's webhook deliveries) are not browser requests
//! and pass through.

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// The trusted origin, as a header value ready for comparison.
#[derive(Clone, Debug)]
pub struct TrustedOrigin(pub HeaderValue);

impl TrustedOrigin {
    pub fn parse(origin: &str) -> anyhow::Result<Self> {
        let value = HeaderValue::from_str(origin.trim_end_matches('/'))
            .map_err(|e| anyhow::anyhow!("invalid ALLOWED_ORIGIN {origin:?}: {e}"))?;
        Ok(Self(value))
    }
}

/// CORS layer allowing only `origin`.
pub fn cors_layer(origin: &TrustedOrigin) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin.0.clone()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-shopify-hmac-sha256"),
        ])
}

/// Reject requests whose `Origin` is present and not the trusted origin.
pub async fn reject_foreign_origin(
    State(trusted): State<TrustedOrigin>,
    request: Request,
    next: Next,
) -> Response {
    match request.headers().get(ORIGIN) {
        Some(origin) if *origin != trusted.0 => {
            warn!(
                origin = ?origin,
                path = %request.uri().path(),
                "cross_origin_rejected"
            );
            StatusCode::FORBIDDEN.into_response()
        }
        _ => next.run(request).await,
    }
}
