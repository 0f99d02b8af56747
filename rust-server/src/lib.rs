//! Shopify Shim - request validation for a Shopify embedded app.
//!
//! This library provides the pieces behind the `shim-web` binary:
//! - `config`: environment configuration, read once at startup
//! - `error`: the error taxonomy and its HTTP mapping
//! - `web`: webhook HMAC and session token verification, routes, CORS
//!
//! ## Architecture
//!
//! ```text
//! Shopify ──POST /webhooks──▶ HMAC over raw body ──▶ 200 / 401
//! App UI ───GET /api/ping───▶ HS256 session token ──▶ {"ok":true,"shop":…} / 401
//! ```

pub mod config;
pub mod error;
pub mod web;

// Re-export commonly used types
pub use config::{ApiSecret, Config};
pub use error::{ShimError, ShimResult};
pub use web::{router, AppState, TrustedOrigin};
