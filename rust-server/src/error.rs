//! Error taxonomy for the two verification routes.
//!
//! Every variant maps to a fixed status and a generic message. Decoding
//! problems are folded into the authentication variants so callers cannot
//! tell which check failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type ShimResult<T> = Result<T, ShimError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShimError {
    #[error("Missing SHOPIFY_API_SECRET")]
    MissingSecret,
    #[error("Invalid HMAC")]
    InvalidHmac,
    #[error("Missing bearer token")]
    MissingBearer,
    #[error("Invalid session token")]
    InvalidSessionToken,
}

impl ShimError {
    pub fn status(&self) -> StatusCode {
        match self {
            ShimError::MissingSecret => StatusCode::INTERNAL_SERVER_ERROR,
            ShimError::InvalidHmac | ShimError::MissingBearer | ShimError::InvalidSessionToken => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

impl IntoResponse for ShimError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_is_500() {
        assert_eq!(
            ShimError::MissingSecret.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_are_401() {
        for err in [
            ShimError::InvalidHmac,
            ShimError::MissingBearer,
            ShimError::InvalidSessionToken,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_into_response_keeps_status() {
        let response = ShimError::MissingBearer.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
