// ABOUTME: Error types for configuration, credential verification, and authorization failures
// ABOUTME: Maps user-visible failures to HTTP responses without exposing credential details

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::graph::GraphApiError;

#[derive(Debug)]
pub enum FacebookError {
    /// A required configuration value is missing. Fatal at initialization.
    Config(String),
    /// The Graph API library rejected a cookie or signed request.
    Verification(GraphApiError),
    /// A handler requires a Facebook session and none is present.
    Unauthorized,
}

impl fmt::Display for FacebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacebookError::Config(msg) => write!(f, "Configuration error: {}", msg),
            FacebookError::Verification(err) => write!(f, "Verification error: {}", err),
            FacebookError::Unauthorized => write!(f, "Unauthorized: no active Facebook session"),
        }
    }
}

impl std::error::Error for FacebookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FacebookError::Verification(err) => Some(err),
            _ => None,
        }
    }
}

impl IntoResponse for FacebookError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            FacebookError::Config(_) => {
                tracing::error!("Configuration error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server misconfigured")
            }
            FacebookError::Verification(_) => {
                tracing::warn!("Verification failure: {}", self);
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
            FacebookError::Unauthorized => {
                tracing::warn!("Unauthorized access: {}", self);
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<GraphApiError> for FacebookError {
    fn from(err: GraphApiError) -> Self {
        FacebookError::Verification(err)
    }
}

pub type Result<T, E = FacebookError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = FacebookError::Config("FACEBOOK_APP_ID configuration variable must be set".into());
        assert!(err.to_string().starts_with("Configuration error:"));

        let err = FacebookError::Verification(GraphApiError::new("bad signature"));
        assert!(err.to_string().contains("bad signature"));
    }

    #[test]
    fn verification_error_keeps_source() {
        use std::error::Error;
        let err = FacebookError::from(GraphApiError::new("bad signature"));
        assert!(err.source().is_some());
        assert!(FacebookError::Unauthorized.source().is_none());
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response = FacebookError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
