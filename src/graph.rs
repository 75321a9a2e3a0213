// ABOUTME: Contract for the external Graph API client library and the token-bound client handle
// ABOUTME: Credential parsing and verification happen behind CredentialVerifier, never in this crate

use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

const GRAPH_URL: &str = "https://graph.facebook.com";

/// Error reported by the Graph API client library.
///
/// Mirrors the single error class the library raises for malformed or
/// unverifiable credentials and for failed API calls.
#[derive(Debug, Clone)]
pub struct GraphApiError {
    message: String,
}

impl GraphApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for GraphApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GraphApiError {}

impl From<reqwest::Error> for GraphApiError {
    fn from(err: reqwest::Error) -> Self {
        GraphApiError::new(err.to_string())
    }
}

/// A user record as reported by the Graph API library.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphUser {
    pub uid: String,
    pub access_token: String,
    pub expires: Option<DateTime<Utc>>,
}

/// Claims decoded from a canvas `signed_request` payload.
///
/// All fields default to absent so verifier implementations can deserialize
/// the JSON payload portion directly into this type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignedRequestClaims {
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub oauth_token: Option<String>,
    #[serde(default)]
    pub issued_at: Option<i64>,
    #[serde(default)]
    pub expires: Option<i64>,
}

/// The verification surface an external Graph API client library must expose.
///
/// Implementations own all credential parsing and signature checking. A
/// missing cookie is `Ok(None)`; a cookie or signed request the library
/// cannot verify is a [`GraphApiError`].
pub trait CredentialVerifier: Send + Sync + 'static {
    fn user_from_cookie(
        &self,
        cookies: &CookieJar,
        app_id: &str,
        app_secret: &str,
    ) -> Result<Option<GraphUser>, GraphApiError>;

    fn parse_signed_request(
        &self,
        signed_request: &str,
        app_secret: &str,
    ) -> Result<SignedRequestClaims, GraphApiError>;
}

/// Graph API client handle bound to a single access token.
#[derive(Clone)]
pub struct GraphClient {
    access_token: String,
    http: reqwest::Client,
}

impl GraphClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Fetch a Graph object by id, e.g. `me` or a numeric user id.
    pub async fn get_object(&self, id: &str) -> Result<serde_json::Value, GraphApiError> {
        let response = self
            .http
            .get(format!("{}/{}", GRAPH_URL, id))
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

impl fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the access token.
        f.debug_struct("GraphClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_deserialize_with_missing_fields() {
        let claims: SignedRequestClaims = serde_json::from_str(r#"{"algorithm":"HMAC-SHA256"}"#).unwrap();
        assert_eq!(claims.algorithm.as_deref(), Some("HMAC-SHA256"));
        assert_eq!(claims.user_id, None);
        assert_eq!(claims.oauth_token, None);
    }

    #[test]
    fn claims_deserialize_full_payload() {
        let payload = r#"{
            "algorithm": "HMAC-SHA256",
            "user_id": "42",
            "oauth_token": "token-42",
            "issued_at": 1700000000,
            "expires": 1700003600
        }"#;
        let claims: SignedRequestClaims = serde_json::from_str(payload).unwrap();
        assert_eq!(claims.user_id.as_deref(), Some("42"));
        assert_eq!(claims.oauth_token.as_deref(), Some("token-42"));
        assert_eq!(claims.expires, Some(1700003600));
    }

    #[test]
    fn client_binds_token_and_redacts_debug() {
        let client = GraphClient::new("secret-token");
        assert_eq!(client.access_token(), "secret-token");
        assert!(!format!("{:?}", client).contains("secret-token"));
    }

    #[test]
    fn graph_api_error_display() {
        let err = GraphApiError::new("Invalid signature");
        assert_eq!(err.to_string(), "Invalid signature");
    }
}
