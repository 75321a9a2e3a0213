// ABOUTME: Per-request Facebook session value and its read-only accessor surface
// ABOUTME: Sessions live in request extensions and never outlive the request that produced them

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{request::Parts, Extensions},
};
use chrono::{DateTime, Utc};
use std::convert::Infallible;
use std::fmt;

use crate::error::FacebookError;
use crate::graph::GraphClient;

/// An authenticated Facebook user session.
///
/// Constructed by the resolution hook when a request carries a valid
/// credential and stored in the request's extensions; at most one exists per
/// request. The bound [`GraphClient`] is ready to make API calls on the
/// session's behalf.
#[derive(Clone)]
pub struct FacebookSession {
    pub uid: String,
    pub access_token: String,
    pub expires: Option<DateTime<Utc>>,
    pub graph: GraphClient,
}

impl FacebookSession {
    pub fn new(
        uid: impl Into<String>,
        access_token: impl Into<String>,
        expires: Option<DateTime<Utc>>,
    ) -> Self {
        let access_token = access_token.into();
        let graph = GraphClient::new(access_token.clone());
        Self {
            uid: uid.into(),
            access_token,
            expires,
            graph,
        }
    }
}

impl fmt::Display for FacebookSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expires {
            Some(expires) => write!(f, "<FacebookSession uid={}, expires={}>", self.uid, expires),
            None => write!(f, "<FacebookSession uid={}, expires=None>", self.uid),
        }
    }
}

impl fmt::Debug for FacebookSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the access token.
        f.debug_struct("FacebookSession")
            .field("uid", &self.uid)
            .field("expires", &self.expires)
            .finish_non_exhaustive()
    }
}

/// The session attached to the current request, if any.
pub fn current_session(extensions: &Extensions) -> Option<&FacebookSession> {
    extensions.get::<FacebookSession>()
}

/// The Graph API client for the current request's session, if any.
pub fn current_graph(extensions: &Extensions) -> Option<&GraphClient> {
    current_session(extensions).map(|session| &session.graph)
}

impl<S> FromRequestParts<S> for FacebookSession
where
    S: Send + Sync,
{
    type Rejection = FacebookError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_session(&parts.extensions)
            .cloned()
            .ok_or(FacebookError::Unauthorized)
    }
}

impl<S> OptionalFromRequestParts<S> for FacebookSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(current_session(&parts.extensions).cloned())
    }
}

impl<S> FromRequestParts<S> for GraphClient
where
    S: Send + Sync,
{
    type Rejection = FacebookError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_graph(&parts.extensions)
            .cloned()
            .ok_or(FacebookError::Unauthorized)
    }
}

impl<S> OptionalFromRequestParts<S> for GraphClient
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(current_graph(&parts.extensions).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_binds_graph_client_to_token() {
        let session = FacebookSession::new("42", "token-42", None);
        assert_eq!(session.graph.access_token(), "token-42");
    }

    #[test]
    fn display_shows_uid_and_expiry() {
        let session = FacebookSession::new("42", "token-42", None);
        assert_eq!(session.to_string(), "<FacebookSession uid=42, expires=None>");

        let expires = DateTime::from_timestamp(1700003600, 0);
        let session = FacebookSession::new("42", "token-42", expires);
        assert!(session.to_string().contains("expires=2023"));
    }

    #[test]
    fn debug_redacts_access_token() {
        let session = FacebookSession::new("42", "token-42", None);
        assert!(!format!("{:?}", session).contains("token-42"));
    }

    #[test]
    fn accessors_read_the_extensions_slot() {
        let mut extensions = Extensions::new();
        assert!(current_session(&extensions).is_none());
        assert!(current_graph(&extensions).is_none());

        extensions.insert(FacebookSession::new("42", "token-42", None));
        assert_eq!(current_session(&extensions).unwrap().uid, "42");
        assert_eq!(current_graph(&extensions).unwrap().access_token(), "token-42");
    }
}
