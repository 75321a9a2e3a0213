// ABOUTME: Facebook authenticated-session support for axum applications
// ABOUTME: Resolves sessions from cookies or canvas signed requests and gates handlers on them

//! Adds Facebook session detection to an axum application.
//!
//! A [`Facebook`] component is bound to an application's configuration at
//! startup and resolves a per-request [`FacebookSession`] from either the
//! Facebook authentication cookie or a canvas `signed_request` form field.
//! Cookie parsing and signed-request verification are delegated to an
//! external Graph API client library through the [`CredentialVerifier`]
//! trait; this crate implements no credential cryptography of its own.
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::{middleware, routing::get, Router};
//! use axum_facebook::{attach_session, require_session, Facebook, FacebookConfig, FacebookSession};
//! # use axum_facebook::{GraphApiError, GraphUser, SignedRequestClaims};
//! # struct MyVerifier;
//! # impl axum_facebook::CredentialVerifier for MyVerifier {
//! #     fn user_from_cookie(&self, _: &axum_extra::extract::cookie::CookieJar, _: &str, _: &str) -> Result<Option<GraphUser>, GraphApiError> { Ok(None) }
//! #     fn parse_signed_request(&self, _: &str, _: &str) -> Result<SignedRequestClaims, GraphApiError> { Err(GraphApiError::new("unimplemented")) }
//! # }
//!
//! # fn build() -> Result<Router, axum_facebook::FacebookError> {
//! let facebook = Arc::new(Facebook::with_config(FacebookConfig::from_env()?, MyVerifier)?);
//!
//! let app = Router::new()
//!     .route("/profile", get(profile))
//!     .route_layer(middleware::from_fn_with_state(facebook.clone(), require_session))
//!     .layer(middleware::from_fn_with_state(facebook.clone(), attach_session));
//! # Ok(app)
//! # }
//!
//! async fn profile(session: FacebookSession) -> String {
//!     format!("hello {}", session.uid)
//! }
//! ```

pub mod config;
pub mod error;
pub mod facebook;
pub mod graph;
pub mod middleware;
pub mod session;


pub use config::FacebookConfig;
pub use error::{FacebookError, Result};
pub use facebook::{Facebook, RequestCredentials};
pub use graph::{CredentialVerifier, GraphApiError, GraphClient, GraphUser, SignedRequestClaims};
pub use middleware::{attach_session, require_session};
pub use session::{current_graph, current_session, FacebookSession};
