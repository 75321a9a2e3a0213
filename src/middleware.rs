// ABOUTME: Request-lifecycle middleware: attach the Facebook session, gate handlers on it
// ABOUTME: Both are applied with axum::middleware::from_fn_with_state over an Arc<Facebook>

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use url::form_urlencoded;

use crate::error::FacebookError;
use crate::facebook::{Facebook, RequestCredentials};
use crate::session::FacebookSession;

/// Canvas posts are small; anything past this is not a signed_request form.
const FORM_BODY_LIMIT: usize = 64 * 1024;

const SIGNED_REQUEST_FIELD: &str = "signed_request";

/// Per-request hook: resolve a Facebook session and attach it to the
/// request's extensions. Requests without a resolvable session pass through
/// with the slot left empty.
///
/// Apply once, application-wide:
/// `Router::layer(middleware::from_fn_with_state(facebook, attach_session))`.
pub async fn attach_session(
    State(facebook): State<Arc<Facebook>>,
    request: Request,
    next: Next,
) -> Response {
    let (credentials, mut request) = extract_credentials(request).await;
    if let Some(session) = facebook.resolve(&credentials) {
        request.extensions_mut().insert(session);
    }
    next.run(request).await
}

/// Gate: run the inner handler only when a session is attached. Without one,
/// the registered unauthorized fallback answers the request, or a plain 401
/// if none is registered. The handler is never invoked in either case.
///
/// Apply per route group:
/// `Router::route_layer(middleware::from_fn_with_state(facebook, require_session))`.
pub async fn require_session(
    State(facebook): State<Arc<Facebook>>,
    request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<FacebookSession>().is_none() {
        if let Some(callback) = facebook.unauthorized_callback() {
            return callback();
        }
        return FacebookError::Unauthorized.into_response();
    }
    next.run(request).await
}

/// Pull cookies and any canvas `signed_request` field out of the request.
///
/// Form bodies are buffered to find the field and then restored, so the
/// downstream handler still sees the body it was sent.
async fn extract_credentials(request: Request) -> (RequestCredentials, Request) {
    let cookies = CookieJar::from_headers(request.headers());

    if !is_form_request(request.headers()) {
        let credentials = RequestCredentials {
            cookies,
            signed_request: None,
        };
        return (credentials, request);
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, FORM_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!("Failed to read form body: {}", err);
            Bytes::new()
        }
    };

    let signed_request = form_urlencoded::parse(&bytes)
        .find(|(name, _)| name == SIGNED_REQUEST_FIELD)
        .map(|(_, value)| value.into_owned());

    let request = Request::from_parts(parts, Body::from(bytes));
    let credentials = RequestCredentials {
        cookies,
        signed_request,
    };
    (credentials, request)
}

fn is_form_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|content_type| content_type.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}
