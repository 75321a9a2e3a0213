// ABOUTME: The Facebook component: configuration binding, session resolution, unauthorized fallback
// ABOUTME: Cookie strategy runs before the canvas signed-request strategy; first success wins

use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use std::fmt;
use std::sync::Arc;

use crate::config::FacebookConfig;
use crate::error::Result;
use crate::graph::{CredentialVerifier, GraphUser};
use crate::session::FacebookSession;

/// Fallback invoked by [`require_session`](crate::require_session) when no
/// session is attached to the request. At most one is registered.
pub type UnauthorizedHandler = Arc<dyn Fn() -> Response + Send + Sync>;

/// The credentials one request can carry, extracted up front so resolution
/// never touches ambient request state.
pub struct RequestCredentials {
    pub cookies: CookieJar,
    pub signed_request: Option<String>,
}

impl Default for RequestCredentials {
    fn default() -> Self {
        Self {
            cookies: CookieJar::new(),
            signed_request: None,
        }
    }
}

type SessionHook = fn(&Facebook, &RequestCredentials) -> Option<FacebookSession>;

/// Facebook session support for an axum application.
///
/// Construct with [`Facebook::new`] and bind configuration later with
/// [`Facebook::init_app`], or do both at once with [`Facebook::with_config`].
/// Binding validates the required configuration and registers the resolution
/// hook: the debug hook when a debug uid is configured, the normal
/// two-strategy hook otherwise.
pub struct Facebook {
    config: Option<FacebookConfig>,
    verifier: Arc<dyn CredentialVerifier>,
    unauthorized: Option<UnauthorizedHandler>,
    hook: SessionHook,
}

impl Facebook {
    /// Create an unbound component. No configuration is recorded until
    /// [`init_app`](Self::init_app) is called.
    pub fn new(verifier: impl CredentialVerifier) -> Self {
        Self {
            config: None,
            verifier: Arc::new(verifier),
            unauthorized: None,
            hook: Self::resolve_request,
        }
    }

    /// Create a component bound to `config`.
    pub fn with_config(config: FacebookConfig, verifier: impl CredentialVerifier) -> Result<Self> {
        let mut facebook = Self::new(verifier);
        facebook.init_app(config)?;
        Ok(facebook)
    }

    /// Bind the component to an application's configuration.
    ///
    /// Fails with a configuration error when either required value is
    /// missing; callers are expected to propagate that out of startup.
    /// Registers either the debug or the normal request hook.
    pub fn init_app(&mut self, config: FacebookConfig) -> Result<()> {
        config.validate()?;
        self.hook = if config.debug_uid.is_some() {
            Self::resolve_debug
        } else {
            Self::resolve_request
        };
        self.config = Some(config);
        Ok(())
    }

    /// The bound configuration, or `None` before [`init_app`](Self::init_app).
    pub fn config(&self) -> Option<&FacebookConfig> {
        self.config.as_ref()
    }

    /// Register the fallback to run instead of responding 401 when a gated
    /// handler has no session. A later registration replaces the earlier one.
    pub fn unauthorized_handler<F>(&mut self, callback: F)
    where
        F: Fn() -> Response + Send + Sync + 'static,
    {
        self.unauthorized = Some(Arc::new(callback));
    }

    pub(crate) fn unauthorized_callback(&self) -> Option<UnauthorizedHandler> {
        self.unauthorized.clone()
    }

    /// Resolve a session for one request's credentials using the hook
    /// registered at bind time.
    pub fn resolve(&self, credentials: &RequestCredentials) -> Option<FacebookSession> {
        (self.hook)(self, credentials)
    }

    fn resolve_request(&self, credentials: &RequestCredentials) -> Option<FacebookSession> {
        let user = self
            .cookie_user(credentials)
            .or_else(|| self.canvas_user(credentials))?;
        Some(FacebookSession::new(user.uid, user.access_token, user.expires))
    }

    fn resolve_debug(&self, _credentials: &RequestCredentials) -> Option<FacebookSession> {
        // Debug values are validated as a pair at bind time.
        let config = self.config.as_ref()?;
        let uid = config.debug_uid.clone()?;
        let token = config.debug_token.clone()?;
        Some(FacebookSession::new(uid, token, None))
    }

    /// Attempt to get the Facebook user from the authentication cookie.
    fn cookie_user(&self, credentials: &RequestCredentials) -> Option<GraphUser> {
        let config = self.config.as_ref()?;
        match self.verifier.user_from_cookie(
            &credentials.cookies,
            &config.app_id,
            &config.app_secret,
        ) {
            Ok(user) => user,
            Err(err) => {
                tracing::error!("Facebook error: {}", err);
                None
            }
        }
    }

    /// Attempt to get the Facebook user from a canvas `signed_request`.
    fn canvas_user(&self, credentials: &RequestCredentials) -> Option<GraphUser> {
        let config = self.config.as_ref()?;
        let signed_request = credentials.signed_request.as_deref()?;

        let claims = match self
            .verifier
            .parse_signed_request(signed_request, &config.app_secret)
        {
            Ok(claims) => claims,
            Err(err) => {
                tracing::error!("Facebook error: {}", err);
                return None;
            }
        };

        // A signed request without a user id (or token) carries no login.
        let uid = claims.user_id?;
        let access_token = claims.oauth_token?;
        Some(GraphUser {
            uid,
            access_token,
            expires: None,
        })
    }
}

impl fmt::Display for Facebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let app_id = self
            .config
            .as_ref()
            .map(|config| config.app_id.as_str())
            .unwrap_or("(none)");
        write!(f, "<Facebook app_id={}>", app_id)
    }
}

impl fmt::Debug for Facebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facebook")
            .field("config", &self.config)
            .field("unauthorized", &self.unauthorized.is_some())
            .finish_non_exhaustive()
    }
}
