// ABOUTME: Application configuration for the Facebook component
// ABOUTME: Loads app id/secret and optional debug overrides from the environment

use std::env;

use crate::error::{FacebookError, Result};

pub const APP_ID_VAR: &str = "FACEBOOK_APP_ID";
pub const APP_SECRET_VAR: &str = "FACEBOOK_APP_SECRET";
pub const DEBUG_UID_VAR: &str = "FACEBOOK_DEBUG_UID";
pub const DEBUG_TOKEN_VAR: &str = "FACEBOOK_DEBUG_TOKEN";

/// Configuration for a [`Facebook`](crate::Facebook) component.
///
/// `app_id` and `app_secret` are required; the debug pair, when set, makes
/// every request resolve to a session built from those fixed values instead
/// of running real credential verification.
#[derive(Debug, Clone)]
pub struct FacebookConfig {
    pub app_id: String,
    pub app_secret: String,
    pub debug_uid: Option<String>,
    pub debug_token: Option<String>,
}

impl FacebookConfig {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            debug_uid: None,
            debug_token: None,
        }
    }

    pub fn with_debug(mut self, uid: impl Into<String>, token: impl Into<String>) -> Self {
        self.debug_uid = Some(uid.into());
        self.debug_token = Some(token.into());
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            app_id: require_var(APP_ID_VAR)?,
            app_secret: require_var(APP_SECRET_VAR)?,
            debug_uid: env::var(DEBUG_UID_VAR).ok(),
            debug_token: env::var(DEBUG_TOKEN_VAR).ok(),
        })
    }

    /// Check the startup contract. Violations are fatal, not recoverable.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.app_id.is_empty() {
            return Err(missing(APP_ID_VAR));
        }
        if self.app_secret.is_empty() {
            return Err(missing(APP_SECRET_VAR));
        }
        if self.debug_uid.is_some() && self.debug_token.is_none() {
            return Err(FacebookError::Config(format!(
                "{} requires {} to be set as well",
                DEBUG_UID_VAR, DEBUG_TOKEN_VAR
            )));
        }
        Ok(())
    }
}

fn require_var(name: &str) -> Result<String> {
    env::var(name).ok().filter(|v| !v.is_empty()).ok_or_else(|| missing(name))
}

fn missing(name: &str) -> FacebookError {
    FacebookError::Config(format!("{} configuration variable must be set", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn validate_accepts_complete_config() {
        assert!(FacebookConfig::new("123", "456").validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_keys() {
        assert!(FacebookConfig::new("", "456").validate().is_err());
        assert!(FacebookConfig::new("123", "").validate().is_err());
    }

    #[test]
    fn validate_rejects_unpaired_debug_uid() {
        let mut config = FacebookConfig::new("123", "456");
        config.debug_uid = Some("1000".into());
        assert!(config.validate().is_err());

        let config = FacebookConfig::new("123", "456").with_debug("1000", "debug-token");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn from_env_reads_all_variables() {
        env::set_var(APP_ID_VAR, "123");
        env::set_var(APP_SECRET_VAR, "456");
        env::set_var(DEBUG_UID_VAR, "1000");
        env::set_var(DEBUG_TOKEN_VAR, "debug-token");

        let config = FacebookConfig::from_env().unwrap();
        assert_eq!(config.app_id, "123");
        assert_eq!(config.app_secret, "456");
        assert_eq!(config.debug_uid.as_deref(), Some("1000"));
        assert_eq!(config.debug_token.as_deref(), Some("debug-token"));

        env::remove_var(APP_ID_VAR);
        env::remove_var(APP_SECRET_VAR);
        env::remove_var(DEBUG_UID_VAR);
        env::remove_var(DEBUG_TOKEN_VAR);
    }

    #[test]
    #[serial]
    fn from_env_fails_without_required_keys() {
        env::remove_var(APP_ID_VAR);
        env::remove_var(APP_SECRET_VAR);

        let err = FacebookConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(APP_ID_VAR));
    }
}
