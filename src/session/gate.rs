use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::info;

use crate::constants::{EMAIL_PATTERN, MSG_INVALID_EMAIL, MSG_MISSING_FIELDS};
use crate::utils::{Result, SweeperError};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// Syntactic email check: `local@domain.tld` with word characters, dots and hyphens
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// State of one interactive visit
///
/// This is a presentation gate, not a credential system: any non-empty name
/// and password with a well-formed email are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    authenticated: bool,
    user_name: Option<String>,
}

/// Proof of a successful login, carrying the display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub user_name: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the login form and mark the session authenticated
    ///
    /// A rejected attempt leaves the session untouched.
    pub fn submit_login(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Authenticated> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(SweeperError::ValidationError(MSG_MISSING_FIELDS.to_string()));
        }
        if !is_valid_email(email) {
            return Err(SweeperError::ValidationError(MSG_INVALID_EMAIL.to_string()));
        }

        self.authenticated = true;
        self.user_name = Some(name.to_string());
        info!(user = name, "login accepted");

        Ok(Authenticated {
            user_name: name.to_string(),
        })
    }

    /// Reset to the initial, unauthenticated state
    pub fn logout(&mut self) {
        if let Some(name) = self.user_name.take() {
            info!(user = %name, "logged out");
        }
        *self = Self::default();
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Display name of the logged-in user, or `NotAuthenticated`
    pub fn require_user(&self) -> Result<&str> {
        match (self.authenticated, self.user_name.as_deref()) {
            (true, Some(name)) => Ok(name),
            _ => Err(SweeperError::NotAuthenticated),
        }
    }
}
