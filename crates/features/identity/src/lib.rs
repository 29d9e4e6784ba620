//! Identity feature slice: who may log in, and who is logged in.
//!
//! Users come from a fixed credentials file and are checked with PBKDF2-HMAC-SHA256.
//! Successful logins open a session keyed by a random token, delivered both as a cookie and
//! in the response body. With the `server` feature the crate also provides the `/auth`
//! routes and the [`server::CurrentUser`] extractor other slices use to learn the caller.

mod credentials;
mod error;
mod password;
#[cfg(feature = "server")]
pub mod server;
mod session;

pub use crate::credentials::{
    CredentialRecord, CredentialStore, CredentialsFile, INVALID_CREDENTIALS,
};
pub use crate::error::{IdentityError, IdentityErrorExt};
pub use crate::password::{DEFAULT_ITERATIONS, PasswordHash, hash_password};
pub use crate::session::{CookieSettings, SessionStore};

use caphub_kernel::domain::config::{ApiConfig, SessionConfig};
use caphub_kernel::domain::identity::UserProfile;
use caphub_kernel::domain::registry::InitializedSlice;
use std::sync::Arc;
use tracing::{debug, info};

/// Identity feature state
#[caphub_derive::caphub_slice]
pub struct Identity {
    credentials: CredentialStore,
    sessions: SessionStore,
    cookie: CookieSettings,
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub token: String,
}

impl Identity {
    #[must_use]
    pub fn from_parts(credentials: CredentialStore, session: &SessionConfig) -> Self {
        Self::new(IdentityInner {
            credentials,
            sessions: SessionStore::new(session),
            cookie: CookieSettings::from(session),
        })
    }
}

impl IdentityInner {
    /// Verifies the credentials and opens a session.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, IdentityError> {
        let user = self.credentials.authenticate(username, password).inspect_err(|_| {
            info!(username = %username.trim(), "Login rejected");
        })?;

        let token = self.sessions.issue(user.clone());
        info!(username = %user.username, role = %user.role, "User logged in");
        Ok(LoginOutcome { user, token })
    }

    /// Ends the session behind `token`, if any. Always succeeds.
    pub fn logout(&self, token: Option<&str>) -> bool {
        let revoked = token.is_some_and(|t| self.sessions.revoke(t));
        debug!(revoked, "Logout");
        revoked
    }

    #[must_use]
    pub fn current_user(&self, token: Option<&str>) -> Option<Arc<UserProfile>> {
        token.and_then(|t| self.sessions.resolve(t))
    }

    #[must_use]
    pub const fn cookie(&self) -> &CookieSettings {
        &self.cookie
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

/// Initialize the identity feature from `[security]`.
///
/// A missing or malformed credentials file is fatal.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, IdentityError> {
    let path = &config.security.credentials_file;
    let credentials = CredentialStore::load(path)?;

    info!(users = credentials.len(), path = %path.display(), "Identity slice initialized");

    Ok(InitializedSlice::new(Identity::from_parts(credentials, &config.security.session)))
}
