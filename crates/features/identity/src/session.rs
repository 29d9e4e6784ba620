use caphub_kernel::domain::config::SessionConfig;
use caphub_kernel::domain::identity::UserProfile;
use caphub_kernel::random_token;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Live sessions: opaque token to the profile of the user who logged in.
///
/// Entries expire after the configured time-to-live, or earlier when unused for the idle
/// period. When full, the least recently used session is dropped.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, Arc<UserProfile>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let mut builder = Cache::<String, Arc<UserProfile>>::builder()
            .max_capacity(config.capacity)
            .eviction_policy(EvictionPolicy::lru())
            .time_to_live(Duration::from_secs(config.ttl_seconds.max(1)));

        if config.idle_seconds > 0 {
            builder = builder.time_to_idle(Duration::from_secs(config.idle_seconds));
        }

        Self { sessions: builder.build() }
    }

    /// Starts a session for `profile` and returns its token.
    pub fn issue(&self, profile: UserProfile) -> String {
        let token = random_token!();
        self.sessions.insert(token.clone(), Arc::new(profile));
        token
    }

    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<Arc<UserProfile>> {
        self.sessions.get(token)
    }

    /// Ends a session; returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Number of live sessions after pending expirations are applied.
    #[must_use]
    pub fn active(&self) -> u64 {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count()
    }
}

// Tokens are credentials; never list them.
impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").field("entries", &self.sessions.entry_count()).finish()
    }
}

/// Attributes of the session cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub max_age: u64,
    pub secure: bool,
}

impl CookieSettings {
    /// `Set-Cookie` value carrying `token`.
    #[must_use]
    pub fn session(&self, token: &str) -> String {
        self.render(token, self.max_age)
    }

    /// `Set-Cookie` value that makes the browser drop the cookie.
    #[must_use]
    pub fn expired(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: u64) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!("{}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}{secure}", self.name)
    }
}

impl From<&SessionConfig> for CookieSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            max_age: config.ttl_seconds,
            secure: config.secure_cookie,
        }
    }
}
