//! Well-known names shared across crates.

/// Practice-area entry granting a practice lead every area.
pub const ALL_PRACTICE_AREAS: &str = "*";

/// Default name of the session cookie set on login.
pub const SESSION_COOKIE: &str = "caphub_session";

/// Identifier prefix of the only supported password hash scheme.
pub const PASSWORD_HASH_ALGORITHM: &str = "pbkdf2_sha256";

/// Role names as they appear in credential files and API payloads.
pub const PRACTICE_LEAD: &str = "practice_lead";
pub const CONSULTANT: &str = "consultant";
