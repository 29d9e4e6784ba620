use crate::error::{IdentityError, IdentityErrorExt};
use crate::password::{DEFAULT_ITERATIONS, PasswordHash};
use caphub_kernel::domain::constants::ALL_PRACTICE_AREAS;
use caphub_kernel::domain::identity::{Role, UserProfile};
use caphub_kernel::random_token;
use fxhash::FxHashMap;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Layout of the credentials file: `{ "users": [ ... ] }`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsFile {
    #[serde(default)]
    pub users: Vec<CredentialRecord>,
}

/// One user as written in the credentials file.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub practice_areas: Vec<String>,
    #[serde(default)]
    pub practice_area: Option<String>,
    #[serde(default)]
    pub skill_level: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub availability_hours: Option<u32>,
}

#[derive(Debug)]
struct Account {
    profile: UserProfile,
    hash: PasswordHash,
}

/// The fixed set of users allowed to log in, keyed by lowercase username.
#[derive(Debug)]
pub struct CredentialStore {
    accounts: FxHashMap<String, Account>,
    /// Checked for unknown usernames so they cost as much as a wrong password.
    decoy: PasswordHash,
    #[cfg(test)]
    verifications: std::sync::atomic::AtomicUsize,
}

impl CredentialStore {
    /// Reads and validates a credentials file.
    pub fn load(path: &Path) -> Result<Self, IdentityError> {
        let raw = std::fs::read_to_string(path)
            .context(format!("Reading credentials from {}", path.display()))?;
        Self::from_json(&raw).context(format!("Loading {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self, IdentityError> {
        let file: CredentialsFile = serde_json::from_str(raw).context("Parsing credentials")?;
        Self::from_records(file.users)
    }

    /// Builds the store, rejecting malformed hashes and duplicate usernames up front.
    pub fn from_records<I>(records: I) -> Result<Self, IdentityError>
    where
        I: IntoIterator<Item = CredentialRecord>,
    {
        let mut accounts = FxHashMap::default();

        for record in records {
            let key = normalize(&record.username);
            if key.is_empty() || record.email.trim().is_empty() {
                return Err(IdentityError::config("Every user needs a username and an email"));
            }

            let hash = record
                .password_hash
                .parse::<PasswordHash>()
                .context(format!("Password hash of '{}'", record.username))?;

            if record.role == Role::PracticeLead && record.practice_areas.is_empty() {
                warn!(
                    username = %record.username,
                    "Practice lead has no practice areas; grant \"{ALL_PRACTICE_AREAS}\" for all"
                );
            }

            let profile = UserProfile {
                username: record.username.trim().to_owned(),
                email: record.email.trim().to_owned(),
                role: record.role,
                name: record.name,
                practice_areas: record.practice_areas,
                practice_area: record.practice_area,
                skill_level: record.skill_level,
                certifications: record.certifications,
                availability_hours: record.availability_hours,
            };

            if accounts.insert(key, Account { profile, hash }).is_some() {
                return Err(IdentityError::config(format!(
                    "Duplicate username '{}'",
                    record.username.trim()
                )));
            }
        }

        let iterations =
            accounts.values().map(|a| a.hash.iterations()).max().unwrap_or(DEFAULT_ITERATIONS);
        let decoy = PasswordHash::generate(&random_token!(), iterations)?;

        debug!(users = accounts.len(), "Credential store ready");
        Ok(Self {
            accounts,
            decoy,
            #[cfg(test)]
            verifications: std::sync::atomic::AtomicUsize::new(0),
        })
    }

    /// Checks a username/password pair.
    ///
    /// Unknown users and wrong passwords produce the same error after the same amount of
    /// hashing work.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<UserProfile, IdentityError> {
        let account = self.accounts.get(&normalize(username));
        let verified = account.map_or(&self.decoy, |a| &a.hash).verify(password);

        #[cfg(test)]
        self.verifications.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        match account {
            Some(account) if verified => Ok(account.profile.clone()),
            _ => Err(IdentityError::Auth { message: INVALID_CREDENTIALS.into(), context: None }),
        }
    }

    #[must_use]
    pub fn profile(&self, username: &str) -> Option<&UserProfile> {
        self.accounts.get(&normalize(username)).map(|account| &account.profile)
    }

    pub(crate) fn len(&self) -> usize {
        self.accounts.len()
    }
}

fn normalize(username: &str) -> String {
    username.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use serde_json::json;

    fn users() -> String {
        json!({
            "users": [
                {
                    "username": "practice.lead",
                    "email": "lead@example.com",
                    "role": "practice_lead",
                    "password_hash": hash_password("LeadPass123!", 1_000).unwrap(),
                    "practice_areas": ["*"],
                },
                {
                    "username": "consultant.user",
                    "email": "consultant@example.com",
                    "role": "consultant",
                    "password_hash": hash_password("Consult123!", 1_000).unwrap(),
                    "practice_area": "Technology",
                    "certifications": ["AWS Solutions Architect"],
                    "availability_hours": 30,
                },
            ]
        })
        .to_string()
    }

    #[test]
    fn authenticates_case_insensitively_by_username() {
        let store = CredentialStore::from_json(&users()).unwrap();
        assert_eq!(store.len(), 2);

        let lead = store.authenticate("Practice.Lead", "LeadPass123!").unwrap();
        assert_eq!(lead.role, Role::PracticeLead);
        assert_eq!(lead.practice_areas, vec!["*"]);

        let consultant = store.authenticate("consultant.user", "Consult123!").unwrap();
        assert_eq!(consultant.availability_hours, Some(30));
    }

    #[test]
    fn unknown_user_and_wrong_password_look_the_same() {
        let store = CredentialStore::from_json(&users()).unwrap();

        let wrong = store.authenticate("practice.lead", "nope").unwrap_err();
        let unknown = store.authenticate("ghost", "LeadPass123!").unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, IdentityError::Auth { .. }));
    }

    #[test]
    fn unknown_user_pays_for_a_full_verification() {
        use std::sync::atomic::Ordering;

        let store = CredentialStore::from_json(&users()).unwrap();
        assert_eq!(store.decoy.iterations(), 1_000);

        assert!(store.authenticate("ghost", "LeadPass123!").is_err());
        assert_eq!(store.verifications.load(Ordering::Relaxed), 1);

        assert!(store.authenticate("practice.lead", "nope").is_err());
        assert_eq!(store.verifications.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn empty_store_uses_the_default_work_factor() {
        let store = CredentialStore::from_records(Vec::new()).unwrap();
        assert_eq!(store.decoy.iterations(), DEFAULT_ITERATIONS);
        assert!(store.authenticate("anyone", "anything").is_err());
    }

    #[test]
    fn malformed_hash_fails_the_load() {
        let raw = json!({
            "users": [{
                "username": "broken",
                "email": "broken@example.com",
                "role": "consultant",
                "password_hash": "md5$abc",
            }]
        })
        .to_string();

        let err = CredentialStore::from_json(&raw).unwrap_err();
        assert!(matches!(err, IdentityError::Config { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn duplicate_usernames_are_rejected() {
        let hash = hash_password("x", 1_000).unwrap();
        let raw = json!({
            "users": [
                { "username": "a", "email": "a@example.com", "role": "consultant", "password_hash": hash },
                { "username": "A", "email": "b@example.com", "role": "consultant", "password_hash": hash },
            ]
        })
        .to_string();

        assert!(matches!(CredentialStore::from_json(&raw), Err(IdentityError::Config { .. })));
    }

    #[test]
    fn unknown_roles_are_a_format_error() {
        let raw = r#"{"users":[{"username":"a","email":"a@x","role":"admin","password_hash":"h"}]}"#;
        assert!(matches!(CredentialStore::from_json(raw), Err(IdentityError::Json { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CredentialStore::load(&dir.path().join("users.json")).unwrap_err();
        assert!(matches!(err, IdentityError::Io { .. }));
    }
}
