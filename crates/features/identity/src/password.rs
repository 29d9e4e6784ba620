//! PBKDF2-HMAC-SHA256 password records.
//!
//! Records are stored as `pbkdf2_sha256$<iterations>$<salt>$<hex digest>`. The salt is used
//! as its UTF-8 bytes, and the digest length is whatever the record carries (32 bytes for
//! records produced here).

use crate::error::IdentityError;
use caphub_kernel::domain::constants::PASSWORD_HASH_ALGORITHM;
use caphub_kernel::random_token;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Iteration count used when none is given.
pub const DEFAULT_ITERATIONS: u32 = 120_000;

const SALT_LENGTH: usize = 16;
const DIGEST_LENGTH: usize = 32;

/// A parsed password record.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    iterations: u32,
    salt: String,
    digest: Vec<u8>,
}

impl PasswordHash {
    /// Hashes `password` with a fresh random salt.
    pub fn generate(password: &str, iterations: u32) -> Result<Self, IdentityError> {
        if iterations == 0 {
            return Err(IdentityError::config("Iteration count must be positive"));
        }

        let salt = random_token!(SALT_LENGTH);
        let digest = derive(password, &salt, iterations, DIGEST_LENGTH);
        Ok(Self { iterations, salt, digest })
    }

    /// Recomputes the digest for `password` and compares it in constant time.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        let candidate = derive(password, &self.salt, self.iterations, self.digest.len());
        candidate.ct_eq(&self.digest).into()
    }

    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl FromStr for PasswordHash {
    type Err = IdentityError;

    fn from_str(encoded: &str) -> Result<Self, Self::Err> {
        let mut parts = encoded.trim().splitn(4, '$');
        let (Some(algorithm), Some(iterations), Some(salt), Some(digest)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(IdentityError::config("Password hash must have four '$' separated parts"));
        };

        if algorithm != PASSWORD_HASH_ALGORITHM {
            return Err(IdentityError::config(format!(
                "Unsupported password hash algorithm '{algorithm}'"
            )));
        }

        let iterations = iterations
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| IdentityError::config("Password hash iteration count is invalid"))?;

        if salt.is_empty() {
            return Err(IdentityError::config("Password hash salt is empty"));
        }

        let digest = hex::decode(digest)
            .ok()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| IdentityError::config("Password hash digest is not valid hex"))?;

        Ok(Self { iterations, salt: salt.to_owned(), digest })
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PASSWORD_HASH_ALGORITHM}${}${}${}",
            self.iterations,
            self.salt,
            hex::encode(&self.digest)
        )
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("iterations", &self.iterations)
            .field("digest", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Produces a storable record for `password`.
///
/// Used by the `caphub hash-password` command and by tests to build credential files.
pub fn hash_password(password: &str, iterations: u32) -> Result<String, IdentityError> {
    PasswordHash::generate(password, iterations).map(|hash| hash.to_string())
}

fn derive(password: &str, salt: &str, iterations: u32, length: usize) -> Vec<u8> {
    let mut out = vec![0u8; length];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_hash_verifies_only_its_password() {
        let hash = PasswordHash::generate("LeadPass123!", 1_000).unwrap();
        assert!(hash.verify("LeadPass123!"));
        assert!(!hash.verify("leadpass123!"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn encoded_form_parses_back() {
        let encoded = hash_password("secret", 1_000).unwrap();
        assert!(encoded.starts_with("pbkdf2_sha256$1000$"));

        let parsed: PasswordHash = encoded.parse().unwrap();
        assert_eq!(parsed.iterations(), 1_000);
        assert_eq!(parsed.to_string(), encoded);
        assert!(parsed.verify("secret"));
    }

    #[test]
    fn matches_the_reference_vector() {
        // Known PBKDF2-HMAC-SHA256("password", "salt", 1) output.
        let hash: PasswordHash =
            "pbkdf2_sha256$1$salt$120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
                .parse()
                .unwrap();
        assert!(hash.verify("password"));
    }

    #[test]
    fn tampered_digest_fails_verification() {
        let encoded = hash_password("secret", 1_000).unwrap();
        let mut hash: PasswordHash = encoded.parse().unwrap();

        if let Some(last) = hash.digest.last_mut() {
            *last ^= 0x01;
        }
        assert!(!hash.verify("secret"));

        hash.digest.truncate(DIGEST_LENGTH / 2);
        assert!(!hash.verify("not secret"));
    }

    #[test]
    fn malformed_records_are_rejected() {
        for bad in [
            "",
            "pbkdf2_sha256$1000$salt",
            "bcrypt$1000$salt$00ff",
            "pbkdf2_sha256$0$salt$00ff",
            "pbkdf2_sha256$many$salt$00ff",
            "pbkdf2_sha256$1000$$00ff",
            "pbkdf2_sha256$1000$salt$not-hex",
            "pbkdf2_sha256$1000$salt$",
        ] {
            assert!(
                matches!(bad.parse::<PasswordHash>(), Err(IdentityError::Config { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn zero_iterations_cannot_be_generated() {
        assert!(hash_password("secret", 0).is_err());
    }

    #[test]
    fn debug_output_hides_the_digest() {
        let hash = PasswordHash::generate("secret", 1_000).unwrap();
        let debug = format!("{hash:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(&hex::encode(&hash.digest)));
    }
}
