//! Admin gate protecting certificate issuance.
//!
//! The stored credential has the form
//! `pbkdf2-sha256$<iterations>$<salt>$<hex key>`, where the key is 32 bytes
//! of PBKDF2-HMAC-SHA256 over the password. `certify hash-password`
//! produces it. With no credential configured the gate refuses every
//! password.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Iteration count written by `hash-password` unless overridden.
pub const DEFAULT_ITERATIONS: u32 = 600_000;

const SCHEME: &str = "pbkdf2-sha256";
const KEY_LEN: usize = 32;
const SALT_LEN: usize = 16;

/// Admin authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No admin credential is configured.
    #[error("no admin credential configured (set CERTIFY_ADMIN_CREDENTIAL)")]
    NotConfigured,
    /// The configured credential cannot be parsed.
    #[error("admin credential is malformed: {0}")]
    MalformedCredential(String),
    /// The password does not match.
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Parsed PBKDF2 credential.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Credential {
    iterations: u32,
    salt: String,
    key: Vec<u8>,
}

impl Credential {
    fn parse(raw: &str) -> Result<Self, AuthError> {
        let malformed = AuthError::MalformedCredential;
        let mut parts = raw.trim().splitn(4, '$');
        let (Some(scheme), Some(iterations), Some(salt), Some(key)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed(format!("expected {SCHEME}$<iterations>$<salt>$<key>")));
        };
        if scheme != SCHEME {
            return Err(malformed(format!("unsupported scheme {scheme:?}")));
        }
        let iterations = iterations
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| malformed(format!("bad iteration count {iterations:?}")))?;
        if salt.is_empty() {
            return Err(malformed("salt is empty".into()));
        }
        let key = hex::decode(key).map_err(|e| malformed(format!("key is not hex: {e}")))?;
        if key.len() != KEY_LEN {
            return Err(malformed(format!("key is {} bytes, expected {KEY_LEN}", key.len())));
        }
        Ok(Self { iterations, salt: salt.to_string(), key })
    }
}

/// Checks admin passwords against the configured credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminGate {
    credential: Result<Credential, AuthError>,
}

impl AdminGate {
    /// Builds a gate from the configured credential, if any.
    ///
    /// A missing or malformed credential is remembered and reported on
    /// every [`AdminGate::verify`] call.
    #[must_use]
    pub fn from_credential(raw: Option<&str>) -> Self {
        let credential = match raw {
            Some(raw) if !raw.trim().is_empty() => Credential::parse(raw),
            _ => Err(AuthError::NotConfigured),
        };
        Self { credential }
    }

    /// Verifies an admin password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on mismatch, or the
    /// configuration error if the gate has no usable credential.
    pub fn verify(&self, password: &str) -> Result<(), AuthError> {
        let credential = self.credential.as_ref().map_err(Clone::clone)?;
        let candidate = derive_key(password, &credential.salt, credential.iterations);
        if bool::from(candidate.as_slice().ct_eq(credential.key.as_slice())) {
            tracing::debug!("admin password accepted");
            Ok(())
        } else {
            tracing::warn!("admin password rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Returns a fresh random salt, hex-encoded.
#[must_use]
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Produces the stored credential for `password`.
///
/// `salt` must be non-empty and must not contain `$`.
#[must_use]
pub fn hash_password(password: &str, salt: &str, iterations: u32) -> String {
    let key = derive_key(password, salt, iterations);
    format!("{SCHEME}${iterations}${salt}${}", hex::encode(key))
}

fn derive_key(password: &str, salt: &str, iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    key
}
