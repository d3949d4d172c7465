//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first (via `dotenvy`),
//! so deployments can keep Firestore settings and the admin credential out
//! of the shell profile.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Collection holding certificate documents unless overridden.
pub const DEFAULT_COLLECTION: &str = "certificates";
/// Local store file used unless overridden.
pub const DEFAULT_LOCAL_STORE: &str = ".certify/store.json";
/// Public Firestore REST endpoint.
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
/// Firestore database used unless overridden.
pub const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";

/// Invalid or incomplete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable required by the selected backend is unset.
    #[error("{0} must be set when CERTIFY_BACKEND=firestore")]
    Missing(&'static str),
    /// `CERTIFY_BACKEND` names an unknown backend.
    #[error("unknown CERTIFY_BACKEND {0:?} (expected \"local\" or \"firestore\")")]
    UnknownBackend(String),
}

/// Connection settings for the Firestore backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// REST API root, e.g. `https://firestore.googleapis.com/v1` or an emulator.
    pub base_url: String,
    /// Google Cloud project ID.
    pub project_id: String,
    /// Database name within the project.
    pub database: String,
    /// Web API key appended as `?key=`.
    pub api_key: Option<String>,
    /// OAuth or Firebase ID token sent as a bearer token.
    pub id_token: Option<String>,
}

/// Where certificate documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// A JSON file on local disk.
    Local {
        /// Path of the store file.
        path: PathBuf,
    },
    /// A Firestore database.
    Firestore(FirestoreConfig),
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive string.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Document store backend.
    pub backend: Backend,
    /// Collection holding certificates.
    pub collection: String,
    /// Stored admin credential (`pbkdf2-sha256$<iterations>$<salt>$<hex key>`).
    pub admin_credential: Option<String>,
    /// Directory for per-port cassette recordings, if recording.
    pub record_dir: Option<PathBuf>,
    /// Logging settings.
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected backend is unknown or incomplete.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected backend is unknown or incomplete.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match var("CERTIFY_BACKEND").as_deref().unwrap_or("local") {
            "local" => Backend::Local {
                path: var("CERTIFY_LOCAL_STORE")
                    .map_or_else(|| PathBuf::from(DEFAULT_LOCAL_STORE), PathBuf::from),
            },
            "firestore" => Backend::Firestore(FirestoreConfig {
                base_url: var("FIRESTORE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_FIRESTORE_URL.to_string()),
                project_id: var("FIRESTORE_PROJECT_ID")
                    .ok_or(ConfigError::Missing("FIRESTORE_PROJECT_ID"))?,
                database: var("FIRESTORE_DATABASE")
                    .unwrap_or_else(|| DEFAULT_FIRESTORE_DATABASE.to_string()),
                api_key: var("FIRESTORE_API_KEY"),
                id_token: var("FIRESTORE_ID_TOKEN"),
            }),
            other => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Self {
            backend,
            collection: var("CERTIFY_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            admin_credential: var("CERTIFY_ADMIN_CREDENTIAL"),
            record_dir: var("CERTIFY_RECORD").map(PathBuf::from),
            log: LogConfig {
                filter: var("CERTIFY_LOG").unwrap_or_else(|| "warn".to_string()),
                json: var("CERTIFY_LOG_JSON").is_some_and(|v| v == "1" || v == "true"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_local_backend() {
        let config = load(&[]).unwrap();
        assert_eq!(config.backend, Backend::Local { path: PathBuf::from(DEFAULT_LOCAL_STORE) });
        assert_eq!(config.collection, "certificates");
        assert_eq!(config.log.filter, "warn");
        assert!(!config.log.json);
        assert!(config.admin_credential.is_none());
        assert!(config.record_dir.is_none());
    }

    #[test]
    fn firestore_backend_reads_connection_settings() {
        let config = load(&[
            ("CERTIFY_BACKEND", "firestore"),
            ("FIRESTORE_PROJECT_ID", "certs-prod"),
            ("FIRESTORE_API_KEY", "abc"),
            ("CERTIFY_COLLECTION", "issued"),
            ("CERTIFY_LOG_JSON", "1"),
        ])
        .unwrap();

        let Backend::Firestore(firestore) = config.backend else {
            panic!("expected firestore backend");
        };
        assert_eq!(firestore.project_id, "certs-prod");
        assert_eq!(firestore.base_url, DEFAULT_FIRESTORE_URL);
        assert_eq!(firestore.database, "(default)");
        assert_eq!(firestore.api_key.as_deref(), Some("abc"));
        assert!(firestore.id_token.is_none());
        assert_eq!(config.collection, "issued");
        assert!(config.log.json);
    }

    #[test]
    fn firestore_requires_project_id() {
        let err = load(&[("CERTIFY_BACKEND", "firestore"), ("FIRESTORE_PROJECT_ID", " ")])
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("FIRESTORE_PROJECT_ID"));
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = load(&[("CERTIFY_BACKEND", "postgres")]).unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("postgres".into()));
    }
}
