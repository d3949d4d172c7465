//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a cassette path panic if
/// called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the clock port cassette file.
    pub clock: Option<PathBuf>,
    /// Path to the ID generator port cassette file.
    pub id_gen: Option<PathBuf>,
    /// Path to the document store port cassette file.
    pub documents: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the ID generator port.
    pub id_gen: Option<CassetteReplayer>,
    /// Replayer for the document store port.
    pub documents: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where all port paths are `None`.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Points every port at the cassettes a [`RecordingSession`] writes
    /// into `dir` (`<port>.cassette.yaml`).
    ///
    /// [`RecordingSession`]: super::session::RecordingSession
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        Self {
            clock: Some(dir.join("clock.cassette.yaml")),
            id_gen: Some(dir.join("id_gen.cassette.yaml")),
            documents: Some(dir.join("documents.cassette.yaml")),
        }
    }

    /// Load a single cassette file and create a replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        Cassette::load(path).map(|cassette| CassetteReplayer::new(&cassette))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            clock: self.clock.as_deref().map(Self::load_port_cassette).transpose()?,
            id_gen: self.id_gen.as_deref().map(Self::load_port_cassette).transpose()?,
            documents: self.documents.as_deref().map(Self::load_port_cassette).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            crate_version: "0.1.0".into(),
            interactions,
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[test]
    fn session_dir_layout_names_every_port() {
        let config = CassetteConfig::from_session_dir(Path::new("/rec/2024"));
        assert_eq!(config.clock.unwrap(), Path::new("/rec/2024/clock.cassette.yaml"));
        assert_eq!(config.id_gen.unwrap(), Path::new("/rec/2024/id_gen.cassette.yaml"));
        assert_eq!(config.documents.unwrap(), Path::new("/rec/2024/documents.cassette.yaml"));
    }

    #[test]
    fn load_per_port_cassettes() {
        let dir = std::env::temp_dir().join("certify_cassette_config_ports");
        std::fs::create_dir_all(&dir).unwrap();

        let id_path = dir.join("id_gen.cassette.yaml");
        write_cassette(
            &id_path,
            vec![Interaction {
                seq: 0,
                port: "id_gen".into(),
                method: "generate_id".into(),
                input: json!(null),
                output: json!("24-ZZZZZZ"),
            }],
        );

        let config = CassetteConfig { id_gen: Some(id_path), ..CassetteConfig::default() };
        let mut replayers = config.load_all().unwrap();

        let id_gen = replayers.id_gen.as_mut().unwrap();
        assert_eq!(id_gen.next_interaction("id_gen", "generate_id").output, json!("24-ZZZZZZ"));
        assert!(replayers.clock.is_none());
        assert!(replayers.documents.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_all_reports_missing_file() {
        let config = CassetteConfig {
            documents: Some(PathBuf::from("/nonexistent/documents.cassette.yaml")),
            ..CassetteConfig::default()
        };
        assert!(config.load_all().is_err());
    }
}
