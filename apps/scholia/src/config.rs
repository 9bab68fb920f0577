//! # Application Configuration
//!
//! File paths for the graph and its anchor records, loaded from an optional
//! TOML file. An absent file yields the defaults; CLI flags override the
//! loaded values afterwards.

use scholia_core::ScholiaError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Paths the binary works with.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backing file of the triple store.
    pub graph_path: PathBuf,

    /// Where anchor records are written.
    pub anchor_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph_path: PathBuf::from("research-graph.ttl"),
            anchor_path: PathBuf::from("latest-anchor.json"),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ScholiaError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScholiaError::Io(format!("read {}: {}", path.display(), e)))?;
        toml::from_str(&text)
            .map_err(|e| ScholiaError::Validation(format!("config {}: {}", path.display(), e)))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load(&dir.path().join("scholia.toml")).expect("load");
        assert_eq!(config.graph_path, PathBuf::from("research-graph.ttl"));
        assert_eq!(config.anchor_path, PathBuf::from("latest-anchor.json"));
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scholia.toml");
        std::fs::write(&path, "graph_path = \"lab.ttl\"\n").expect("write");

        let config = Config::load(&path).expect("load");
        assert_eq!(config.graph_path, PathBuf::from("lab.ttl"));
        assert_eq!(config.anchor_path, PathBuf::from("latest-anchor.json"));
    }

    #[test]
    fn unknown_keys_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scholia.toml");
        std::fs::write(&path, "graph_pth = \"typo.ttl\"\n").expect("write");

        assert!(Config::load(&path).is_err());
    }
}
