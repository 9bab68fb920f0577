//! # Graph Integrity Anchoring
//!
//! Records a BLAKE3 hash of the serialized graph file alongside a timestamp,
//! and later re-hashes the file to detect drift. The anchor record is a small
//! JSON document kept next to the graph; an absent graph file hashes as empty
//! content, matching the empty-store semantics of the loader.
//!
//! Verification never fails hard: any problem (missing anchor, unreadable
//! file, malformed record) comes back as a [`VerifyOutcome::Failure`] so
//! callers can render it instead of aborting.

use scholia_core::ScholiaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A persisted anchor: the graph hash at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRecord {
    pub hash: String,
    pub graph_file: String,
    pub anchored_at: String,
}

/// Result of checking the current graph against the stored anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerifyOutcome {
    #[serde(rename_all = "camelCase")]
    Report {
        is_valid: bool,
        stored_hash: String,
        current_hash: String,
    },
    Failure {
        error: String,
    },
}

/// BLAKE3 hex digest of the graph file's current bytes.
fn graph_hash(graph_path: &Path) -> Result<String, ScholiaError> {
    let bytes = if graph_path.exists() {
        std::fs::read(graph_path)
            .map_err(|e| ScholiaError::Io(format!("read {}: {}", graph_path.display(), e)))?
    } else {
        Vec::new()
    };
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Hash the graph file and write a fresh anchor record.
pub fn anchor_graph(graph_path: &Path, anchor_path: &Path) -> Result<AnchorRecord, ScholiaError> {
    let record = AnchorRecord {
        hash: graph_hash(graph_path)?,
        graph_file: graph_path.display().to_string(),
        anchored_at: chrono::Utc::now().to_rfc3339(),
    };

    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| ScholiaError::Io(format!("serialize anchor: {}", e)))?;
    std::fs::write(anchor_path, json)
        .map_err(|e| ScholiaError::Io(format!("write {}: {}", anchor_path.display(), e)))?;

    tracing::info!("Anchored {} as {}", record.graph_file, record.hash);
    Ok(record)
}

/// Compare the graph file against the stored anchor record.
#[must_use]
pub fn verify_anchor(graph_path: &Path, anchor_path: &Path) -> VerifyOutcome {
    let stored = match std::fs::read_to_string(anchor_path) {
        Ok(text) => text,
        Err(e) => {
            return VerifyOutcome::Failure {
                error: format!("no anchor record at {}: {}", anchor_path.display(), e),
            };
        }
    };
    let record: AnchorRecord = match serde_json::from_str(&stored) {
        Ok(record) => record,
        Err(e) => {
            return VerifyOutcome::Failure {
                error: format!("malformed anchor record: {}", e),
            };
        }
    };
    let current_hash = match graph_hash(graph_path) {
        Ok(hash) => hash,
        Err(e) => {
            return VerifyOutcome::Failure {
                error: e.to_string(),
            };
        }
    };

    VerifyOutcome::Report {
        is_valid: record.hash == current_hash,
        stored_hash: record.hash,
        current_hash,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_then_verify_is_valid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = dir.path().join("graph.ttl");
        let anchor = dir.path().join("anchor.json");
        std::fs::write(&graph, "<a> <b> <c> .\n").expect("write");

        anchor_graph(&graph, &anchor).expect("anchor");
        match verify_anchor(&graph, &anchor) {
            VerifyOutcome::Report {
                is_valid,
                stored_hash,
                current_hash,
            } => {
                assert!(is_valid);
                assert_eq!(stored_hash, current_hash);
            }
            VerifyOutcome::Failure { error } => unreachable!("unexpected failure: {error}"),
        }
    }

    #[test]
    fn modified_graph_fails_verification() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = dir.path().join("graph.ttl");
        let anchor = dir.path().join("anchor.json");
        std::fs::write(&graph, "original").expect("write");

        anchor_graph(&graph, &anchor).expect("anchor");
        std::fs::write(&graph, "tampered").expect("rewrite");

        match verify_anchor(&graph, &anchor) {
            VerifyOutcome::Report { is_valid, .. } => assert!(!is_valid),
            VerifyOutcome::Failure { error } => unreachable!("unexpected failure: {error}"),
        }
    }

    #[test]
    fn missing_anchor_reports_failure_not_panic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outcome = verify_anchor(&dir.path().join("graph.ttl"), &dir.path().join("none.json"));
        assert!(matches!(outcome, VerifyOutcome::Failure { .. }));
    }

    #[test]
    fn absent_graph_hashes_as_empty_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let absent = dir.path().join("absent.ttl");
        let anchor = dir.path().join("anchor.json");

        let record = anchor_graph(&absent, &anchor).expect("anchor");
        assert_eq!(record.hash, blake3::hash(b"").to_hex().to_string());
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record = AnchorRecord {
            hash: "abc".to_string(),
            graph_file: "graph.ttl".to_string(),
            anchored_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"graphFile\""));
        assert!(json.contains("\"anchoredAt\""));
    }
}
