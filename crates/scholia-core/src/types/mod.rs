//! # Core Type Definitions
//!
//! This module contains the statement-level types for the Scholia store:
//! - Identifiers (`Iri`)
//! - Literal values (`Literal`, with optional language or datatype tag)
//! - Statement fields (`Term`) and statements themselves (`Statement`)
//! - Error types (`ScholiaError`)
//!
//! ## Immutability Guarantees
//!
//! Statements are write-once: there is no update or delete anywhere in the
//! core. All types implement `Ord` so they can key `BTreeMap` indexes with
//! deterministic ordering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IRI
// =============================================================================

/// An IRI identifying a subject, predicate, or object resource.
///
/// Compared by exact string equality; no normalization or subsumption.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Iri(pub String);

impl Iri {
    /// Create a new IRI from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path segment of the IRI (everything after the last `/`).
    ///
    /// Entity IRIs in this graph encode their local identifier as the last
    /// segment (`.../ResearchPaper/42`, `.../Person/bschack`).
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// LITERAL
// =============================================================================

/// A literal object value with an optional language or datatype tag.
///
/// A literal carries at most one of the two tags; plain literals carry
/// neither.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// The lexical value.
    pub value: String,
    /// Optional language tag (e.g. `en`).
    pub lang: Option<String>,
    /// Optional datatype IRI (e.g. `xsd:date`).
    pub datatype: Option<Iri>,
}

impl Literal {
    /// Create a plain literal with no tag.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    /// Create a language-tagged literal.
    #[must_use]
    pub fn lang_tagged(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: Some(lang.into()),
            datatype: None,
        }
    }

    /// Create a datatype-tagged literal.
    #[must_use]
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            lang: None,
            datatype: Some(datatype),
        }
    }
}

// =============================================================================
// TERM
// =============================================================================

/// A statement object: either a resource IRI or a literal.
///
/// Subjects and predicates are always IRIs; only objects may be literals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    /// A resource reference.
    Iri(Iri),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// The IRI if this term is a resource reference.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Literal(_) => None,
        }
    }

    /// The literal if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Iri(_) => None,
            Self::Literal(lit) => Some(lit),
        }
    }

    /// The lexical form: literal value, or the full IRI string.
    #[must_use]
    pub fn lexical(&self) -> &str {
        match self {
            Self::Iri(iri) => iri.as_str(),
            Self::Literal(lit) => &lit.value,
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

// =============================================================================
// STATEMENT
// =============================================================================

/// An atomic (subject, predicate, object) fact.
///
/// Immutable once added to a store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Statement {
    /// The subject resource.
    pub subject: Iri,
    /// The predicate (relationship) IRI.
    pub predicate: Iri,
    /// The object: resource or literal.
    pub object: Term,
}

impl Statement {
    /// Create a new statement.
    #[must_use]
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Scholia core.
///
/// - No silent failures
/// - All validation for a mutating operation completes before any statement
///   is written, so an error never leaves a partially-applied mutation
#[derive(Debug, Error)]
pub enum ScholiaError {
    /// A required field is missing or empty.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A unique-key collision (e.g. duplicate author username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The persisted graph file is malformed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the graph file.
        line: usize,
        /// Description of the malformed input.
        message: String,
    },

    /// An I/O error occurred while loading or saving the graph file.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_local_name_is_last_segment() {
        let iri = Iri::new("http://example.org/ResearchPaper/42");
        assert_eq!(iri.local_name(), "42");
    }

    #[test]
    fn iri_local_name_without_slash_is_whole_string() {
        let iri = Iri::new("urn:example");
        assert_eq!(iri.local_name(), "urn:example");
    }

    #[test]
    fn term_lexical_forms() {
        let iri: Term = Iri::new("http://example.org/x").into();
        assert_eq!(iri.lexical(), "http://example.org/x");

        let lit: Term = Literal::lang_tagged("Basic ML", "en").into();
        assert_eq!(lit.lexical(), "Basic ML");
        assert!(lit.as_iri().is_none());
    }

    #[test]
    fn literal_tags_are_exclusive_by_construction() {
        let plain = Literal::plain("bschack");
        assert!(plain.lang.is_none() && plain.datatype.is_none());

        let tagged = Literal::lang_tagged("Ben", "en");
        assert_eq!(tagged.lang.as_deref(), Some("en"));
        assert!(tagged.datatype.is_none());

        let typed = Literal::typed("2022-03-21", Iri::new("http://www.w3.org/2001/XMLSchema#date"));
        assert!(typed.lang.is_none());
        assert!(typed.datatype.is_some());
    }

    #[test]
    fn statements_order_deterministically() {
        let a = Statement::new(
            Iri::new("http://example.org/a"),
            Iri::new("http://example.org/p"),
            Iri::new("http://example.org/x"),
        );
        let b = Statement::new(
            Iri::new("http://example.org/b"),
            Iri::new("http://example.org/p"),
            Iri::new("http://example.org/x"),
        );
        assert!(a < b);
    }
}
