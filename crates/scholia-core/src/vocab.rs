//! # Fixed Vocabulary
//!
//! The predicate and class IRIs used by every serialized graph. This table is
//! the interchange contract: any store writing these identifiers produces
//! files this crate can read back, and vice versa.
//!
//! Classes and relations come from the IAO ontology where one exists (papers,
//! authors, titles, citations); topic and institution terms live under the
//! local namespace.

use crate::types::Iri;

// =============================================================================
// NAMESPACES
// =============================================================================

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const IAO_NS: &str = "http://purl.obolibrary.org/obo/IAO_";
const LOCAL_NS: &str = "http://example.org/#";
const ENTITY_NS: &str = "http://example.org/";

// =============================================================================
// CLASS & PREDICATE IRIS
// =============================================================================

/// `rdf:type` — entity-type assertion.
#[must_use]
pub fn rdf_type() -> Iri {
    Iri::new(format!("{RDF_NS}type"))
}

/// IAO 0000013 — research paper class.
#[must_use]
pub fn paper_class() -> Iri {
    Iri::new(format!("{IAO_NS}0000013"))
}

/// IAO 0000238 — document author role class.
#[must_use]
pub fn author_class() -> Iri {
    Iri::new(format!("{IAO_NS}0000238"))
}

/// Local topic class.
#[must_use]
pub fn topic_class() -> Iri {
    Iri::new(format!("{LOCAL_NS}Topic"))
}

/// Local institution class.
#[must_use]
pub fn institution_class() -> Iri {
    Iri::new(format!("{LOCAL_NS}Institution"))
}

/// IAO 0000235 — has title.
#[must_use]
pub fn has_title() -> Iri {
    Iri::new(format!("{IAO_NS}0000235"))
}

/// IAO 0000142 — has author.
#[must_use]
pub fn has_author() -> Iri {
    Iri::new(format!("{IAO_NS}0000142"))
}

/// IAO 0000304 — has username.
#[must_use]
pub fn has_username() -> Iri {
    Iri::new(format!("{IAO_NS}0000304"))
}

/// IAO 0000302 — has first name.
#[must_use]
pub fn first_name() -> Iri {
    Iri::new(format!("{IAO_NS}0000302"))
}

/// IAO 0000303 — has last name.
#[must_use]
pub fn last_name() -> Iri {
    Iri::new(format!("{IAO_NS}0000303"))
}

/// IAO 0000581 — has publication date (object typed `xsd:date`).
#[must_use]
pub fn publication_date() -> Iri {
    Iri::new(format!("{IAO_NS}0000581"))
}

/// IAO 0000136 — cites.
#[must_use]
pub fn cites() -> Iri {
    Iri::new(format!("{IAO_NS}0000136"))
}

/// Local "has research topic" relation.
#[must_use]
pub fn research_topic() -> Iri {
    Iri::new(format!("{LOCAL_NS}researchTopic"))
}

/// Local "affiliated with" relation (author → institution).
#[must_use]
pub fn affiliated_with() -> Iri {
    Iri::new(format!("{LOCAL_NS}affiliatedWith"))
}

/// `xsd:date` datatype for publication-date literals.
#[must_use]
pub fn xsd_date() -> Iri {
    Iri::new("http://www.w3.org/2001/XMLSchema#date")
}

// =============================================================================
// ENTITY IRIS
// =============================================================================

/// IRI of the paper with the given numeric id.
#[must_use]
pub fn paper_iri(id: u64) -> Iri {
    Iri::new(format!("{ENTITY_NS}ResearchPaper/{id}"))
}

/// IRI of the author with the given username.
#[must_use]
pub fn person_iri(username: &str) -> Iri {
    Iri::new(format!("{ENTITY_NS}Person/{username}"))
}

/// IRI of the topic with the given slug.
#[must_use]
pub fn topic_iri(slug: &str) -> Iri {
    Iri::new(format!("{ENTITY_NS}Topic/{slug}"))
}

/// IRI of the institution with the given name.
#[must_use]
pub fn institution_iri(name: &str) -> Iri {
    Iri::new(format!("{ENTITY_NS}Institution/{name}"))
}

/// Parse the numeric id out of a paper IRI's final segment.
///
/// Paper identifiers are numeric by contract; returns `None` for any
/// non-numeric suffix so callers can skip out-of-contract subjects.
#[must_use]
pub fn paper_id(iri: &Iri) -> Option<u64> {
    iri.local_name().parse().ok()
}

// =============================================================================
// TOPIC NORMALIZATION
// =============================================================================

/// Derive a topic slug from a free-text name.
///
/// Trims the input and collapses each internal whitespace run to a single
/// underscore. Idempotent: `topic_slug(topic_slug(s)) == topic_slug(s)`.
#[must_use]
pub fn topic_slug(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Recover the display name from a topic slug (inverse of [`topic_slug`]).
#[must_use]
pub fn topic_display_name(slug: &str) -> String {
    slug.replace('_', " ")
}

// =============================================================================
// TESTS
// =============================================================================
