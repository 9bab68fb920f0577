//! # scholia-core
//!
//! The research-paper knowledge graph engine - THE LOGIC.
//!
//! This crate implements the full graph substrate: an append-only triple
//! store with pattern matching, a line-oriented textual persistence format,
//! the entity repository (authors, papers, topics, institutions), and the
//! reasoner for multi-hop derived queries.
//!
//! ## Layering
//!
//! - `types` / `vocab` → statements and the fixed IRI vocabulary
//! - `store` → the in-memory statement set with indexes
//! - `turtle` → load/save of the backing file
//! - `repository` → stateful mutations with persist-per-call semantics
//! - `reasoner` → pure read-only derived queries
//!
//! ## Architectural Constraints
//!
//! - The repository is the ONLY place where mutation happens (stateful)
//! - The reasoner is pure: borrowed store in, owned results out
//! - Statements are append-only: no update, no delete, no dedup
//! - NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod reasoner;
pub mod repository;
pub mod store;
pub mod turtle;
pub mod types;
pub mod vocab;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Iri, Literal, ScholiaError, Statement, Term};

// =============================================================================
// RE-EXPORTS: Store & Repository
// =============================================================================

pub use repository::{Author, AuthorRef, NewAuthor, NewPaper, Paper, PaperDetails, Repository};
pub use store::TripleStore;

// =============================================================================
// RE-EXPORTS: Reasoner
// =============================================================================

pub use reasoner::{
    AuthorSummary, ListOptions, PaperListing, PaperRef, SortField, TopicPaper, TopicSummary,
    list_authors, list_papers, list_topics, paper_citations, papers_for_topic, related_papers,
    topic_experts,
};
