//! # Reasoner
//!
//! Multi-hop derived-relationship queries over the triple store. Everything
//! here is read-only: no function mutates the store or touches the backing
//! file, so queries are always safe to interleave with each other.
//!
//! All deduplication works on resolved logical identifiers (paper id,
//! username, topic slug), never on object identity of freshly constructed
//! result values.

use crate::repository::{AuthorRef, resolve_author};
use crate::store::TripleStore;
use crate::types::Term;
use crate::vocab;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// RESULT TYPES
// =============================================================================

/// A paper reference in a derived-relationship result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRef {
    pub id: u64,
    pub title: Option<String>,
}

/// A topic with its display name, slug, and referencing-paper count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub name: String,
    pub slug: String,
    pub paper_count: usize,
}

/// An author with the number of papers referencing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub paper_count: usize,
}

/// A fully joined paper row for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperListing {
    pub id: u64,
    pub title: Option<String>,
    pub publication_date: Option<String>,
    pub authors: Vec<AuthorRef>,
    pub topics: Vec<String>,
}

/// A paper row for the per-topic presentation listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPaper {
    pub id: u64,
    pub title: Option<String>,
    pub publication_date: Option<String>,
}

/// Sort field for [`list_papers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Date,
    Title,
}

/// Options for [`list_papers`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListOptions {
    pub sort_by: SortField,
    pub descending: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort_by: SortField::Date,
            descending: true,
        }
    }
}

// =============================================================================
// EXPERT DISCOVERY
// =============================================================================

/// Every author of every paper tagged with the topic.
///
/// Accepts a display name or a slug (normalization is idempotent).
/// Deduplicated by username; the first occurrence wins for display fields.
#[must_use]
pub fn topic_experts(store: &TripleStore, topic_name: &str) -> Vec<AuthorRef> {
    let topic: Term = vocab::topic_iri(&vocab::topic_slug(topic_name)).into();
    let mut seen = BTreeSet::new();
    let mut experts = Vec::new();

    for paper_st in store.matching(None, Some(&vocab::research_topic()), Some(&topic)) {
        for author_st in store.matching(Some(&paper_st.subject), Some(&vocab::has_author()), None) {
            let Some(person) = author_st.object.as_iri() else {
                continue;
            };
            let author = resolve_author(store, person);
            if seen.insert(author.username.clone()) {
                experts.push(author);
            }
        }
    }
    experts
}

// =============================================================================
// CITATION GRAPH
// =============================================================================

/// Every paper citing the given paper, deduplicated by the citing paper's
/// resolved id.
#[must_use]
pub fn paper_citations(store: &TripleStore, paper_id: u64) -> Vec<PaperRef> {
    let target: Term = vocab::paper_iri(paper_id).into();
    let mut seen = BTreeSet::new();
    let mut citing = Vec::new();

    for st in store.matching(None, Some(&vocab::cites()), Some(&target)) {
        let Some(id) = vocab::paper_id(&st.subject) else {
            continue;
        };
        if seen.insert(id) {
            citing.push(PaperRef {
                id,
                title: paper_title(store, id),
            });
        }
    }
    citing
}

// =============================================================================
// RELATEDNESS
// =============================================================================

/// Papers sharing at least one topic with the given paper, excluding the
/// paper itself. The relation is symmetric.
#[must_use]
pub fn related_papers(store: &TripleStore, paper_id: u64) -> Vec<PaperRef> {
    let subject = vocab::paper_iri(paper_id);
    let mut seen = BTreeSet::new();
    let mut related = Vec::new();

    for topic_st in store.matching(Some(&subject), Some(&vocab::research_topic()), None) {
        for peer_st in store.matching(None, Some(&vocab::research_topic()), Some(&topic_st.object))
        {
            let Some(id) = vocab::paper_id(&peer_st.subject) else {
                continue;
            };
            if id == paper_id {
                continue;
            }
            if seen.insert(id) {
                related.push(PaperRef {
                    id,
                    title: paper_title(store, id),
                });
            }
        }
    }
    related
}

// =============================================================================
// AGGREGATE LISTINGS
// =============================================================================

/// Every topic with its display name, slug, and paper count.
#[must_use]
pub fn list_topics(store: &TripleStore) -> Vec<TopicSummary> {
    let topic_type: Term = vocab::topic_class().into();
    let mut seen = BTreeSet::new();
    let mut topics = Vec::new();

    for st in store.matching(None, Some(&vocab::rdf_type()), Some(&topic_type)) {
        let slug = st.subject.local_name().to_string();
        if !seen.insert(slug.clone()) {
            continue;
        }
        let tagged: Term = st.subject.clone().into();
        let paper_count = store
            .matching(None, Some(&vocab::research_topic()), Some(&tagged))
            .len();
        topics.push(TopicSummary {
            name: vocab::topic_display_name(&slug),
            slug,
            paper_count,
        });
    }
    topics
}

/// Every author with their referencing-paper count.
#[must_use]
pub fn list_authors(store: &TripleStore) -> Vec<AuthorSummary> {
    let author_type: Term = vocab::author_class().into();
    let mut seen = BTreeSet::new();
    let mut authors = Vec::new();

    for st in store.matching(None, Some(&vocab::rdf_type()), Some(&author_type)) {
        let resolved = resolve_author(store, &st.subject);
        if !seen.insert(resolved.username.clone()) {
            continue;
        }
        let person: Term = st.subject.clone().into();
        let paper_count = store
            .matching(None, Some(&vocab::has_author()), Some(&person))
            .len();
        authors.push(AuthorSummary {
            username: resolved.username,
            first_name: resolved.first_name,
            last_name: resolved.last_name,
            paper_count,
        });
    }
    authors
}

/// Full paper listing joined with authors and topics.
///
/// The sort is stable: ties preserve original encounter order. Date sort
/// treats missing or unparsable dates as the earliest possible value; title
/// sort compares Unicode-lowercased titles.
#[must_use]
pub fn list_papers(store: &TripleStore, options: ListOptions) -> Vec<PaperListing> {
    let paper_type: Term = vocab::paper_class().into();
    let mut seen = BTreeSet::new();
    let mut papers = Vec::new();

    for st in store.matching(None, Some(&vocab::rdf_type()), Some(&paper_type)) {
        let Some(id) = vocab::paper_id(&st.subject) else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }

        let authors = store
            .matching(Some(&st.subject), Some(&vocab::has_author()), None)
            .iter()
            .filter_map(|a| a.object.as_iri())
            .map(|person| resolve_author(store, person))
            .collect();
        let topics = store
            .matching(Some(&st.subject), Some(&vocab::research_topic()), None)
            .iter()
            .filter_map(|t| t.object.as_iri())
            .map(|topic| vocab::topic_display_name(topic.local_name()))
            .collect();

        papers.push(PaperListing {
            id,
            title: paper_title(store, id),
            publication_date: store
                .first_value(&st.subject, &vocab::publication_date())
                .map(|t| t.lexical().to_string()),
            authors,
            topics,
        });
    }

    match (options.sort_by, options.descending) {
        (SortField::Date, false) => papers.sort_by(|a, b| date_key(a).cmp(&date_key(b))),
        (SortField::Date, true) => papers.sort_by(|a, b| date_key(b).cmp(&date_key(a))),
        (SortField::Title, false) => papers.sort_by(|a, b| title_key(a).cmp(&title_key(b))),
        (SortField::Title, true) => papers.sort_by(|a, b| title_key(b).cmp(&title_key(a))),
    }
    papers
}

/// Papers tagged with the given topic id (presentation facade query).
#[must_use]
pub fn papers_for_topic(store: &TripleStore, topic_id: &str) -> Vec<TopicPaper> {
    let topic: Term = vocab::topic_iri(topic_id).into();
    let mut seen = BTreeSet::new();
    let mut papers = Vec::new();

    for st in store.matching(None, Some(&vocab::research_topic()), Some(&topic)) {
        let Some(id) = vocab::paper_id(&st.subject) else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        papers.push(TopicPaper {
            id,
            title: paper_title(store, id),
            publication_date: store
                .first_value(&st.subject, &vocab::publication_date())
                .map(|t| t.lexical().to_string()),
        });
    }
    papers
}

// =============================================================================
// HELPERS
// =============================================================================

fn paper_title(store: &TripleStore, id: u64) -> Option<String> {
    store
        .first_value(&vocab::paper_iri(id), &vocab::has_title())
        .map(|t| t.lexical().to_string())
}

fn date_key(paper: &PaperListing) -> NaiveDate {
    paper
        .publication_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or(NaiveDate::MIN)
}

fn title_key(paper: &PaperListing) -> String {
    paper.title.as_deref().unwrap_or_default().to_lowercase()
}

// =============================================================================
// TESTS
// =============================================================================
