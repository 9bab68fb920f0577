//! # Entity Repository
//!
//! Domain operations over the triple store: create authors, create papers,
//! fetch paper details. The repository owns the store and the path of its
//! backing file; every mutation re-serializes the whole store before
//! returning, so in-memory and on-disk state agree at every call boundary.
//!
//! All validation for a mutating operation completes before any statement is
//! staged. If the persistence step itself fails, the staged statements are
//! rolled back, leaving both memory and disk unchanged.
//!
//! Entities are create-only: the only lifecycle transition is absent →
//! present. There is no update or delete for any entity type.

use crate::store::TripleStore;
use crate::types::{Iri, Literal, ScholiaError, Statement, Term};
use crate::{turtle, vocab};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// =============================================================================
// DOMAIN TYPES
// =============================================================================

/// Input for [`Repository::create_author`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuthor {
    /// Globally unique identity key.
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Institution name; referenced by name only, no independent validation.
    pub institution: String,
}

/// A created author, echoed back from the input (not re-read from the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub institution: String,
}

/// Input for [`Repository::create_paper`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaper {
    pub title: String,
    /// Ordered list of author usernames; every one must already exist.
    pub author_usernames: Vec<String>,
    /// Free-text topic names; normalized to slugs on creation.
    pub topics: Vec<String>,
    /// Optional `YYYY-MM-DD` publication date.
    pub publication_date: Option<String>,
    /// Ids of cited papers; every one must already exist.
    pub citations: Vec<u64>,
}

/// A created paper: the echoed input plus its assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: u64,
    pub title: String,
    pub author_usernames: Vec<String>,
    pub topics: Vec<String>,
    pub publication_date: Option<String>,
    pub citations: Vec<u64>,
}

/// An author reference resolved from the store.
///
/// Name fields are optional because the store may hold author nodes written
/// by other tools that omit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// The aggregate view returned by [`Repository::paper_details`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperDetails {
    pub id: u64,
    pub title: Option<String>,
    pub authors: Vec<AuthorRef>,
    /// Topic display names (slug with underscores restored to spaces).
    pub topics: Vec<String>,
    pub publication_date: Option<String>,
    pub citations: Vec<u64>,
}

// =============================================================================
// REPOSITORY
// =============================================================================

/// The stateful owner of the triple store and its backing file.
///
/// Single-threaded, synchronous-per-call. Callers must never invoke two
/// mutating operations concurrently against the same repository.
#[derive(Debug)]
pub struct Repository {
    store: TripleStore,
    graph_path: PathBuf,
}

impl Repository {
    /// Open the graph at `graph_path`, loading it if the file exists and
    /// starting empty otherwise.
    pub fn open(graph_path: impl Into<PathBuf>) -> Result<Self, ScholiaError> {
        let graph_path = graph_path.into();
        let store = turtle::load(&graph_path)?;
        Ok(Self { store, graph_path })
    }

    /// Read access to the statement set (for the reasoner).
    #[must_use]
    pub fn store(&self) -> &TripleStore {
        &self.store
    }

    /// Path of the backing file (input to the integrity collaborator).
    #[must_use]
    pub fn graph_path(&self) -> &Path {
        &self.graph_path
    }

    // =========================================================================
    // ID ASSIGNMENT
    // =========================================================================

    /// Next paper id: (max existing id) + 1, or 1 if no papers exist.
    ///
    /// Paper identifiers are numeric by contract; subjects with non-numeric
    /// suffixes are out of contract and skipped.
    #[must_use]
    pub fn next_paper_id(&self) -> u64 {
        let paper_type: Term = vocab::paper_class().into();
        self.store
            .matching(None, Some(&vocab::rdf_type()), Some(&paper_type))
            .iter()
            .filter_map(|st| vocab::paper_id(&st.subject))
            .max()
            .map_or(1, |max| max + 1)
    }

    // =========================================================================
    // AUTHOR CREATION
    // =========================================================================

    /// Create an author.
    ///
    /// Fails with `Validation` if any field is empty, `Conflict` if the
    /// username is taken. On success the full store is persisted and the
    /// input is echoed back.
    pub fn create_author(&mut self, author: NewAuthor) -> Result<Author, ScholiaError> {
        let NewAuthor {
            username,
            first_name,
            last_name,
            institution,
        } = author;

        for (field, value) in [
            ("username", &username),
            ("first name", &first_name),
            ("last name", &last_name),
            ("institution", &institution),
        ] {
            if value.trim().is_empty() {
                return Err(ScholiaError::Validation(format!("{field} is required")));
            }
        }

        let username_lit: Term = Literal::plain(username.clone()).into();
        if self
            .store
            .exists(None, Some(&vocab::has_username()), Some(&username_lit))
        {
            return Err(ScholiaError::Conflict(format!(
                "username {username} already exists"
            )));
        }

        let person = vocab::person_iri(&username);
        let institution_node = vocab::institution_iri(&institution);

        let mut staged = vec![
            Statement::new(person.clone(), vocab::rdf_type(), vocab::author_class()),
            Statement::new(
                person.clone(),
                vocab::has_username(),
                Literal::plain(username.clone()),
            ),
            Statement::new(
                person.clone(),
                vocab::first_name(),
                Literal::lang_tagged(first_name.clone(), "en"),
            ),
            Statement::new(
                person.clone(),
                vocab::last_name(),
                Literal::lang_tagged(last_name.clone(), "en"),
            ),
            Statement::new(person, vocab::affiliated_with(), institution_node.clone()),
        ];

        // Institution type assertion is created at most once per name
        let institution_type: Term = vocab::institution_class().into();
        if !self.store.exists(
            Some(&institution_node),
            Some(&vocab::rdf_type()),
            Some(&institution_type),
        ) {
            staged.push(Statement::new(
                institution_node,
                vocab::rdf_type(),
                vocab::institution_class(),
            ));
        }

        self.commit(staged)?;

        Ok(Author {
            username,
            first_name,
            last_name,
            institution,
        })
    }

    // =========================================================================
    // PAPER CREATION
    // =========================================================================

    /// Create a paper.
    ///
    /// Validation order: required fields, then referenced authors, then
    /// cited papers; only after every check passes are statements staged.
    /// Topic nodes are created the first time their normalized slug appears.
    pub fn create_paper(&mut self, paper: NewPaper) -> Result<Paper, ScholiaError> {
        let NewPaper {
            title,
            author_usernames,
            topics,
            publication_date,
            citations,
        } = paper;

        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ScholiaError::Validation("title is required".to_string()));
        }
        if author_usernames.is_empty() {
            return Err(ScholiaError::Validation(
                "at least one author is required".to_string(),
            ));
        }
        if topics.is_empty() {
            return Err(ScholiaError::Validation(
                "at least one topic is required".to_string(),
            ));
        }
        // A blank name would normalize to the empty slug and mint a
        // degenerate Topic/ node
        for topic in &topics {
            if vocab::topic_slug(topic).is_empty() {
                return Err(ScholiaError::Validation(
                    "topic names must not be blank".to_string(),
                ));
            }
        }

        let author_type: Term = vocab::author_class().into();
        for username in &author_usernames {
            let person = vocab::person_iri(username);
            if !self
                .store
                .exists(Some(&person), Some(&vocab::rdf_type()), Some(&author_type))
            {
                return Err(ScholiaError::NotFound(format!("author {username}")));
            }
        }

        let paper_type: Term = vocab::paper_class().into();
        for cited in &citations {
            let cited_iri = vocab::paper_iri(*cited);
            if !self.store.exists(
                Some(&cited_iri),
                Some(&vocab::rdf_type()),
                Some(&paper_type),
            ) {
                return Err(ScholiaError::NotFound(format!("cited paper {cited}")));
            }
        }

        // All validation done; stage every statement before touching the store.
        let id = self.next_paper_id();
        let subject = vocab::paper_iri(id);

        let mut staged = vec![
            Statement::new(subject.clone(), vocab::rdf_type(), vocab::paper_class()),
            Statement::new(
                subject.clone(),
                vocab::has_title(),
                Literal::lang_tagged(title.clone(), "en"),
            ),
        ];

        for username in &author_usernames {
            staged.push(Statement::new(
                subject.clone(),
                vocab::has_author(),
                vocab::person_iri(username),
            ));
        }

        let topic_type: Term = vocab::topic_class().into();
        let mut seen_slugs = BTreeSet::new();
        for topic in &topics {
            let slug = vocab::topic_slug(topic);
            if !seen_slugs.insert(slug.clone()) {
                // Two inputs normalizing to the same slug are one topic
                continue;
            }
            let topic_node = vocab::topic_iri(&slug);
            staged.push(Statement::new(
                subject.clone(),
                vocab::research_topic(),
                topic_node.clone(),
            ));
            if !self.store.exists(
                Some(&topic_node),
                Some(&vocab::rdf_type()),
                Some(&topic_type),
            ) {
                staged.push(Statement::new(
                    topic_node,
                    vocab::rdf_type(),
                    vocab::topic_class(),
                ));
            }
        }

        if let Some(date) = &publication_date {
            staged.push(Statement::new(
                subject.clone(),
                vocab::publication_date(),
                Literal::typed(date.clone(), vocab::xsd_date()),
            ));
        }

        for cited in &citations {
            staged.push(Statement::new(
                subject.clone(),
                vocab::cites(),
                vocab::paper_iri(*cited),
            ));
        }

        self.commit(staged)?;

        Ok(Paper {
            id,
            title,
            author_usernames,
            topics,
            publication_date,
            citations,
        })
    }

    // =========================================================================
    // PAPER LOOKUP
    // =========================================================================

    /// Resolve the aggregate view of a paper.
    pub fn paper_details(&self, id: u64) -> Result<PaperDetails, ScholiaError> {
        let subject = vocab::paper_iri(id);
        let paper_type: Term = vocab::paper_class().into();
        if !self
            .store
            .exists(Some(&subject), Some(&vocab::rdf_type()), Some(&paper_type))
        {
            return Err(ScholiaError::NotFound(format!("paper {id}")));
        }

        let title = self
            .store
            .first_value(&subject, &vocab::has_title())
            .map(|t| t.lexical().to_string());
        let publication_date = self
            .store
            .first_value(&subject, &vocab::publication_date())
            .map(|t| t.lexical().to_string());

        let authors = self
            .store
            .matching(Some(&subject), Some(&vocab::has_author()), None)
            .iter()
            .filter_map(|st| st.object.as_iri())
            .map(|person| resolve_author(&self.store, person))
            .collect();

        let topics = self
            .store
            .matching(Some(&subject), Some(&vocab::research_topic()), None)
            .iter()
            .filter_map(|st| st.object.as_iri())
            .map(|topic| vocab::topic_display_name(topic.local_name()))
            .collect();

        let citations = self
            .store
            .matching(Some(&subject), Some(&vocab::cites()), None)
            .iter()
            .filter_map(|st| st.object.as_iri().and_then(vocab::paper_id))
            .collect();

        Ok(PaperDetails {
            id,
            title,
            authors,
            topics,
            publication_date,
            citations,
        })
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Apply staged statements, then persist the whole store.
    ///
    /// If the save fails the staged statements are rolled back so the
    /// mutation leaves no trace in memory either.
    fn commit(&mut self, staged: Vec<Statement>) -> Result<(), ScholiaError> {
        let mark = self.store.len();
        for statement in staged {
            self.store.add(statement);
        }
        if let Err(e) = turtle::save(&self.store, &self.graph_path) {
            self.store.truncate(mark);
            return Err(e);
        }
        Ok(())
    }
}

/// Resolve username and display names for a person node.
pub(crate) fn resolve_author(store: &TripleStore, person: &Iri) -> AuthorRef {
    let username = store
        .first_value(person, &vocab::has_username())
        .map_or_else(
            || person.local_name().to_string(),
            |t| t.lexical().to_string(),
        );
    let first_name = store
        .first_value(person, &vocab::first_name())
        .map(|t| t.lexical().to_string());
    let last_name = store
        .first_value(person, &vocab::last_name())
        .map(|t| t.lexical().to_string());
    AuthorRef {
        username,
        first_name,
        last_name,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Repository::open(dir.path().join("graph.ttl")).expect("open");
        (dir, repo)
    }

    fn schack() -> NewAuthor {
        NewAuthor {
            username: "bschack".to_string(),
            first_name: "Ben".to_string(),
            last_name: "Schack".to_string(),
            institution: "Lehigh".to_string(),
        }
    }

    fn ml_paper(authors: &[&str]) -> NewPaper {
        NewPaper {
            title: "Basic ML".to_string(),
            author_usernames: authors.iter().map(|s| s.to_string()).collect(),
            topics: vec!["Machine Learning".to_string()],
            publication_date: Some("2022-03-21".to_string()),
            citations: vec![],
        }
    }

    #[test]
    fn create_author_persists_and_echoes() {
        let (_dir, mut repo) = repo();
        let created = repo.create_author(schack()).expect("create");
        assert_eq!(created.username, "bschack");

        // Reload from disk: author statements survive
        let reloaded = Repository::open(repo.graph_path()).expect("reopen");
        let author_type: Term = vocab::author_class().into();
        assert!(reloaded.store().exists(
            Some(&vocab::person_iri("bschack")),
            Some(&vocab::rdf_type()),
            Some(&author_type),
        ));
    }

    #[test]
    fn create_author_rejects_empty_fields() {
        let (_dir, mut repo) = repo();
        let mut author = schack();
        author.institution = "   ".to_string();
        let err = repo.create_author(author).expect_err("must fail");
        assert!(matches!(err, ScholiaError::Validation(_)));
        assert!(repo.store().is_empty());
    }

    #[test]
    fn duplicate_username_conflicts_regardless_of_other_fields() {
        let (_dir, mut repo) = repo();
        repo.create_author(schack()).expect("first");

        let mut other = schack();
        other.first_name = "Bruno".to_string();
        other.institution = "MIT".to_string();
        let err = repo.create_author(other).expect_err("must fail");
        assert!(matches!(err, ScholiaError::Conflict(_)));
    }

    #[test]
    fn institution_type_asserted_once_across_authors() {
        let (_dir, mut repo) = repo();
        repo.create_author(schack()).expect("first");
        let mut second = schack();
        second.username = "jdoe".to_string();
        repo.create_author(second).expect("second");

        let institution_type: Term = vocab::institution_class().into();
        let assertions = repo.store().matching(
            Some(&vocab::institution_iri("Lehigh")),
            Some(&vocab::rdf_type()),
            Some(&institution_type),
        );
        assert_eq!(assertions.len(), 1);
    }

    #[test]
    fn paper_ids_are_monotonic_from_one() {
        let (_dir, mut repo) = repo();
        repo.create_author(schack()).expect("author");

        assert_eq!(repo.next_paper_id(), 1);
        let first = repo.create_paper(ml_paper(&["bschack"])).expect("paper 1");
        assert_eq!(first.id, 1);
        let second = repo.create_paper(ml_paper(&["bschack"])).expect("paper 2");
        assert_eq!(second.id, 2);
    }

    #[test]
    fn create_paper_requires_existing_authors() {
        let (_dir, mut repo) = repo();
        let err = repo
            .create_paper(ml_paper(&["nobody"]))
            .expect_err("must fail");
        assert!(matches!(err, ScholiaError::NotFound(_)));
        // No partial writes on failure
        assert!(repo.store().is_empty());
    }

    #[test]
    fn create_paper_requires_existing_citations() {
        let (_dir, mut repo) = repo();
        repo.create_author(schack()).expect("author");
        let mark = repo.store().len();

        let mut paper = ml_paper(&["bschack"]);
        paper.citations = vec![7];
        let err = repo.create_paper(paper).expect_err("must fail");
        assert!(matches!(err, ScholiaError::NotFound(_)));
        assert_eq!(repo.store().len(), mark);
    }

    #[test]
    fn create_paper_rejects_empty_topic_list() {
        let (_dir, mut repo) = repo();
        repo.create_author(schack()).expect("author");
        let mut paper = ml_paper(&["bschack"]);
        paper.topics.clear();
        let err = repo.create_paper(paper).expect_err("must fail");
        assert!(matches!(err, ScholiaError::Validation(_)));
    }

    #[test]
    fn create_paper_rejects_blank_topic_names() {
        let (_dir, mut repo) = repo();
        repo.create_author(schack()).expect("author");
        let mark = repo.store().len();

        let mut paper = ml_paper(&["bschack"]);
        paper.topics = vec!["   ".to_string()];
        let err = repo.create_paper(paper).expect_err("must fail");
        assert!(matches!(err, ScholiaError::Validation(_)));
        assert_eq!(repo.store().len(), mark);
        assert!(!repo.store().exists(
            Some(&vocab::topic_iri("")),
            Some(&vocab::rdf_type()),
            None
        ));
    }

    #[test]
    fn author_with_reserved_iri_characters_survives_reload() {
        let (_dir, mut repo) = repo();
        let mut author = schack();
        author.institution = "Lehigh > CS Dept".to_string();
        repo.create_author(author).expect("create");

        // The backing file must stay parseable with '>' in the entity IRI
        let reloaded = Repository::open(repo.graph_path()).expect("reopen");
        assert_eq!(reloaded.store().len(), repo.store().len());

        let institution_type: Term = vocab::institution_class().into();
        assert!(reloaded.store().exists(
            Some(&vocab::institution_iri("Lehigh > CS Dept")),
            Some(&vocab::rdf_type()),
            Some(&institution_type),
        ));
    }

    #[test]
    fn topic_type_asserted_once_per_slug() {
        let (_dir, mut repo) = repo();
        repo.create_author(schack()).expect("author");
        repo.create_paper(ml_paper(&["bschack"])).expect("first");

        let mut second = ml_paper(&["bschack"]);
        // Differently spaced input normalizing to the same slug
        second.topics = vec!["  Machine   Learning ".to_string()];
        repo.create_paper(second).expect("second");

        let topic_type: Term = vocab::topic_class().into();
        let assertions = repo.store().matching(
            Some(&vocab::topic_iri("Machine_Learning")),
            Some(&vocab::rdf_type()),
            Some(&topic_type),
        );
        assert_eq!(assertions.len(), 1);
    }

    #[test]
    fn paper_details_resolves_full_view() {
        let (_dir, mut repo) = repo();
        repo.create_author(schack()).expect("author");
        repo.create_paper(ml_paper(&["bschack"])).expect("paper 1");

        let mut citing = ml_paper(&["bschack"]);
        citing.title = "Advanced ML".to_string();
        citing.citations = vec![1];
        repo.create_paper(citing).expect("paper 2");

        let details = repo.paper_details(2).expect("details");
        assert_eq!(details.title.as_deref(), Some("Advanced ML"));
        assert_eq!(details.citations, vec![1]);
        assert_eq!(details.topics, vec!["Machine Learning"]);
        assert_eq!(details.authors.len(), 1);
        assert_eq!(details.authors[0].username, "bschack");
        assert_eq!(details.authors[0].first_name.as_deref(), Some("Ben"));
    }

    #[test]
    fn paper_details_missing_paper_not_found() {
        let (_dir, repo) = repo();
        let err = repo.paper_details(99).expect_err("must fail");
        assert!(matches!(err, ScholiaError::NotFound(_)));
    }
}
