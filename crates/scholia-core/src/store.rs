//! # Triple Store
//!
//! The in-memory statement set with pattern-match primitives.
//!
//! Statements live in an insertion-ordered log; two `BTreeMap` indexes
//! (by subject, by predicate+object) give amortized O(log n) lookups for any
//! query that binds at least one of those fields. Every query the higher
//! layers issue binds at least one field, so the linear fallback only serves
//! fully-wildcard scans.
//!
//! There is no duplicate suppression: callers needing "create if absent"
//! semantics must check with [`TripleStore::exists`] first. There is no
//! update or delete; the store is append-only.

use crate::types::{Iri, Statement, Term};
use std::collections::BTreeMap;

// =============================================================================
// TRIPLE STORE
// =============================================================================

/// The statement set.
///
/// Not internally locked: correctness relies on the caller never invoking two
/// mutating operations concurrently against the same store instance.
#[derive(Debug, Clone, Default)]
pub struct TripleStore {
    /// All statements in insertion order.
    statements: Vec<Statement>,

    /// Positions of statements with a given subject.
    by_subject: BTreeMap<Iri, Vec<usize>>,

    /// Positions of statements with a given (predicate, object) pair.
    by_predicate_object: BTreeMap<(Iri, Term), Vec<usize>>,
}

impl TripleStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement.
    ///
    /// Duplicates are stored as-is; the store never suppresses them.
    pub fn add(&mut self, statement: Statement) {
        let pos = self.statements.len();
        self.by_subject
            .entry(statement.subject.clone())
            .or_default()
            .push(pos);
        self.by_predicate_object
            .entry((statement.predicate.clone(), statement.object.clone()))
            .or_default()
            .push(pos);
        self.statements.push(statement);
    }

    /// All statements whose non-wildcard fields equal the given values.
    ///
    /// `None` fields match anything. Equality is exact value equality, never
    /// subsumption or inference. Results come back in insertion order.
    #[must_use]
    pub fn matching(
        &self,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<&Statement> {
        self.positions(subject, predicate, object)
            .into_iter()
            .map(|pos| &self.statements[pos])
            .collect()
    }

    /// The object of the first statement matching (subject, predicate).
    #[must_use]
    pub fn first_value(&self, subject: &Iri, predicate: &Iri) -> Option<&Term> {
        let positions = self.by_subject.get(subject)?;
        positions
            .iter()
            .map(|&pos| &self.statements[pos])
            .find(|st| &st.predicate == predicate)
            .map(|st| &st.object)
    }

    /// Whether any statement matches the pattern.
    ///
    /// Equivalent to `!matching(..).is_empty()` without materializing the
    /// full result set.
    #[must_use]
    pub fn exists(
        &self,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> bool {
        !self.positions(subject, predicate, object).is_empty()
    }

    /// Total statement count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the store holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// All statements in insertion order (serialization boundary).
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Roll the store back to a prior statement count.
    ///
    /// Used by the repository when a persistence step fails after statements
    /// were staged in memory: the mutation must leave both memory and disk
    /// unchanged on error. Not exposed outside the crate; the public surface
    /// is append-only.
    pub(crate) fn truncate(&mut self, len: usize) {
        if len >= self.statements.len() {
            return;
        }
        self.statements.truncate(len);
        self.by_subject.retain(|_, positions| {
            positions.retain(|&pos| pos < len);
            !positions.is_empty()
        });
        self.by_predicate_object.retain(|_, positions| {
            positions.retain(|&pos| pos < len);
            !positions.is_empty()
        });
    }

    /// Candidate positions for a pattern, narrowed through the indexes.
    ///
    /// Binding (predicate, object) uses the pair index; binding the subject
    /// uses the subject index; anything else falls back to a linear scan.
    fn positions(
        &self,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<usize> {
        if let (Some(p), Some(o)) = (predicate, object) {
            let key = (p.clone(), o.clone());
            return self
                .by_predicate_object
                .get(&key)
                .into_iter()
                .flatten()
                .copied()
                .filter(|&pos| subject.is_none_or(|s| &self.statements[pos].subject == s))
                .collect();
        }

        if let Some(s) = subject {
            return self
                .by_subject
                .get(s)
                .into_iter()
                .flatten()
                .copied()
                .filter(|&pos| {
                    let st = &self.statements[pos];
                    predicate.is_none_or(|p| &st.predicate == p)
                        && object.is_none_or(|o| &st.object == o)
                })
                .collect();
        }

        // Fully or near-fully wildcard: linear scan.
        self.statements
            .iter()
            .enumerate()
            .filter(|(_, st)| {
                predicate.is_none_or(|p| &st.predicate == p)
                    && object.is_none_or(|o| &st.object == o)
            })
            .map(|(pos, _)| pos)
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
