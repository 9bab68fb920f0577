//! # Browsing Service
//!
//! The presentation facade the CLI's browsing commands go through: topics
//! with their identifiers, the papers filed under a topic, and anchor
//! verification. Each call opens the repository fresh from the configured
//! graph file, so results always reflect the current on-disk state.

use crate::anchor::{self, VerifyOutcome};
use crate::config::Config;
use scholia_core::{Repository, ScholiaError, TopicPaper, papers_for_topic};

/// A topic as presented to the browsing UI: stable id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TopicEntry {
    pub id: String,
    pub name: String,
    pub paper_count: usize,
}

/// All topics in the graph, id (slug), display name, and paper count.
pub fn topics(config: &Config) -> Result<Vec<TopicEntry>, ScholiaError> {
    let repo = Repository::open(&config.graph_path)?;
    Ok(scholia_core::list_topics(repo.store())
        .into_iter()
        .map(|t| TopicEntry {
            id: t.slug,
            name: t.name,
            paper_count: t.paper_count,
        })
        .collect())
}

/// Papers filed under the topic with the given id.
pub fn topic_papers(config: &Config, topic_id: &str) -> Result<Vec<TopicPaper>, ScholiaError> {
    let repo = Repository::open(&config.graph_path)?;
    Ok(papers_for_topic(repo.store(), topic_id))
}

/// Check the graph file against its latest anchor record.
#[must_use]
pub fn verify_graph(config: &Config) -> VerifyOutcome {
    anchor::verify_anchor(&config.graph_path, &config.anchor_path)
}

// =============================================================================
// TESTS
// =============================================================================
