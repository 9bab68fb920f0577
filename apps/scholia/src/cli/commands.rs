//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::anchor::{self, VerifyOutcome};
use crate::config::Config;
use crate::service;
use scholia_core::{
    AuthorRef, ListOptions, NewAuthor, NewPaper, Repository, ScholiaError, SortField, TripleStore,
    list_authors, list_papers, list_topics, paper_citations, related_papers, topic_experts, turtle,
};

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize an empty graph file.
pub fn cmd_init(config: &Config, force: bool) -> Result<(), ScholiaError> {
    if config.graph_path.exists() && !force {
        return Err(ScholiaError::Conflict(
            "Graph file already exists. Use --force to overwrite.".to_string(),
        ));
    }

    turtle::save(&TripleStore::new(), &config.graph_path)?;
    println!("Initialized empty graph at {:?}", config.graph_path);
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show graph status.
pub fn cmd_status(config: &Config, json_mode: bool) -> Result<(), ScholiaError> {
    let repo = open_repo(config)?;
    let store = repo.store();

    let paper_count = list_papers(store, ListOptions::default()).len();
    let author_count = list_authors(store).len();
    let topic_count = list_topics(store).len();

    if json_mode {
        let output = serde_json::json!({
            "graph": config.graph_path.to_string_lossy(),
            "statements": store.len(),
            "papers": paper_count,
            "authors": author_count,
            "topics": topic_count,
            "next_paper_id": repo.next_paper_id(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Scholia Graph Status");
    println!("====================");
    println!("Graph: {:?}", config.graph_path);
    println!();
    println!("Statements: {}", store.len());
    println!("Papers:     {}", paper_count);
    println!("Authors:    {}", author_count);
    println!("Topics:     {}", topic_count);

    Ok(())
}

// =============================================================================
// MUTATION COMMANDS
// =============================================================================

/// Register an author.
pub fn cmd_add_author(
    config: &Config,
    json_mode: bool,
    username: String,
    first_name: String,
    last_name: String,
    institution: String,
) -> Result<(), ScholiaError> {
    let mut repo = open_repo(config)?;
    let author = repo.create_author(NewAuthor {
        username,
        first_name,
        last_name,
        institution,
    })?;

    tracing::info!("Created author {}", author.username);
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&author).unwrap_or_default()
        );
    } else {
        println!(
            "Created author {} ({} {}, {})",
            author.username, author.first_name, author.last_name, author.institution
        );
    }
    Ok(())
}

/// Register a paper.
pub fn cmd_add_paper(
    config: &Config,
    json_mode: bool,
    title: String,
    authors: Vec<String>,
    topics: Vec<String>,
    date: Option<String>,
    cites: Vec<u64>,
) -> Result<(), ScholiaError> {
    let mut repo = open_repo(config)?;
    let paper = repo.create_paper(NewPaper {
        title,
        author_usernames: authors,
        topics,
        publication_date: date,
        citations: cites,
    })?;

    tracing::info!("Created paper {}", paper.id);
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&paper).unwrap_or_default()
        );
    } else {
        println!("Created paper {}: {}", paper.id, paper.title);
    }
    Ok(())
}

// =============================================================================
// LOOKUP COMMANDS
// =============================================================================

/// Show the full details of one paper.
pub fn cmd_paper(config: &Config, json_mode: bool, id: u64) -> Result<(), ScholiaError> {
    let repo = open_repo(config)?;
    let details = repo.paper_details(id)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&details).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Paper {}", details.id);
    println!("  Title:   {}", details.title.as_deref().unwrap_or("(none)"));
    println!(
        "  Date:    {}",
        details.publication_date.as_deref().unwrap_or("(none)")
    );
    println!("  Authors:");
    for author in &details.authors {
        println!("    {}", display_author(author));
    }
    println!("  Topics:  {}", details.topics.join(", "));
    if details.citations.is_empty() {
        println!("  Cites:   (none)");
    } else {
        let cited: Vec<String> = details.citations.iter().map(|c| c.to_string()).collect();
        println!("  Cites:   {}", cited.join(", "));
    }
    Ok(())
}

/// List every topic.
pub fn cmd_topics(config: &Config, json_mode: bool) -> Result<(), ScholiaError> {
    let topics = service::topics(config)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&topics).unwrap_or_default()
        );
        return Ok(());
    }

    if topics.is_empty() {
        println!("No topics in the graph");
        return Ok(());
    }
    for topic in &topics {
        println!("{} [{}] ({} papers)", topic.name, topic.id, topic.paper_count);
    }
    Ok(())
}

/// List the papers filed under a topic.
pub fn cmd_topic_papers(config: &Config, json_mode: bool, topic: &str) -> Result<(), ScholiaError> {
    let papers = service::topic_papers(config, &scholia_core::vocab::topic_slug(topic))?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&papers).unwrap_or_default()
        );
        return Ok(());
    }

    if papers.is_empty() {
        println!("No papers filed under {}", topic);
        return Ok(());
    }
    for paper in &papers {
        println!(
            "{}: {} ({})",
            paper.id,
            paper.title.as_deref().unwrap_or("(untitled)"),
            paper.publication_date.as_deref().unwrap_or("undated"),
        );
    }
    Ok(())
}

/// List every author with their paper count.
pub fn cmd_authors(config: &Config, json_mode: bool) -> Result<(), ScholiaError> {
    let repo = open_repo(config)?;
    let authors = list_authors(repo.store());

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&authors).unwrap_or_default()
        );
        return Ok(());
    }

    if authors.is_empty() {
        println!("No authors in the graph");
        return Ok(());
    }
    for author in &authors {
        let name = match (&author.first_name, &author.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => "(unnamed)".to_string(),
        };
        println!(
            "{} ({}) - {} papers",
            author.username, name, author.paper_count
        );
    }
    Ok(())
}

/// List every paper.
pub fn cmd_papers(
    config: &Config,
    json_mode: bool,
    sort: &str,
    ascending: bool,
) -> Result<(), ScholiaError> {
    let sort_by = match sort {
        "date" => SortField::Date,
        "title" => SortField::Title,
        _ => {
            return Err(ScholiaError::Validation(format!(
                "Unknown sort field: {}. Use: date, title",
                sort
            )));
        }
    };

    let repo = open_repo(config)?;
    let papers = list_papers(
        repo.store(),
        ListOptions {
            sort_by,
            descending: !ascending,
        },
    );

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&papers).unwrap_or_default()
        );
        return Ok(());
    }

    if papers.is_empty() {
        println!("No papers in the graph");
        return Ok(());
    }
    for paper in &papers {
        let authors: Vec<String> = paper.authors.iter().map(display_author).collect();
        println!(
            "{}: {} ({}) by {} [{}]",
            paper.id,
            paper.title.as_deref().unwrap_or("(untitled)"),
            paper.publication_date.as_deref().unwrap_or("undated"),
            authors.join(", "),
            paper.topics.join(", "),
        );
    }
    Ok(())
}

// =============================================================================
// REASONER COMMANDS
// =============================================================================

/// Find the authors who published on a topic.
pub fn cmd_experts(config: &Config, json_mode: bool, topic: &str) -> Result<(), ScholiaError> {
    let repo = open_repo(config)?;
    let experts = topic_experts(repo.store(), topic);

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&experts).unwrap_or_default()
        );
        return Ok(());
    }

    if experts.is_empty() {
        println!("No experts found for {}", topic);
        return Ok(());
    }
    println!("Experts on {}:", topic);
    for expert in &experts {
        println!("  {}", display_author(expert));
    }
    Ok(())
}

/// Find the papers citing a paper.
pub fn cmd_citations(config: &Config, json_mode: bool, id: u64) -> Result<(), ScholiaError> {
    let repo = open_repo(config)?;
    let citing = paper_citations(repo.store(), id);

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&citing).unwrap_or_default()
        );
        return Ok(());
    }

    if citing.is_empty() {
        println!("No papers cite paper {}", id);
        return Ok(());
    }
    println!("Papers citing {}:", id);
    for paper in &citing {
        println!(
            "  {}: {}",
            paper.id,
            paper.title.as_deref().unwrap_or("(untitled)")
        );
    }
    Ok(())
}

/// Find papers sharing a topic with a paper.
pub fn cmd_related(config: &Config, json_mode: bool, id: u64) -> Result<(), ScholiaError> {
    let repo = open_repo(config)?;
    let related = related_papers(repo.store(), id);

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&related).unwrap_or_default()
        );
        return Ok(());
    }

    if related.is_empty() {
        println!("No papers related to paper {}", id);
        return Ok(());
    }
    println!("Papers related to {}:", id);
    for paper in &related {
        println!(
            "  {}: {}",
            paper.id,
            paper.title.as_deref().unwrap_or("(untitled)")
        );
    }
    Ok(())
}

// =============================================================================
// INTEGRITY COMMANDS
// =============================================================================

/// Record a BLAKE3 hash of the graph file.
pub fn cmd_anchor(config: &Config, json_mode: bool) -> Result<(), ScholiaError> {
    let record = anchor::anchor_graph(&config.graph_path, &config.anchor_path)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Anchored {:?}", config.graph_path);
    println!("  Hash: {}", record.hash);
    println!("  At:   {}", record.anchored_at);
    Ok(())
}

/// Check the graph file against the latest anchor.
pub fn cmd_verify(config: &Config, json_mode: bool) -> Result<(), ScholiaError> {
    let outcome = service::verify_graph(config);

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).unwrap_or_default()
        );
        return Ok(());
    }

    match outcome {
        VerifyOutcome::Report {
            is_valid,
            stored_hash,
            current_hash,
        } => {
            if is_valid {
                println!("Graph integrity VERIFIED");
                println!("  Hash: {}", current_hash);
            } else {
                println!("Graph integrity FAILED");
                println!("  Stored:  {}", stored_hash);
                println!("  Current: {}", current_hash);
            }
        }
        VerifyOutcome::Failure { error } => {
            println!("Verification unavailable: {}", error);
        }
    }
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open the repository at the configured graph path.
fn open_repo(config: &Config) -> Result<Repository, ScholiaError> {
    Repository::open(&config.graph_path)
}

/// Render an author reference as `First Last (username)`.
fn display_author(author: &AuthorRef) -> String {
    match (&author.first_name, &author.last_name) {
        (Some(first), Some(last)) => format!("{} {} ({})", first, last, author.username),
        (Some(first), None) => format!("{} ({})", first, author.username),
        (None, Some(last)) => format!("{} ({})", last, author.username),
        (None, None) => author.username.clone(),
    }
}
