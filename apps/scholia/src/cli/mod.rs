//! # Scholia CLI Module
//!
//! This module implements the CLI interface for Scholia.
//!
//! ## Available Commands
//!
//! - `init` - Initialize an empty graph file
//! - `status` - Show graph status
//! - `add-author` - Register an author
//! - `add-paper` - Register a paper
//! - `paper` - Show the full details of one paper
//! - `topics` - List every topic
//! - `topic-papers` - List the papers filed under a topic
//! - `authors` - List every author with their paper count
//! - `papers` - List every paper, sorted by date or title
//! - `experts` - Find the authors who published on a topic
//! - `citations` - Find the papers citing a paper
//! - `related` - Find papers sharing a topic with a paper
//! - `anchor` - Record a BLAKE3 hash of the graph file
//! - `verify` - Check the graph file against the latest anchor

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use scholia_core::ScholiaError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Scholia - Research Paper Knowledge Graph
///
/// An append-only triple store of papers, authors, topics, and citations,
/// with derived queries over the citation and topic graph.
#[derive(Parser, Debug)]
#[command(name = "scholia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short = 'c', long, global = true, default_value = "scholia.toml")]
    pub config: PathBuf,

    /// Path to the graph file (overrides the configuration)
    #[arg(short = 'G', long, global = true)]
    pub graph: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize an empty graph file
    Init {
        /// Force initialization even if the graph file exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show graph status
    Status,

    /// Register an author
    AddAuthor {
        /// Unique username
        #[arg(short, long)]
        username: String,

        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,

        /// Institution name
        #[arg(short, long)]
        institution: String,
    },

    /// Register a paper
    AddPaper {
        /// Paper title
        #[arg(short, long)]
        title: String,

        /// Author usernames (comma-separated, must already exist)
        #[arg(short, long, value_delimiter = ',')]
        authors: Vec<String>,

        /// Topic names (comma-separated, created on first use)
        #[arg(short = 'T', long, value_delimiter = ',')]
        topics: Vec<String>,

        /// Publication date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Ids of cited papers (comma-separated, must already exist)
        #[arg(short = 'C', long, value_delimiter = ',')]
        cites: Vec<u64>,
    },

    /// Show the full details of one paper
    Paper {
        /// Paper id
        id: u64,
    },

    /// List every topic
    Topics,

    /// List the papers filed under a topic
    TopicPapers {
        /// Topic id (slug) or display name
        topic: String,
    },

    /// List every author with their paper count
    Authors,

    /// List every paper
    Papers {
        /// Sort field (date, title)
        #[arg(long, default_value = "date")]
        sort: String,

        /// Sort ascending instead of the default descending
        #[arg(long)]
        ascending: bool,
    },

    /// Find the authors who published on a topic
    Experts {
        /// Topic name or slug
        topic: String,
    },

    /// Find the papers citing a paper
    Citations {
        /// Paper id
        id: u64,
    },

    /// Find papers sharing a topic with a paper
    Related {
        /// Paper id
        id: u64,
    },

    /// Record a BLAKE3 hash of the graph file
    Anchor,

    /// Check the graph file against the latest anchor
    Verify,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ScholiaError> {
    let mut config = Config::load(&cli.config)?;
    if let Some(graph) = cli.graph {
        config.graph_path = graph;
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::AddAuthor {
            username,
            first_name,
            last_name,
            institution,
        }) => cmd_add_author(&config, json_mode, username, first_name, last_name, institution),
        Some(Commands::AddPaper {
            title,
            authors,
            topics,
            date,
            cites,
        }) => cmd_add_paper(&config, json_mode, title, authors, topics, date, cites),
        Some(Commands::Paper { id }) => cmd_paper(&config, json_mode, id),
        Some(Commands::Topics) => cmd_topics(&config, json_mode),
        Some(Commands::TopicPapers { topic }) => cmd_topic_papers(&config, json_mode, &topic),
        Some(Commands::Authors) => cmd_authors(&config, json_mode),
        Some(Commands::Papers { sort, ascending }) => {
            cmd_papers(&config, json_mode, &sort, ascending)
        }
        Some(Commands::Experts { topic }) => cmd_experts(&config, json_mode, &topic),
        Some(Commands::Citations { id }) => cmd_citations(&config, json_mode, id),
        Some(Commands::Related { id }) => cmd_related(&config, json_mode, id),
        Some(Commands::Anchor) => cmd_anchor(&config, json_mode),
        Some(Commands::Verify) => cmd_verify(&config, json_mode),
        None => {
            // No subcommand - show status by default
            cmd_status(&config, json_mode)
        }
    }
}
