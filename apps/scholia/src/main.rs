//! # Scholia - Research Paper Knowledge Graph
//!
//! The main binary for the Scholia graph substrate.
//!
//! This application provides:
//! - CLI interface for graph operations (authors, papers, topics, queries)
//! - A topic-browsing facade over the reasoner
//! - Graph integrity anchoring and verification
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/scholia (THE BINARY)              │
//! │                                                       │
//! │  ┌──────────┐   ┌───────────┐   ┌─────────────────┐  │
//! │  │   CLI    │   │  Service  │   │ Anchor/Verify   │  │
//! │  │  (clap)  │   │  facade   │   │    (blake3)     │  │
//! │  └────┬─────┘   └─────┬─────┘   └────────┬────────┘  │
//! │       │               │                  │           │
//! │       └───────────────┼──────────────────┘           │
//! │                       ▼                              │
//! │               ┌───────────────┐                      │
//! │               │ scholia-core  │                      │
//! │               │  (THE LOGIC)  │                      │
//! │               └───────────────┘                      │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! scholia add-author -u bschack -f Ben -l Schack -i Lehigh
//! scholia add-paper -t "Basic ML" -a bschack -T "Machine Learning"
//! scholia papers --sort date
//! scholia experts "Machine Learning"
//! scholia anchor && scholia verify
//! ```

mod anchor;
mod cli;
mod config;
mod service;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments first; --verbose feeds the default log filter.
    let cli = cli::Cli::parse();

    // Initialize tracing — SCHOLIA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SCHOLIA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "scholia=debug"
    } else {
        "scholia=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Scholia startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗ ██████╗██╗  ██╗ ██████╗ ██╗     ██╗ █████╗
  ██╔════╝██╔════╝██║  ██║██╔═══██╗██║     ██║██╔══██╗
  ███████╗██║     ███████║██║   ██║██║     ██║███████║
  ╚════██║██║     ██╔══██║██║   ██║██║     ██║██╔══██║
  ███████║╚██████╗██║  ██║╚██████╔╝███████╗██║██║  ██║
  ╚══════╝ ╚═════╝╚═╝  ╚═╝ ╚═════╝ ╚══════╝╚═╝╚═╝  ╚═╝

  Research Paper Knowledge Graph v{}

  Append-only • Grounded • Verifiable
"#,
        env!("CARGO_PKG_VERSION")
    );
}
