//! conneg CLI - Inspect content negotiation decisions
//!
//! Commands:
//! - `conneg accept` - Show how an `Accept` header is ranked
//! - `conneg charset` - Show `Accept-Charset` preferences and the chosen charset
//! - `conneg negotiate` - Show which codec would encode a response
//! - `conneg encode` - Run the encode pipeline on a JSON document

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod accept;
mod charset;
mod encode;
mod negotiate;
mod settings;

#[derive(Parser)]
#[command(name = "conneg")]
#[command(author, version, about = "Inspect HTTP content negotiation", long_about = None)]
struct Cli {
    /// Log negotiation decisions (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the media ranges of an Accept header
    Accept {
        /// Accept header value, e.g. "text/*;q=0.5, application/json"
        header: String,
    },

    /// Resolve an Accept-Charset header against the supported charsets
    Charset {
        /// Accept-Charset header value
        header: String,

        /// Comma-separated charsets to treat as supported (default: every runtime charset)
        #[arg(short, long)]
        supported: Option<String>,
    },

    /// Pick the codec that would encode a response
    Negotiate {
        /// Accept header value
        #[arg(short, long)]
        accept: String,

        /// Comma-separated format names in priority order
        #[arg(short, long)]
        formats: Option<String>,

        /// Path to a TOML or JSON format configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Encode a JSON document the way the encode pipeline would answer
    Encode {
        /// JSON document to encode
        document: String,

        /// Accept header value
        #[arg(short, long, default_value = "*/*")]
        accept: String,

        /// Accept-Charset header value
        #[arg(long)]
        accept_charset: Option<String>,

        /// Comma-separated format names in priority order
        #[arg(short, long)]
        formats: Option<String>,

        /// Path to a TOML or JSON format configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = match cli.command {
        Commands::Accept { header } => accept::run(&header)?,
        Commands::Charset { header, supported } => charset::run(&header, supported.as_deref()),
        Commands::Negotiate {
            accept,
            formats,
            config,
        } => {
            let config = settings::load(config.as_deref(), formats.as_deref())?;
            negotiate::run(&accept, &config)?
        }
        Commands::Encode {
            document,
            accept,
            accept_charset,
            formats,
            config,
        } => {
            let config = settings::load(config.as_deref(), formats.as_deref())?;
            encode::run(&document, &accept, accept_charset.as_deref(), &config)?
        }
    };

    print!("{output}");
    Ok(())
}

/// Log to stderr, filtered by `-v` or else `RUST_LOG` (default `warn`)
fn init_logging(verbose: u8) {
    use tracing_subscriber::prelude::*;

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // Try to set as global default (ignore error if already set)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
