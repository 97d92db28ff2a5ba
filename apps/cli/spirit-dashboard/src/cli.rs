use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spiritual dashboard client: health, readings and guidance from the command line.
#[derive(Debug, Parser)]
#[command(name = "spirit-dashboard", version, about)]
pub struct Cli {
    /// Log everything down to trace level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding dashboard.toml
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Check service health (all services unless --service is given)
    Health {
        /// Registry key or slug, e.g. TAROT_SERVICE or tarot-reader
        #[arg(long)]
        service: Option<String>,
    },

    /// Probe every service and report connectivity
    Monitor {
        /// Number of probe rounds
        #[arg(long, default_value_t = 1)]
        rounds: u32,

        /// Seconds between rounds
        #[arg(long, default_value_t = 30)]
        interval: u64,

        /// Treat the network as offline (no probes are sent)
        #[arg(long)]
        offline: bool,
    },

    /// List the available language models
    Models,

    /// Draw a tarot reading
    Tarot {
        #[arg(long)]
        question: String,

        #[arg(long, default_value = models::payloads::DEFAULT_SPREAD)]
        spread: String,

        #[arg(long, default_value = models::payloads::DEFAULT_DECK)]
        deck: String,

        /// Serve an offline reading if the service fails
        #[arg(long)]
        fallback: bool,
    },

    /// Generate a birth chart
    Chart {
        /// Birth date, YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Birth time, HH:MM
        #[arg(long)]
        time: String,

        /// Birth place
        #[arg(long)]
        location: String,

        /// Serve an offline chart if the service fails
        #[arg(long)]
        fallback: bool,
    },

    /// Ask the book library a question
    Books {
        #[arg(long)]
        query: String,

        #[arg(long, default_value = models::payloads::DEFAULT_BOOK_CATEGORY)]
        category: String,
    },

    /// Chat with the spiritual guide
    Chat {
        #[arg(long)]
        message: String,
    },

    /// Store an auth token for subsequent requests
    Login {
        #[arg(long)]
        token: String,
    },

    /// Remove the stored auth token
    Logout,

    /// Print the resolved service URLs
    Urls,
}
