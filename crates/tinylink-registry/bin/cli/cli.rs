use clap::{Parser, Subcommand};
use tinylink_telemetry::LogFormat;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const BASE_URL_ENV: &str = "BASE_URL";
pub const LOG_FORMAT_ENV: &str = "TINYLINK_LOG_FORMAT";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Parser)]
#[command(name = "tinylink", about = "Manage short links in a tinylink store")]
pub struct CLI {
    /// Storage location: `file:<path>`, a `sqlite:` URL or a bare path.
    #[arg(long, env = DATABASE_URL_ENV, global = true)]
    pub database_url: Option<String>,

    /// Public base URL that short links are rendered against.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Log rendering: `text` or `json`.
    #[arg(long, env = LOG_FORMAT_ENV, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL, optionally under a chosen code.
    Add {
        target_url: String,
        /// 6-8 letters and digits.
        #[arg(long)]
        code: Option<String>,
    },
    /// Show a link and its click statistics.
    Show { code: String },
    /// List all links, newest first.
    List,
    /// Delete a link.
    Remove { code: String },
    /// Record a redirect and print the target URL.
    Visit { code: String },
}
