use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pressroom_shared::{
    exchange_rate::{DEFAULT_EXCHANGE_RATE_API_URL, DEFAULT_EXCHANGE_RATE_TIMEOUT_MS},
    query::DEFAULT_PER_PAGE,
    wordpress::DEFAULT_WORDPRESS_API_URL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Vertical,
}

#[derive(Parser)]
#[command(name = "pr-cli", version, about = "Pressroom WordPress content CLI")]
pub struct Cli {
    /// WordPress REST base (`.../wp-json/wp/v2`).
    #[arg(long, global = true, env = "WORDPRESS_API_URL", default_value = DEFAULT_WORDPRESS_API_URL)]
    pub api_url: String,
    /// Output format (`json` or `vertical`).
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json, ignore_case = true)]
    pub format: OutputFormat,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List post cards with the news page filters.
    Posts {
        /// Two-letter language code; enables language reconciliation.
        #[arg(long)]
        lang: Option<String>,
        /// Comma-separated category slugs.
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
        /// Free-text search.
        #[arg(long, short = 'q')]
        search: Option<String>,
        /// `date`, `title-asc` or `title-desc`.
        #[arg(long, default_value = "date")]
        sort: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,
    },
    /// Show one post by slug.
    Post {
        slug: String,
        #[arg(long)]
        lang: Option<String>,
    },
    /// List category chips, most used first.
    Categories {
        #[arg(long)]
        lang: Option<String>,
    },
    /// Print every published post slug.
    Slugs,
    /// Render `sitemap.xml` and `robots.txt`.
    Sitemap {
        /// Public site origin.
        #[arg(long, env = "SITE_BASE_URL", default_value = "https://galileocapital.io")]
        base_url: String,
        /// Directory to write both files into; stdout when omitted.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Fetch the current CRC/USD exchange rates.
    Rates {
        #[arg(long, env = "EXCHANGE_RATE_API_URL", default_value = DEFAULT_EXCHANGE_RATE_API_URL)]
        url: String,
        #[arg(long, default_value_t = DEFAULT_EXCHANGE_RATE_TIMEOUT_MS)]
        timeout_ms: u64,
    },
}
