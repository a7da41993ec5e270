pub mod categories;
pub mod posts;
pub mod rates;
pub mod sitemap;

use anyhow::{Context, Result};
use pressroom_shared::WordPressClient;
use pr_cli::output;
use serde::Serialize;

use crate::cli::{Cli, Commands, OutputFormat};

pub async fn run(cli: Cli) -> Result<()> {
    let format = cli.format;
    match cli.command {
        Commands::Posts {
            lang,
            categories,
            search,
            sort,
            page,
            per_page,
        } => {
            let client = connect(&cli.api_url)?;
            let request = posts::ListRequest {
                lang,
                categories,
                search: search.unwrap_or_default(),
                sort: sort.parse().map_err(anyhow::Error::msg)?,
                page,
                per_page,
            };
            posts::list(&client, request, format).await
        },
        Commands::Post {
            slug,
            lang,
        } => posts::show(&connect(&cli.api_url)?, &slug, lang.as_deref(), format).await,
        Commands::Categories {
            lang,
        } => categories::run(&connect(&cli.api_url)?, lang.as_deref(), format).await,
        Commands::Slugs => {
            let slugs = connect(&cli.api_url)?.try_all_post_slugs().await?;
            print(&slugs, format)
        },
        Commands::Sitemap {
            base_url,
            out_dir,
        } => sitemap::run(&connect(&cli.api_url)?, &base_url, out_dir.as_deref()).await,
        Commands::Rates {
            url,
            timeout_ms,
        } => rates::run(&url, timeout_ms, format).await,
    }
}

fn connect(api_url: &str) -> Result<WordPressClient> {
    WordPressClient::new(api_url).with_context(|| format!("invalid WordPress API url {api_url}"))
}

fn locale(lang: Option<&str>) -> &str {
    lang.filter(|lang| !lang.is_empty()).unwrap_or("es")
}

fn print<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => output::to_json(value)?,
        OutputFormat::Vertical => output::to_vertical(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
