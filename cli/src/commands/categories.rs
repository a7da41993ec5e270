use anyhow::Result;
use pressroom_shared::{CategoryCatalog, WordPressClient};

use super::print;
use crate::cli::OutputFormat;

pub async fn run(client: &WordPressClient, lang: Option<&str>, format: OutputFormat) -> Result<()> {
    let catalog = CategoryCatalog::new(client.try_categories(lang).await?);
    print(&catalog.chips(), format)
}
