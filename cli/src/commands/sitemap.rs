use std::path::Path;

use anyhow::Result;
use pr_cli::output::write_file;
use pressroom_shared::{
    sitemap::{render_robots, render_sitemap},
    WordPressClient,
};

pub async fn run(client: &WordPressClient, base_url: &str, out_dir: Option<&Path>) -> Result<()> {
    let slugs = client.all_post_slugs().await;
    let sitemap = render_sitemap(base_url, &slugs);
    let robots = render_robots(base_url);

    match out_dir {
        Some(dir) => {
            write_file(dir, "sitemap.xml", &sitemap)?;
            write_file(dir, "robots.txt", &robots)?;
            println!("{} urls written to {}", slugs.len() + 2, dir.display());
        },
        None => print!("{sitemap}"),
    }
    Ok(())
}
