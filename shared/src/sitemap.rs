//! `sitemap.xml` and `robots.txt` documents.

use crate::listing::{detail_path, LISTING_PATH};

/// A sitemap entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Site path, starting with `/`.
    pub path: String,
    /// `<changefreq>` hint.
    pub changefreq: &'static str,
    /// `<priority>` hint.
    pub priority: &'static str,
}

impl SitemapEntry {
    fn new(path: impl Into<String>, changefreq: &'static str, priority: &'static str) -> Self {
        Self {
            path: path.into(),
            changefreq,
            priority,
        }
    }
}

/// Static pages followed by one entry per post slug.
pub fn sitemap_entries(slugs: &[String]) -> Vec<SitemapEntry> {
    let mut entries = vec![
        SitemapEntry::new("/", "daily", "1.0"),
        SitemapEntry::new(LISTING_PATH, "daily", "0.9"),
    ];
    entries.extend(
        slugs
            .iter()
            .filter(|slug| !slug.trim().is_empty())
            .map(|slug| SitemapEntry::new(detail_path(slug), "weekly", "0.8")),
    );
    entries
}

/// Render the urlset for `base_url` (no trailing slash expected).
pub fn render_sitemap(base_url: &str, slugs: &[String]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset \
         xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for entry in sitemap_entries(slugs) {
        let loc = if entry.path == "/" {
            base.to_string()
        } else {
            format!("{base}{}", entry.path)
        };
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <changefreq>{}</changefreq>\n    \
             <priority>{}</priority>\n  </url>\n",
            xml_escape(&loc),
            entry.changefreq,
            entry.priority,
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Allow-all robots file naming the host and the sitemap.
pub fn render_robots(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let host = base.split_once("://").map_or(base, |(_, rest)| rest);
    format!("User-agent: *\nAllow: /\n\nHost: {host}\nSitemap: {base}/sitemap.xml\n")
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_pages_come_first() {
        let xml = render_sitemap("https://galileocapital.io/", &["dolar-hoy".to_string()]);
        let home = xml.find("<loc>https://galileocapital.io</loc>").expect("home");
        let news = xml.find("<loc>https://galileocapital.io/news</loc>").expect("news");
        let post = xml
            .find("<loc>https://galileocapital.io/news/dolar-hoy</loc>")
            .expect("post");
        assert!(home < news && news < post);
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn blank_slugs_are_skipped() {
        let entries = sitemap_entries(&[" ".to_string(), "a".to_string()]);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn robots_points_at_sitemap() {
        let robots = render_robots("https://galileocapital.io");
        assert!(robots.contains("Host: galileocapital.io\n"));
        assert!(robots.ends_with("Sitemap: https://galileocapital.io/sitemap.xml\n"));
    }
}
