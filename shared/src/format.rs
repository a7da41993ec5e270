//! Pure presentation helpers over raw post records.
//!
//! Every helper is total: missing embeds resolve to documented defaults.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};

use crate::Post;

/// Author shown when the post embeds none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";
/// Category label shown when the post embeds no terms.
pub const DEFAULT_CATEGORY: &str = "General";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#?[A-Za-z0-9]+;").expect("static regex"));

// Deliberately narrow: anything outside this table is left as written.
const ENTITIES: [(&str, &str); 13] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#039;", "'"),
    ("&#39;", "'"),
    ("&nbsp;", " "),
    ("&#8216;", "'"),
    ("&#8217;", "'"),
    ("&#8220;", "\""),
    ("&#8221;", "\""),
    ("&#8211;", "–"),
    ("&#8212;", "—"),
];

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Source URL of the first embedded featured media record.
pub fn featured_image(post: &Post) -> Option<&str> {
    post.embedded
        .as_ref()?
        .featured_media
        .first()?
        .source_url
        .as_deref()
        .filter(|url| !url.is_empty())
}

/// Display name of the first embedded author.
pub fn author_name(post: &Post) -> &str {
    post.embedded
        .as_ref()
        .and_then(|embedded| embedded.author.first())
        .and_then(|author| author.name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
}

/// Name of the first embedded term.
pub fn category_label(post: &Post) -> &str {
    first_term(post)
        .map(|term| term.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Id of the first embedded term, used to look up related posts.
pub fn primary_category_id(post: &Post) -> Option<u64> {
    first_term(post).map(|term| term.id).filter(|id| *id != 0)
}

fn first_term(post: &Post) -> Option<&crate::Term> {
    post.embedded.as_ref()?.terms.first()?.first()
}

/// Calendar date with the month spelled out, no weekday.
///
/// `es` (or no locale) renders `15 de marzo de 2024`; any other locale
/// renders `March 15, 2024`. Input that is not a recognizable date is
/// returned unchanged.
pub fn format_date(date: &str, locale: &str) -> String {
    let Some(parsed) = parse_date(date) else {
        return date.to_string();
    };
    let month = parsed.month0() as usize;
    let locale = locale.trim();
    if locale.is_empty() || locale.eq_ignore_ascii_case("es") {
        format!("{} de {} de {}", parsed.day(), MONTHS_ES[month], parsed.year())
    } else {
        format!("{} {}, {}", MONTHS_EN[month], parsed.day(), parsed.year())
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.date_naive());
    }
    if let Ok(value) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(value.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Strip markup, decode the fixed entity table, trim.
pub fn clean_html(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, "");
    let decoded = ENTITY_RE.replace_all(&stripped, |caps: &Captures<'_>| {
        let entity = &caps[0];
        ENTITIES
            .iter()
            .find(|(name, _)| *name == entity)
            .map(|(_, text)| (*text).to_string())
            .unwrap_or_else(|| entity.to_string())
    });
    decoded.trim().to_string()
}

/// Cleaned excerpt cut to `max_chars` characters.
pub fn excerpt_text(post: &Post, max_chars: usize) -> String {
    let text = clean_html(&post.excerpt.rendered);
    if text.chars().count() <= max_chars {
        return text;
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}…", truncated.trim_end())
}
