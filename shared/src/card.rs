//! Render-ready projections of posts.

use serde::Serialize;

use crate::{
    format::{author_name, category_label, clean_html, excerpt_text, featured_image, format_date},
    listing::detail_path,
    Post,
};

/// Characters kept from the excerpt for meta descriptions.
pub const DESCRIPTION_CHARS: usize = 160;

/// A post as the news grid shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    /// Post id.
    pub id: u64,
    /// Post slug.
    pub slug: String,
    /// Title with markup stripped.
    pub title: String,
    /// Whole excerpt, markup stripped.
    pub excerpt: String,
    /// Featured image; `None` means render a placeholder.
    pub image: Option<String>,
    /// First category name.
    pub category: String,
    /// Author display name.
    pub author: String,
    /// Localized publish date.
    pub date: String,
    /// Site route of the article.
    pub href: String,
}

impl PostCard {
    /// Project `post` using `locale` for the date.
    pub fn from_post(post: &Post, locale: &str) -> Self {
        Self {
            id: post.id,
            slug: post.slug.clone(),
            title: clean_html(&post.title.rendered),
            excerpt: clean_html(&post.excerpt.rendered),
            image: featured_image(post).map(str::to_string),
            category: category_label(post).to_string(),
            author: author_name(post).to_string(),
            date: format_date(&post.date, locale),
            href: detail_path(&post.slug),
        }
    }
}

/// A full article page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetail {
    /// Card fields.
    #[serde(flatten)]
    pub card: PostCard,
    /// Excerpt cut for `<meta name="description">`.
    pub description: String,
    /// Body HTML, passed through as WordPress rendered it.
    pub content_html: String,
    /// Raw publish timestamp for `article:published_time`.
    pub published_at: String,
}

impl PostDetail {
    /// Project `post` using `locale` for the date.
    pub fn from_post(post: &Post, locale: &str) -> Self {
        Self {
            card: PostCard::from_post(post, locale),
            description: excerpt_text(post, DESCRIPTION_CHARS),
            content_html: post.content.rendered.clone(),
            published_at: post.date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rendered;

    #[test]
    fn card_uses_placeholders_for_missing_embeds() {
        let post = Post {
            id: 12,
            slug: "tipo-de-cambio".to_string(),
            title: Rendered {
                rendered: "Tipo de cambio &#8211; <em>hoy</em>".to_string(),
            },
            excerpt: Rendered {
                rendered: "<p>Resumen</p>".to_string(),
            },
            content: Rendered::default(),
            date: "2024-06-02T09:30:00".to_string(),
            categories: vec![1],
            lang: None,
            embedded: None,
        };
        let card = PostCard::from_post(&post, "es");
        assert_eq!(card.title, "Tipo de cambio – hoy");
        assert_eq!(card.excerpt, "Resumen");
        assert_eq!(card.image, None);
        assert_eq!(card.category, "General");
        assert_eq!(card.author, "Unknown");
        assert_eq!(card.date, "2 de junio de 2024");
        assert_eq!(card.href, "/news/tipo-de-cambio");
    }

    #[test]
    fn card_keeps_whole_excerpt_and_detail_cuts_description() {
        let long = "Palabra ".repeat(40);
        let post = Post {
            id: 3,
            slug: "largo".to_string(),
            title: Rendered::default(),
            excerpt: Rendered {
                rendered: format!("<p>{long}</p>"),
            },
            content: Rendered::default(),
            date: String::new(),
            categories: Vec::new(),
            lang: None,
            embedded: None,
        };

        let card = PostCard::from_post(&post, "es");
        assert_eq!(card.excerpt, long.trim());
        assert_eq!(card.excerpt.chars().count(), 319);

        let detail = PostDetail::from_post(&post, "es");
        assert!(detail.description.ends_with('…'));
        assert_eq!(detail.description.chars().count(), DESCRIPTION_CHARS);
    }
}
