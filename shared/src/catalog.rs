//! Category catalog: filter chips for the UI and the slug→id map the API
//! filters need.

use std::collections::HashMap;

use serde::Serialize;

use crate::Category;

/// A filter chip as the sidebar renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChip {
    /// Display name.
    pub label: String,
    /// URL-facing name.
    pub slug: String,
    /// Post count shown next to the label.
    pub count: u64,
}

/// Categories loaded once per listing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
    slug_to_id: HashMap<String, u64>,
}

impl CategoryCatalog {
    /// Build from a raw category collection. Chips are ordered by post count,
    /// highest first; the first category seen for a slug wins the map entry.
    pub fn new(mut categories: Vec<Category>) -> Self {
        categories.sort_by(|a, b| b.count.cmp(&a.count));

        let mut slug_to_id = HashMap::with_capacity(categories.len());
        for category in &categories {
            slug_to_id.entry(category.slug.clone()).or_insert(category.id);
        }

        Self {
            categories,
            slug_to_id,
        }
    }

    /// Id for `slug`, if the CMS knows it.
    pub fn id_for(&self, slug: &str) -> Option<u64> {
        self.slug_to_id.get(slug).copied()
    }

    /// Map selected slugs to ids, silently dropping unknown ones.
    pub fn resolve(&self, slugs: &[String]) -> Vec<u64> {
        slugs.iter().filter_map(|slug| self.id_for(slug)).collect()
    }

    /// Number of distinct slugs.
    pub fn slug_count(&self) -> usize {
        self.slug_to_id.len()
    }

    /// Categories in chip order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Chips in display order.
    pub fn chips(&self) -> Vec<CategoryChip> {
        self.categories
            .iter()
            .map(|category| CategoryChip {
                label: category.name.clone(),
                slug: category.slug.clone(),
                count: category.count,
            })
            .collect()
    }

    /// Whether nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
