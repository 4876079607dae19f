//! Lookup of remote items by id and slug
//!
//! Built from one snapshot of a collection and discarded with it. Later
//! duplicates overwrite earlier ones.

use std::collections::HashMap;

use framesync_domain::RemoteItemSummary;

/// Id, exact-slug and lowercase-slug lookup over a snapshot
#[derive(Debug, Default)]
pub struct IdentityIndex {
    items: Vec<RemoteItemSummary>,
    by_id: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
    by_slug_lower: HashMap<String, usize>,
}

impl IdentityIndex {
    pub fn build<I>(items: I) -> Self
    where
        I: IntoIterator<Item = RemoteItemSummary>,
    {
        let mut index = Self::default();
        for item in items {
            let position = index.items.len();
            if !item.id.is_empty() {
                index.by_id.insert(item.id.clone(), position);
            }
            if let Some(slug) = item.slug.as_deref().filter(|slug| !slug.is_empty()) {
                index.by_slug.insert(slug.to_string(), position);
                index.by_slug_lower.insert(slug.to_lowercase(), position);
            }
            index.items.push(item);
        }
        index
    }

    /// Find the item matching the hints: id first, then exact slug, then
    /// lowercase slug.
    pub fn resolve(&self, id: Option<&str>, slug: Option<&str>) -> Option<&RemoteItemSummary> {
        let id = id.filter(|id| !id.is_empty());
        let slug = slug.filter(|slug| !slug.is_empty());

        id.and_then(|id| self.by_id.get(id))
            .or_else(|| slug.and_then(|slug| self.by_slug.get(slug)))
            .or_else(|| slug.and_then(|slug| self.by_slug_lower.get(&slug.to_lowercase())))
            .and_then(|&position| self.items.get(position))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
