use std::collections::BTreeSet;

use crate::catalog::{Catalog, CatalogItem, ItemId};

// ============================================================================
// Topic Filter
// ============================================================================

/// Set of active topic tags. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    active: BTreeSet<String>,
}

impl TopicFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `topic` if absent, remove it if present.
    ///
    /// Returns `true` when the topic is active after the call.
    pub fn toggle(&mut self, topic: &str) -> bool {
        if self.active.remove(topic) {
            false
        } else {
            self.active.insert(topic.to_string());
            true
        }
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.active.contains(topic)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Active topics in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Whether an item with `tags` passes the filter.
    ///
    /// An empty filter admits everything; otherwise at least one tag must be active.
    pub fn admits(&self, tags: &[String]) -> bool {
        self.is_empty() || tags.iter().any(|t| self.active.contains(t))
    }
}

impl<S: Into<String>> FromIterator<S> for TopicFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            active: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Query
// ============================================================================

/// Case-folded free-text query.
///
/// Surrounding whitespace is ignored for matching, so a blank query matches
/// every item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    folded: String,
}

impl Query {
    pub fn new(text: &str) -> Self {
        Self {
            folded: text.trim().to_lowercase(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.folded.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Whether the query is a substring of at least one searchable field.
    pub fn matches(&self, item: &CatalogItem<'_>) -> bool {
        if self.is_blank() {
            return true;
        }
        item.searchable_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(&self.folded))
    }
}

// ============================================================================
// Filtered View
// ============================================================================

/// Items currently eligible for display, in catalog order.
///
/// Only ever produced by [`filter`], so every id resolves in the catalog it was
/// computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    ids: Vec<ItemId>,
}

impl FilteredView {
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Indices of the conferences in the view.
    pub fn conferences(&self) -> impl Iterator<Item = usize> + '_ {
        self.ids.iter().filter_map(|id| match id {
            ItemId::Conference(i) => Some(*i),
            ItemId::Paper(_) => None,
        })
    }

    /// Indices of the papers in the view.
    pub fn papers(&self) -> impl Iterator<Item = usize> + '_ {
        self.ids.iter().filter_map(|id| match id {
            ItemId::Paper(i) => Some(*i),
            ItemId::Conference(_) => None,
        })
    }
}

/// Compute the filtered view.
///
/// Topic filter and query compose with AND: an item is kept only when it passes
/// both. Pure: identical inputs always produce an identical view.
pub fn filter(catalog: &Catalog, topics: &TopicFilter, query: &Query) -> FilteredView {
    let ids = catalog
        .items()
        .filter(|(_, item)| topics.admits(item.topics()) && query.matches(item))
        .map(|(id, _)| id)
        .collect();
    FilteredView { ids }
}
