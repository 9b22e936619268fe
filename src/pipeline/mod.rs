//! Content filter/render pipeline.
//!
//! Owns the topic filter and the search query, and keeps the derived
//! [`FilteredView`] in sync with them. Every mutation recomputes the view
//! before returning, so readers never observe a stale or partial view.

mod filter;
mod render;

use std::sync::Arc;

use crate::catalog::Catalog;

pub use filter::{filter, FilteredView, Query, TopicFilter};
pub use render::{
    format_conference_date, render, render_applications, ApplicationCard, ConferenceCard,
    PaperCard, RenderedList,
};

/// Filter state plus the view derived from it.
#[derive(Debug, Clone)]
pub struct Pipeline {
    catalog: Arc<Catalog>,
    topics: TopicFilter,
    /// Raw query text as typed, shown in the search bar.
    raw_query: String,
    query: Query,
    view: FilteredView,
}

impl Pipeline {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let topics = TopicFilter::new();
        let query = Query::default();
        let view = filter(&catalog, &topics, &query);
        Self {
            catalog,
            topics,
            raw_query: String::new(),
            query,
            view,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn topics(&self) -> &TopicFilter {
        &self.topics
    }

    /// Query text as entered.
    pub fn query_text(&self) -> &str {
        &self.raw_query
    }

    /// Replace the search query and recompute the view.
    pub fn set_query(&mut self, text: &str) {
        self.raw_query = text.to_string();
        self.query = Query::new(text);
        self.recompute();
    }

    /// Flip `topic` in the filter and recompute the view.
    ///
    /// Returns `true` when the topic is now active.
    pub fn toggle_topic(&mut self, topic: &str) -> bool {
        let active = self.topics.toggle(topic);
        self.recompute();
        active
    }

    /// Drop the query and every active topic.
    pub fn clear(&mut self) {
        self.raw_query.clear();
        self.query = Query::default();
        self.topics.clear();
        self.recompute();
    }

    /// Display records for the current view.
    pub fn render(&self) -> RenderedList {
        render(&self.catalog, &self.view)
    }

    fn recompute(&mut self) {
        self.view = filter(&self.catalog, &self.topics, &self.query);
        tracing::debug!(
            query = %self.query.as_str(),
            topics = self.topics.len(),
            visible = self.view.len(),
            "Recomputed filtered view"
        );
    }
}
