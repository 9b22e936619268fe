use chrono::NaiveDate;

use super::filter::FilteredView;
use crate::catalog::{Catalog, ItemId};

// ============================================================================
// Display Records
// ============================================================================

/// A conference as shown on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceCard {
    pub id: ItemId,
    pub title: String,
    /// Long-form date (`May 15, 2025`), empty when the source date is malformed.
    pub date: String,
    pub location: String,
    pub description: String,
    pub link: String,
    pub topics: Vec<String>,
}

/// A paper as shown in the paper list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperCard {
    pub id: ItemId,
    pub title: String,
    pub authors: String,
    /// `Journal (Year)`.
    pub venue: String,
    pub summary: String,
    pub link: String,
    pub topics: Vec<String>,
}

/// Rendered output of the filter pipeline. Always rebuilt in full.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedList {
    pub conferences: Vec<ConferenceCard>,
    pub papers: Vec<PaperCard>,
}

impl RenderedList {
    pub fn len(&self) -> usize {
        self.conferences.len() + self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An AI application category card.
///
/// `lists` and `stats` hold only the sections whose source fields exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationCard {
    pub title: String,
    pub description: String,
    pub lists: Vec<Vec<String>>,
    pub stats: Vec<String>,
}

// ============================================================================
// Rendering
// ============================================================================

/// Format an ISO-8601 date the way the conference timeline shows it.
///
/// Returns an empty string for anything that is not a valid `YYYY-MM-DD` date.
pub fn format_conference_date(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(e) => {
            if !iso.trim().is_empty() {
                tracing::debug!(date = %iso, error = %e, "Unparseable conference date");
            }
            String::new()
        }
    }
}

fn format_venue(journal: &str, year: &str) -> String {
    match (journal.trim().is_empty(), year.trim().is_empty()) {
        (false, false) => format!("{} ({})", journal, year),
        (false, true) => journal.to_string(),
        (true, false) => format!("({})", year),
        (true, true) => String::new(),
    }
}

/// Project a filtered view into display records.
///
/// Pure formatting, no filtering: the output lists exactly the view's items in
/// view order. Ids that do not resolve in `catalog` are skipped.
pub fn render(catalog: &Catalog, view: &FilteredView) -> RenderedList {
    let conferences = view
        .conferences()
        .filter_map(|i| catalog.conferences.get(i).map(|c| (i, c)))
        .map(|(i, c)| ConferenceCard {
            id: ItemId::Conference(i),
            title: c.name.clone(),
            date: format_conference_date(&c.date),
            location: c.location.clone(),
            description: c.description.clone(),
            link: c.website.clone(),
            topics: c.topics.clone(),
        })
        .collect();

    let papers = view
        .papers()
        .filter_map(|i| catalog.papers.get(i).map(|p| (i, p)))
        .map(|(i, p)| PaperCard {
            id: ItemId::Paper(i),
            title: p.title.clone(),
            authors: p.authors.join(", "),
            venue: format_venue(&p.journal, &p.year),
            summary: p.summary.clone(),
            link: p.link.clone(),
            topics: p.topics.clone(),
        })
        .collect();

    RenderedList {
        conferences,
        papers,
    }
}

/// Build application cards, appending sections only for fields that exist.
///
/// Section order: examples, applications, benefits, then the accuracy, impact,
/// and adoption stats.
pub fn render_applications(catalog: &Catalog) -> Vec<ApplicationCard> {
    catalog
        .applications
        .iter()
        .map(|app| {
            let lists = [&app.examples, &app.applications, &app.benefits]
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            let stats = [&app.accuracy, &app.impact, &app.adoption]
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            ApplicationCard {
                title: app.category.clone(),
                description: app.description.clone(),
                lists,
                stats,
            }
        })
        .collect()
}
