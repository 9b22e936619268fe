use serde::{Deserialize, Serialize};

// ============================================================================
// Records
// ============================================================================

/// A conference listing.
///
/// Every text field defaults to empty so a record with missing keys still loads;
/// the renderer shows absent values as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conference {
    pub name: String,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub date: String,
    pub location: String,
    pub description: String,
    pub website: String,
    pub topics: Vec<String>,
}

/// A research paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    pub year: String,
    pub journal: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub topics: Vec<String>,
    pub link: String,
}

/// An AI application category shown on the AI Economics page.
///
/// List and stat fields are type-specific and optional. Only the ones present are
/// rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adoption: Option<String>,
}

// ============================================================================
// Catalog
// ============================================================================

/// The complete, read-only data set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub conferences: Vec<Conference>,
    pub papers: Vec<Paper>,
    #[serde(rename = "aiApplications")]
    pub applications: Vec<Application>,
}

/// Stable address of a filterable item inside a [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
    Conference(usize),
    Paper(usize),
}

/// Borrowed view over either kind of filterable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogItem<'a> {
    Conference(&'a Conference),
    Paper(&'a Paper),
}

impl<'a> CatalogItem<'a> {
    /// Display title: conference name or paper title.
    pub fn title(&self) -> &'a str {
        match self {
            Self::Conference(c) => &c.name,
            Self::Paper(p) => &p.title,
        }
    }

    pub fn topics(&self) -> &'a [String] {
        match self {
            Self::Conference(c) => &c.topics,
            Self::Paper(p) => &p.topics,
        }
    }

    /// Outbound link, if the record carries one.
    pub fn link(&self) -> Option<&'a str> {
        let link = match self {
            Self::Conference(c) => c.website.as_str(),
            Self::Paper(p) => p.link.as_str(),
        };
        (!link.trim().is_empty()).then_some(link)
    }

    /// Fields consulted by free-text search.
    ///
    /// Papers: title, each author, abstract. Conferences: name, description, location.
    pub fn searchable_fields(&self) -> Vec<&'a str> {
        match self {
            Self::Conference(c) => vec![
                c.name.as_str(),
                c.description.as_str(),
                c.location.as_str(),
            ],
            Self::Paper(p) => {
                let mut fields = Vec::with_capacity(p.authors.len() + 2);
                fields.push(p.title.as_str());
                fields.extend(p.authors.iter().map(String::as_str));
                fields.push(p.summary.as_str());
                fields
            }
        }
    }
}

impl Catalog {
    /// Resolve an id to its record. Returns `None` for an id from another catalog.
    pub fn get(&self, id: ItemId) -> Option<CatalogItem<'_>> {
        match id {
            ItemId::Conference(i) => self.conferences.get(i).map(CatalogItem::Conference),
            ItemId::Paper(i) => self.papers.get(i).map(CatalogItem::Paper),
        }
    }

    /// Every filterable item: conferences first, then papers.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, CatalogItem<'_>)> {
        let conferences = self
            .conferences
            .iter()
            .enumerate()
            .map(|(i, c)| (ItemId::Conference(i), CatalogItem::Conference(c)));
        let papers = self
            .papers
            .iter()
            .enumerate()
            .map(|(i, p)| (ItemId::Paper(i), CatalogItem::Paper(p)));
        conferences.chain(papers)
    }

    /// Number of filterable items (conferences + papers).
    pub fn len(&self) -> usize {
        self.conferences.len() + self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct topics in first-seen order, papers before conferences.
    ///
    /// This is the order of the clickable topic list on the Papers page.
    pub fn topic_index(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut topics = Vec::new();
        let all = self
            .papers
            .iter()
            .flat_map(|p| p.topics.iter())
            .chain(self.conferences.iter().flat_map(|c| c.topics.iter()));
        for topic in all {
            if seen.insert(topic.as_str()) {
                topics.push(topic.clone());
            }
        }
        topics
    }
}
