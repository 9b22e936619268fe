use std::path::Path;
use thiserror::Error;

use super::types::Catalog;
use crate::util::strip_control_chars;

/// Catalog shipped with the binary.
pub const EMBEDDED_CATALOG: &str = include_str!("../../assets/catalog.json");

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog file exceeds the maximum allowed size.
    #[error("Catalog file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Loading
// ============================================================================

impl Catalog {
    /// Maximum catalog file size (4 MB).
    const MAX_FILE_SIZE: u64 = 4 * 1_048_576;

    /// Parse the catalog embedded in the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Parse a catalog from a JSON document.
    ///
    /// Terminal control sequences are stripped from every text field, since the
    /// values are drawn directly into the terminal.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = serde_json::from_str(json)?;
        catalog.sanitize();

        let untitled = catalog
            .items()
            .filter(|(_, item)| item.title().trim().is_empty())
            .count();
        if untitled > 0 {
            tracing::warn!(count = untitled, "Catalog contains items without a title");
        }

        tracing::debug!(
            conferences = catalog.conferences.len(),
            papers = catalog.papers.len(),
            applications = catalog.applications.len(),
            "Parsed catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > Self::MAX_FILE_SIZE {
            return Err(CatalogError::TooLarge(format!(
                "Catalog file is {} bytes (max {} bytes)",
                meta.len(),
                Self::MAX_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), items = catalog.len(), "Loaded catalog file");
        Ok(catalog)
    }

    fn sanitize(&mut self) {
        fn clean(s: &mut String) {
            if let std::borrow::Cow::Owned(cleaned) = strip_control_chars(s) {
                *s = cleaned;
            }
        }
        fn clean_all(list: &mut [String]) {
            list.iter_mut().for_each(clean);
        }

        for c in &mut self.conferences {
            clean(&mut c.name);
            clean(&mut c.date);
            clean(&mut c.location);
            clean(&mut c.description);
            clean(&mut c.website);
            clean_all(&mut c.topics);
        }
        for p in &mut self.papers {
            clean(&mut p.title);
            clean_all(&mut p.authors);
            clean(&mut p.year);
            clean(&mut p.journal);
            clean(&mut p.summary);
            clean(&mut p.link);
            clean_all(&mut p.topics);
        }
        for a in &mut self.applications {
            clean(&mut a.category);
            clean(&mut a.description);
            for list in [&mut a.examples, &mut a.applications, &mut a.benefits]
                .into_iter()
                .flatten()
            {
                clean_all(list);
            }
            for stat in [&mut a.accuracy, &mut a.impact, &mut a.adoption]
                .into_iter()
                .flatten()
            {
                clean(stat);
            }
        }
    }
}
