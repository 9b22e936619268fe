//! Catalog of conferences, papers, and AI application categories.
//!
//! The catalog is immutable for the lifetime of the process. It is built once at
//! startup, either from the JSON literal embedded in the binary or from a user
//! supplied file, and then shared by reference with the filter pipeline and UI.
//!
//! # Module Structure
//!
//! - `types` - Record structs and the borrowed [`CatalogItem`] view
//! - `loader` - JSON parsing, size limits, and text sanitization

mod loader;
mod types;

pub use loader::{CatalogError, EMBEDDED_CATALOG};
pub use types::{Application, Catalog, CatalogItem, Conference, ItemId, Paper};
