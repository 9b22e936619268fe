//! Text, link, and task helpers shared across the crate.

mod task;
mod text;
mod url_validator;

pub use task::catch_task_panic;
pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Longest search query accepted from the prompt, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
