//! SQLite persistence for user preferences.

mod error;
mod preferences;
mod schema;

pub use error::DatabaseError;
pub use schema::Database;
