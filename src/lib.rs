//! Terminal browser for AI-in-economics conferences, papers, and applications.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! drive them directly.

pub mod animation;
pub mod app;
pub mod catalog;
pub mod config;
pub mod gesture;
pub mod keybindings;
pub mod pipeline;
pub mod preferences;
pub mod research;
pub mod router;
pub mod simulation;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
