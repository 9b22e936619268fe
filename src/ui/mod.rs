//! Terminal user interface.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse dispatch
//! - `events` - Background task event processing
//! - `render` - Frame layout, navigation bar, overlays
//! - `home`, `papers`, `economics`, `research` - One renderer per page
//! - `help` - Keybinding overlay
//! - `status` - Status bar and prompts

mod economics;
mod events;
mod help;
mod home;
mod input;
mod loop_runner;
mod papers;
mod render;
mod research;
mod status;

pub use loop_runner::{install_panic_hook, run, Action};
