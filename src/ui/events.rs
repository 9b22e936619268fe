//! Background task event processing.

use crate::app::{App, AppEvent};

/// Apply one event from a background task to the app state.
///
/// Handlers set `needs_redraw` themselves; a stale animation frame changes
/// nothing and costs no redraw.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::AnimationFrame { generation } => app.on_animation_frame(generation),
        AppEvent::PreferenceSaved { key } => {
            tracing::debug!(key = %key, "Preference saved");
        }
        AppEvent::PreferenceFailed { key, error } => {
            tracing::error!(key = %key, error = %error, "Failed to save preference");
            app.set_status(format!("Could not save {}: {}", key, error));
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
