//! Preference manager: config defaults with persisted overrides on top.
//!
//! Reads are served from memory. Writes go to the database, never to the
//! config file, through a single [`PreferenceWriter`] task.
use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::AppEvent;
use crate::config::Config;
use crate::storage::{Database, DatabaseError};
use crate::theme::ThemeVariant;
use crate::util::catch_task_panic;

/// Key under which the chosen theme is stored.
pub const THEME_KEY: &str = "theme";

pub struct PreferenceManager {
    prefs: HashMap<String, String>,
}

impl PreferenceManager {
    /// Flatten `config` into defaults, then layer every stored preference over them.
    pub async fn load(config: &Config, db: &Database) -> Result<Self, DatabaseError> {
        let mut prefs = Self::flatten_config(config);
        let stored = db.get_preferences_by_prefix("").await?;
        tracing::debug!(stored = stored.len(), "Loaded stored preferences");
        prefs.extend(stored);
        Ok(Self { prefs })
    }

    /// Config defaults only. Used when the database cannot be opened.
    pub fn from_config(config: &Config) -> Self {
        Self {
            prefs: Self::flatten_config(config),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.prefs.get(key).map(String::as_str)
    }

    /// Update the in-memory value only; the caller queues the write.
    pub fn remember(&mut self, key: &str, value: &str) {
        self.prefs.insert(key.to_string(), value.to_string());
    }

    /// Effective theme. Unreadable stored values fall back to the default.
    pub fn theme(&self) -> ThemeVariant {
        self.get(THEME_KEY)
            .and_then(ThemeVariant::from_str_name)
            .unwrap_or_default()
    }

    /// Whether decorative animations should run.
    pub fn animations(&self) -> bool {
        self.get("animations")
            .and_then(|v| v.parse().ok())
            .unwrap_or(true)
    }

    fn flatten_config(config: &Config) -> HashMap<String, String> {
        HashMap::from([
            (THEME_KEY.to_string(), config.theme_variant().key().to_string()),
            ("animations".to_string(), config.animations.to_string()),
        ])
    }
}

/// Owns the only task that writes preferences.
///
/// Writes are applied one at a time in the order they were queued, so the
/// stored value always ends up as the last one queued. Each result is
/// reported as [`AppEvent::PreferenceSaved`], [`AppEvent::PreferenceFailed`],
/// or [`AppEvent::TaskPanicked`].
pub struct PreferenceWriter {
    tx: mpsc::UnboundedSender<(&'static str, String)>,
    handle: JoinHandle<()>,
}

impl PreferenceWriter {
    /// Start the writer task. Must be called inside a tokio runtime.
    pub fn spawn(db: Database, events: mpsc::Sender<AppEvent>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<(&'static str, String)>();
        let handle = tokio::spawn(async move {
            while let Some((key, value)) = rx.recv().await {
                let event = match catch_task_panic(db.set_preference(key, &value)).await {
                    Ok(Ok(())) => AppEvent::PreferenceSaved {
                        key: key.to_string(),
                    },
                    Ok(Err(e)) => AppEvent::PreferenceFailed {
                        key: key.to_string(),
                        error: e.to_string(),
                    },
                    Err(panic_msg) => AppEvent::TaskPanicked {
                        task: "preference write",
                        error: panic_msg,
                    },
                };
                if let Err(e) = events.send(event).await {
                    // Expected while draining after the UI has exited.
                    tracing::debug!(key, error = %e, "Preference write result not delivered");
                }
            }
            tracing::debug!("Preference writer stopped");
        });
        Self { tx, handle }
    }

    /// Queue a write. Returns false if the writer task is gone.
    pub fn write(&self, key: &'static str, value: &str) -> bool {
        match self.tx.send((key, value.to_string())) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(key, "Preference writer stopped, value not persisted");
                false
            }
        }
    }

    /// Stop accepting writes and wait for the queued ones to finish.
    pub async fn close(self) {
        let Self { tx, handle } = self;
        drop(tx);
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Preference writer task failed");
        }
    }
}
