//! Integration tests for theme persistence across sessions.
//!
//! Each test uses its own database file under the system temp dir, toggles
//! the theme through `App`, and reloads preferences from a fresh connection
//! the way the next launch would.

use std::path::PathBuf;
use std::sync::Arc;

use econ_atlas::app::{App, AppEvent};
use econ_atlas::catalog::Catalog;
use econ_atlas::config::Config;
use econ_atlas::preferences::PreferenceManager;
use econ_atlas::storage::Database;
use econ_atlas::theme::ThemeVariant;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

fn db_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("econ_atlas_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("prefs.db");
    std::fs::remove_file(&path).ok();
    path
}

async fn launch(path: &str, config: &Config) -> (App, mpsc::Receiver<AppEvent>) {
    let db = Database::open(path).await.unwrap();
    let prefs = PreferenceManager::load(config, &db).await.unwrap();
    let (tx, rx) = mpsc::channel(8);
    let catalog = Arc::new(Catalog::embedded().unwrap());
    (App::new(catalog, Some(db), prefs, config, tx), rx)
}

#[tokio::test]
async fn test_first_run_uses_default_theme() {
    let path = db_path("first_run");
    let config = Config {
        animations: false,
        ..Config::default()
    };
    let (app, _rx) = launch(path.to_str().unwrap(), &config).await;
    assert_eq!(app.theme_variant, ThemeVariant::Light);

    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}

#[tokio::test]
async fn test_toggled_theme_restored_on_next_launch() {
    let path = db_path("restore");
    let path_str = path.to_str().unwrap();
    let config = Config {
        animations: false,
        ..Config::default()
    };

    {
        let (mut app, mut rx) = launch(path_str, &config).await;
        assert_eq!(app.toggle_theme(), ThemeVariant::Dark);
        assert_eq!(
            rx.recv().await,
            Some(AppEvent::PreferenceSaved {
                key: "theme".to_string()
            })
        );
    }

    let (app, _rx) = launch(path_str, &config).await;
    assert_eq!(app.theme_variant, ThemeVariant::Dark);
    assert_eq!(app.prefs.get("theme"), Some("dark"));

    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rapid_toggles_store_the_live_theme() {
    let config = Config {
        animations: false,
        ..Config::default()
    };

    for round in 0..25 {
        let path = db_path(&format!("rapid_{}", round));
        let path_str = path.to_str().unwrap();

        let live = {
            let (mut app, mut rx) = launch(path_str, &config).await;
            for _ in 0..3 {
                app.toggle_theme();
            }
            for _ in 0..3 {
                assert_eq!(
                    rx.recv().await,
                    Some(AppEvent::PreferenceSaved {
                        key: "theme".to_string()
                    })
                );
            }
            app.flush_preferences().await;
            app.theme_variant
        };
        assert_eq!(live, ThemeVariant::Dark);

        let (app, _rx) = launch(path_str, &config).await;
        assert_eq!(app.theme_variant, live, "round {}", round);

        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }
}

#[tokio::test]
async fn test_stored_theme_overrides_config_default() {
    let path = db_path("override");
    let path_str = path.to_str().unwrap();

    let db = Database::open(path_str).await.unwrap();
    db.set_preference("theme", "dark").await.unwrap();
    drop(db);

    let config = Config {
        theme: "light".to_string(),
        animations: false,
        ..Config::default()
    };
    let (app, _rx) = launch(path_str, &config).await;
    assert_eq!(app.theme_variant, ThemeVariant::Dark);

    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}

#[tokio::test]
async fn test_cleared_preferences_fall_back_to_config() {
    let path = db_path("cleared");
    let path_str = path.to_str().unwrap();

    let db = Database::open(path_str).await.unwrap();
    db.set_preference("theme", "dark").await.unwrap();
    assert_eq!(db.clear_preferences().await.unwrap(), 1);
    drop(db);

    let config = Config {
        animations: false,
        ..Config::default()
    };
    let (app, _rx) = launch(path_str, &config).await;
    assert_eq!(app.theme_variant, ThemeVariant::Light);

    if let Some(dir) = path.parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}
