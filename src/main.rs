use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use econ_atlas::app::{App, AppEvent};
use econ_atlas::catalog::Catalog;
use econ_atlas::config::Config;
use econ_atlas::pipeline::{Pipeline, RenderedList};
use econ_atlas::preferences::PreferenceManager;
use econ_atlas::router::Page;
use econ_atlas::storage::{Database, DatabaseError};
use econ_atlas::ui;

/// Capacity of the background event channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Get the config directory path (~/.config/econ-atlas/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("econ-atlas"))
}

/// Create the config directory if needed and restrict it to the owner.
fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        tracing::info!(path = %config_dir.display(), "Created config directory");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(config_dir, std::fs::Permissions::from_mode(0o700))
        {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to set config directory permissions to 0700"
            );
        }
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(
    name = "econ-atlas",
    about = "Browse AI-in-economics conferences, papers, and applications"
)]
struct Args {
    /// Catalog JSON to use instead of the built-in one
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Page to open: home, papers, ai-economics, research
    #[arg(long, value_name = "ID")]
    page: Option<String>,

    /// Disable decorative animations
    #[arg(long)]
    no_animations: bool,

    /// Forget stored preferences (theme) and start from config defaults
    #[arg(long)]
    reset_prefs: bool,

    /// Print the filtered catalog and exit
    #[arg(long)]
    list: bool,

    /// Search text applied with --list
    #[arg(long, value_name = "TEXT", requires = "list")]
    query: Option<String>,

    /// Topic filter applied with --list (repeatable)
    #[arg(long = "topic", value_name = "TOPIC", requires = "list")]
    topics: Vec<String>,
}

fn load_catalog(args: &Args, config: &Config) -> Result<Catalog> {
    match args.catalog.as_ref().or(config.catalog_path.as_ref()) {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Catalog::embedded().context("Built-in catalog is invalid"),
    }
}

/// Print the rendered view as plain text.
fn print_list(list: &RenderedList) {
    if list.is_empty() {
        println!("No matching conferences or papers.");
        return;
    }
    if !list.conferences.is_empty() {
        println!("Conferences");
        for c in &list.conferences {
            println!("  {}", c.title);
            println!("    {} | {}", c.date, c.location);
            if !c.link.is_empty() {
                println!("    {}", c.link);
            }
        }
    }
    if !list.papers.is_empty() {
        if !list.conferences.is_empty() {
            println!();
        }
        println!("Papers");
        for p in &list.papers {
            println!("  {}", p.title);
            println!("    {} | {}", p.authors, p.venue);
            if !p.link.is_empty() {
                println!("    {}", p.link);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --list output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    ui::install_panic_hook();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let mut config =
        Config::load(&config_dir.join("config.toml")).context("Failed to load config.toml")?;
    if args.no_animations {
        config.animations = false;
    }

    let catalog = Arc::new(load_catalog(&args, &config)?);

    if args.list {
        let mut pipeline = Pipeline::new(Arc::clone(&catalog));
        for topic in &args.topics {
            pipeline.toggle_topic(topic);
        }
        if let Some(query) = &args.query {
            pipeline.set_query(query);
        }
        print_list(&pipeline.render());
        return Ok(());
    }

    let start_page = match &args.page {
        Some(id) => Page::from_id(id).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown page '{}' (expected home, papers, ai-economics, or research)",
                id
            )
        })?,
        None => config.start_page(),
    };

    ensure_config_dir(&config_dir)?;
    let db_path = config_dir.join("prefs.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;

    let db = match Database::open(db_path_str).await {
        Ok(db) => Some(db),
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of econ-atlas appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            // Preferences are optional; run on config defaults.
            tracing::warn!(error = %e, "Preference database unavailable, theme will not persist");
            None
        }
    };

    if args.reset_prefs {
        if let Some(db) = &db {
            let removed = db
                .clear_preferences()
                .await
                .context("Failed to reset preferences")?;
            println!("Preferences reset ({} removed).", removed);
        }
    }

    let prefs = match &db {
        Some(db) => match PreferenceManager::load(&config, db).await {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored preferences, using config defaults");
                PreferenceManager::from_config(&config)
            }
        },
        None => PreferenceManager::from_config(&config),
    };

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(EVENT_CHANNEL_CAPACITY);
    let mut app = App::new(catalog, db, prefs, &config, event_tx);
    app.show_page(start_page);

    let result = ui::run(&mut app, event_rx).await;
    // Queued theme writes land even when the loop exits with an error.
    app.flush_preferences().await;
    result
}
