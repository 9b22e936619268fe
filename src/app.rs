use crate::animation::{ActiveAnimation, HeroShape, CELL_PX};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::gesture::SwipeTracker;
use crate::keybindings::{Context, KeybindingRegistry};
use crate::pipeline::{render_applications, ApplicationCard, Pipeline, RenderedList};
use crate::preferences::{PreferenceManager, PreferenceWriter, THEME_KEY};
use crate::research::{FootnoteState, ResearchDocument};
use crate::router::{page_for_command, Direction, Page};
use crate::simulation::{BehavioralGame, Choice, ForecastModel};
use crate::storage::Database;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::{validate_url_for_open, MAX_SEARCH_QUERY_LENGTH};
use anyhow::{Context as _, Result};
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// Events
// ============================================================================

/// Messages from background tasks to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Animation ticker fired for the handle with this generation.
    AnimationFrame { generation: u64 },
    PreferenceSaved { key: String },
    PreferenceFailed { key: String, error: String },
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// UI State Enums
// ============================================================================

/// Which list the Papers page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PapersTab {
    #[default]
    Conferences,
    Papers,
}

impl PapersTab {
    pub fn toggle(self) -> Self {
        match self {
            Self::Conferences => Self::Papers,
            Self::Papers => Self::Conferences,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Conferences => "Conferences",
            Self::Papers => "Research Papers",
        }
    }
}

/// Focused panel on the Papers page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PapersFocus {
    Topics,
    #[default]
    List,
}

/// What typed characters go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    Command,
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    /// Preference writer. `None` when the database could not be opened; the
    /// session then runs on config defaults and nothing is persisted.
    pref_writer: Option<PreferenceWriter>,
    pub prefs: PreferenceManager,

    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    pub page: Page,

    // Papers & Conferences
    pub pipeline: Pipeline,
    /// Display records for the current view, rebuilt after every filter change.
    pub rendered: RenderedList,
    /// Every topic in the catalog, in the order the topic list shows them.
    pub topic_index: Vec<String>,
    pub papers_tab: PapersTab,
    pub papers_focus: PapersFocus,
    pub selected_conference: usize,
    pub selected_paper: usize,
    pub selected_topic: usize,

    // Prompts
    pub input_mode: InputMode,
    pub search_input: String,
    pub command_input: String,

    // AI Economics
    pub applications: Vec<ApplicationCard>,
    pub forecast: ForecastModel,
    pub game: BehavioralGame,
    pub economics_scroll: u16,
    /// Largest useful scroll for the applications panel, set by the renderer.
    pub economics_max_scroll: u16,

    // Research
    pub research: ResearchDocument,
    pub footnotes: FootnoteState,
    pub research_scroll: u16,
    /// Largest useful scroll for the document, set by the renderer.
    pub research_max_scroll: u16,
    /// Scroll the highlighted reference into view on the next render.
    pub research_follow: bool,

    // Animation
    pub animation: Option<ActiveAnimation>,
    animation_generation: u64,
    pub animations_enabled: bool,
    frame_interval: Duration,
    particle_cap: usize,
    event_tx: mpsc::Sender<AppEvent>,
    /// Cube shown when animations are off.
    pub static_hero: HeroShape,

    // Pointer
    pub swipe: SwipeTracker,
    /// Screen area of the hero cube, recorded by the renderer for hit-testing.
    pub hero_area: Option<Rect>,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Skip frames when nothing changed.
    pub needs_redraw: bool,
}

impl App {
    /// Build the session state. No page is entered yet; call [`App::show_page`]
    /// with the start page.
    ///
    /// Must be called inside a tokio runtime when `db` is given, since it
    /// starts the preference writer.
    pub fn new(
        catalog: Arc<Catalog>,
        db: Option<Database>,
        prefs: PreferenceManager,
        config: &Config,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        let theme_variant = prefs.theme();
        let animations_enabled = prefs.animations();

        let mut keybindings = KeybindingRegistry::new();
        let warnings = keybindings.apply_overrides(&config.keybindings);
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Keybinding override rejected");
        }

        let pipeline = Pipeline::new(Arc::clone(&catalog));
        let rendered = pipeline.render();
        let topic_index = catalog.topic_index();
        let applications = render_applications(&catalog);

        let pref_writer = db.map(|db| PreferenceWriter::spawn(db, event_tx.clone()));

        let mut app = Self {
            pref_writer,
            prefs,
            theme_variant,
            theme: StyleMap::for_variant(theme_variant),
            keybindings,
            page: Page::Home,
            pipeline,
            rendered,
            topic_index,
            papers_tab: PapersTab::default(),
            papers_focus: PapersFocus::default(),
            selected_conference: 0,
            selected_paper: 0,
            selected_topic: 0,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            command_input: String::new(),
            applications,
            forecast: ForecastModel::new(),
            game: BehavioralGame::new(),
            economics_scroll: 0,
            economics_max_scroll: u16::MAX,
            research: ResearchDocument::embedded(),
            footnotes: FootnoteState::default(),
            research_scroll: 0,
            research_max_scroll: u16::MAX,
            research_follow: false,
            animation: None,
            animation_generation: 0,
            animations_enabled,
            frame_interval: config.frame_interval(),
            particle_cap: config.particle_count,
            event_tx,
            static_hero: HeroShape::new(),
            swipe: SwipeTracker::new(config.swipe_threshold),
            hero_area: None,
            show_help: false,
            help_scroll_offset: 0,
            status_message: None,
            needs_redraw: true,
        };

        if let Some(first) = warnings.into_iter().next() {
            app.set_status(first);
        }
        app
    }

    /// Resolve a semantic role to its style in the active theme.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Switch to `page`, releasing the old page's animation and starting the
    /// new one's.
    pub fn show_page(&mut self, page: Page) {
        tracing::debug!(from = %self.page, to = %page, "Showing page");
        self.page = page;
        self.input_mode = InputMode::Normal;
        self.swipe.cancel();
        self.hero_area = None;

        match page {
            Page::Papers => self.refresh_rendered(),
            Page::AiEconomics => {
                let rate = self.forecast.rate();
                self.forecast.set_rate(rate);
                self.game = BehavioralGame::new();
            }
            Page::Home | Page::Research => {}
        }

        self.restart_animation();
        self.needs_redraw = true;
    }

    /// Show the page with this id. Unknown ids change nothing.
    pub fn show_page_id(&mut self, id: &str) -> bool {
        match Page::from_id(id) {
            Some(page) => {
                self.show_page(page);
                true
            }
            None => {
                tracing::debug!(id = %id, "Ignoring unknown page id");
                false
            }
        }
    }

    /// Step through the page cycle, wrapping at both ends.
    pub fn navigate(&mut self, direction: Direction) {
        self.show_page(self.page.step(direction));
    }

    /// Run a command-prompt line through the voice command mapping.
    pub fn run_command(&mut self, text: &str) {
        match page_for_command(text) {
            Some(page) => self.show_page(page),
            None if text.trim().is_empty() => {}
            None => self.set_status(format!("Unknown command: {}", text.trim())),
        }
    }

    // ========================================================================
    // Animation
    // ========================================================================

    fn restart_animation(&mut self) {
        // Drop first so the old ticker is aborted before a new one starts.
        self.animation = None;
        if !self.animations_enabled {
            return;
        }
        self.animation_generation = self.animation_generation.wrapping_add(1);
        self.animation = ActiveAnimation::start(
            self.page,
            self.animation_generation,
            self.frame_interval,
            self.particle_cap,
            self.event_tx.clone(),
        );
    }

    /// Advance the live scene. Frames from released handles are ignored.
    pub fn on_animation_frame(&mut self, generation: u64) {
        if let Some(animation) = self.animation.as_mut() {
            if animation.on_frame(generation) {
                self.needs_redraw = true;
            }
        }
    }

    /// The cube drawn on the home page.
    pub fn hero(&self) -> &HeroShape {
        self.animation
            .as_ref()
            .and_then(|a| a.scene.hero())
            .unwrap_or(&self.static_hero)
    }

    fn hero_mut(&mut self) -> &mut HeroShape {
        match self.animation.as_mut().and_then(|a| a.scene.hero_mut()) {
            Some(hero) => hero,
            None => &mut self.static_hero,
        }
    }

    /// Tilt the cube toward a pointer at `(column, row)`.
    pub fn track_pointer(&mut self, column: u16, row: u16) {
        if self.page != Page::Home {
            return;
        }
        let Some(area) = self.hero_area else {
            return;
        };
        let center_x = f64::from(area.x) + f64::from(area.width) / 2.0;
        let center_y = f64::from(area.y) + f64::from(area.height) / 2.0;
        let dx = (f64::from(column) - center_x) * CELL_PX.0;
        let dy = (f64::from(row) - center_y) * CELL_PX.1;
        self.hero_mut().track_pointer(dx, dy);
        self.needs_redraw = true;
    }

    /// Whether `(column, row)` is on the cube.
    pub fn hits_hero(&self, column: u16, row: u16) -> bool {
        self.page == Page::Home
            && self
                .hero_area
                .is_some_and(|area| area.contains(Position::new(column, row)))
    }

    /// Start the one-second spin. Only visible while animations run.
    pub fn spin_hero(&mut self) {
        if self.page != Page::Home {
            return;
        }
        if self.animation.is_none() {
            self.set_status("Animations are disabled");
            return;
        }
        self.hero_mut().start_spin();
        self.needs_redraw = true;
    }

    // ========================================================================
    // Theme
    // ========================================================================

    /// Switch to a different theme variant and rebuild the style map.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::for_variant(variant);
        self.needs_redraw = true;
    }

    /// Flip light/dark and queue the choice for the preference writer.
    ///
    /// The write reports back as [`AppEvent::PreferenceSaved`] or
    /// [`AppEvent::PreferenceFailed`]. Writes land in toggle order.
    pub fn toggle_theme(&mut self) -> ThemeVariant {
        let next = self.theme_variant.next();
        self.set_theme(next);
        self.prefs.remember(THEME_KEY, next.key());
        self.persist_preference(THEME_KEY, next.key());
        self.set_status(format!("Theme: {}", next.name()));
        next
    }

    fn persist_preference(&self, key: &'static str, value: &str) {
        match &self.pref_writer {
            Some(writer) => {
                writer.write(key, value);
            }
            None => tracing::debug!(key, "No preference database, not persisting"),
        }
    }

    /// Wait for queued preference writes to reach the database.
    pub async fn flush_preferences(&mut self) {
        if let Some(writer) = self.pref_writer.take() {
            writer.close().await;
        }
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Set status message (expires after [`STATUS_TTL`]).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear the status message once it has expired.
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Keybinding context for the current page, focus, and prompt.
    pub fn key_context(&self) -> Context {
        if self.input_mode != InputMode::Normal {
            return Context::Prompt;
        }
        match self.page {
            Page::Home => Context::Home,
            Page::Papers if self.papers_focus == PapersFocus::Topics => Context::Topics,
            Page::Papers => Context::Papers,
            Page::AiEconomics => Context::AiEconomics,
            Page::Research => Context::Research,
        }
    }

    // ========================================================================
    // Papers & Conferences
    // ========================================================================

    fn refresh_rendered(&mut self) {
        self.rendered = self.pipeline.render();
        self.clamp_selections();
        self.needs_redraw = true;
    }

    /// Keep every selection index inside its list.
    pub fn clamp_selections(&mut self) {
        fn clamp(index: usize, len: usize) -> usize {
            index.min(len.saturating_sub(1))
        }
        self.selected_conference = clamp(self.selected_conference, self.rendered.conferences.len());
        self.selected_paper = clamp(self.selected_paper, self.rendered.papers.len());
        self.selected_topic = clamp(self.selected_topic, self.topic_index.len());
    }

    pub fn switch_tab(&mut self) {
        self.papers_tab = self.papers_tab.toggle();
        self.needs_redraw = true;
    }

    pub fn toggle_selected_topic(&mut self) {
        let Some(topic) = self.topic_index.get(self.selected_topic).cloned() else {
            return;
        };
        let active = self.pipeline.toggle_topic(&topic);
        self.refresh_rendered();
        let verb = if active { "Filtering by" } else { "Removed filter" };
        self.set_status(format!(
            "{} {} ({} items)",
            verb,
            topic,
            self.pipeline.view().len()
        ));
    }

    pub fn clear_filters(&mut self) {
        self.pipeline.clear();
        self.search_input.clear();
        self.refresh_rendered();
        self.set_status("Filters cleared");
    }

    /// Link of the highlighted conference or paper, if it has one.
    pub fn selected_link(&self) -> Option<&str> {
        let link = match self.papers_tab {
            PapersTab::Conferences => self
                .rendered
                .conferences
                .get(self.selected_conference)
                .map(|c| c.link.as_str()),
            PapersTab::Papers => self
                .rendered
                .papers
                .get(self.selected_paper)
                .map(|p| p.link.as_str()),
        }?;
        let link = link.trim();
        (!link.is_empty()).then_some(link)
    }

    /// Open the highlighted item's link in the system browser.
    ///
    /// Only http(s) links with a host are handed to the OS opener.
    pub fn open_selected_link(&mut self) -> Result<()> {
        let Some(link) = self.selected_link().map(str::to_string) else {
            self.set_status("Selected item has no link");
            return Ok(());
        };
        let url = validate_url_for_open(&link)?;
        open::that(url.as_str()).with_context(|| format!("Failed to open browser for {}", url))?;
        tracing::info!(url = %url, "Opened link");
        self.set_status(format!("Opened {}", url.host_str().unwrap_or("link")));
        Ok(())
    }

    // ========================================================================
    // Prompts
    // ========================================================================

    pub fn enter_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_input = self.pipeline.query_text().to_string();
        self.papers_focus = PapersFocus::List;
        self.needs_redraw = true;
    }

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command_input.clear();
        self.needs_redraw = true;
    }

    /// Append a typed character to the active prompt.
    ///
    /// Search input filters live on every keystroke.
    pub fn prompt_push(&mut self, c: char) {
        match self.input_mode {
            InputMode::Normal => {}
            InputMode::Search => {
                if self.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                    self.set_status(format!(
                        "Search query at max length ({} chars)",
                        MAX_SEARCH_QUERY_LENGTH
                    ));
                    return;
                }
                self.search_input.push(c);
                self.apply_search_input();
            }
            InputMode::Command => {
                if self.command_input.chars().count() < MAX_SEARCH_QUERY_LENGTH {
                    self.command_input.push(c);
                }
            }
        }
        self.needs_redraw = true;
    }

    pub fn prompt_backspace(&mut self) {
        match self.input_mode {
            InputMode::Normal => {}
            InputMode::Search => {
                self.search_input.pop();
                self.apply_search_input();
            }
            InputMode::Command => {
                self.command_input.pop();
            }
        }
        self.needs_redraw = true;
    }

    /// Leave the prompt. A cancelled search also drops its query.
    pub fn cancel_prompt(&mut self) {
        if self.input_mode == InputMode::Search {
            self.search_input.clear();
            self.apply_search_input();
        }
        self.command_input.clear();
        self.input_mode = InputMode::Normal;
        self.needs_redraw = true;
    }

    /// Leave the prompt, keeping the search query or running the command.
    pub fn commit_prompt(&mut self) {
        let mode = std::mem::take(&mut self.input_mode);
        if mode == InputMode::Command {
            let command = std::mem::take(&mut self.command_input);
            self.run_command(&command);
        }
        self.needs_redraw = true;
    }

    fn apply_search_input(&mut self) {
        let text = self.search_input.clone();
        self.pipeline.set_query(&text);
        self.refresh_rendered();
    }

    // ========================================================================
    // AI Economics
    // ========================================================================

    pub fn adjust_rate(&mut self, up: bool) {
        if up {
            self.forecast.increase();
        } else {
            self.forecast.decrease();
        }
        self.needs_redraw = true;
    }

    pub fn choose(&mut self, choice: Choice) {
        self.game.choose(choice);
        self.needs_redraw = true;
    }

    // ========================================================================
    // Research
    // ========================================================================

    pub fn next_footnote(&mut self) {
        self.footnotes.next(&self.research);
        self.research_follow = true;
        self.needs_redraw = true;
    }

    pub fn prev_footnote(&mut self) {
        self.footnotes.prev(&self.research);
        self.research_follow = true;
        self.needs_redraw = true;
    }

    pub fn open_footnote(&mut self) {
        if !self.footnotes.open_selected(&self.research) {
            self.set_status("Select a reference with ] or [ first");
        }
        self.needs_redraw = true;
    }

    pub fn close_footnote(&mut self) {
        self.footnotes.close();
        self.needs_redraw = true;
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn nav_down(&mut self) {
        match self.page {
            Page::Home => {}
            Page::Papers => match (self.papers_focus, self.papers_tab) {
                (PapersFocus::Topics, _) => {
                    self.selected_topic = self.selected_topic.saturating_add(1);
                }
                (PapersFocus::List, PapersTab::Conferences) => {
                    self.selected_conference = self.selected_conference.saturating_add(1);
                }
                (PapersFocus::List, PapersTab::Papers) => {
                    self.selected_paper = self.selected_paper.saturating_add(1);
                }
            },
            Page::AiEconomics => {
                self.economics_scroll = self
                    .economics_scroll
                    .saturating_add(1)
                    .min(self.economics_max_scroll);
            }
            Page::Research => {
                self.research_scroll = self
                    .research_scroll
                    .saturating_add(1)
                    .min(self.research_max_scroll);
            }
        }
        self.clamp_selections();
        self.needs_redraw = true;
    }

    pub fn nav_up(&mut self) {
        match self.page {
            Page::Home => {}
            Page::Papers => match (self.papers_focus, self.papers_tab) {
                (PapersFocus::Topics, _) => {
                    self.selected_topic = self.selected_topic.saturating_sub(1);
                }
                (PapersFocus::List, PapersTab::Conferences) => {
                    self.selected_conference = self.selected_conference.saturating_sub(1);
                }
                (PapersFocus::List, PapersTab::Papers) => {
                    self.selected_paper = self.selected_paper.saturating_sub(1);
                }
            },
            Page::AiEconomics => self.economics_scroll = self.economics_scroll.saturating_sub(1),
            Page::Research => self.research_scroll = self.research_scroll.saturating_sub(1),
        }
        self.needs_redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{RATE_DEFAULT, RATE_MAX};
    use pretty_assertions::assert_eq;
    use tokio::time;

    fn config(animations: bool) -> Config {
        Config {
            animations,
            ..Config::default()
        }
    }

    fn test_app_with(animations: bool) -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(64);
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let config = config(animations);
        let prefs = PreferenceManager::from_config(&config);
        (App::new(catalog, None, prefs, &config, tx), rx)
    }

    fn test_app() -> (App, mpsc::Receiver<AppEvent>) {
        test_app_with(false)
    }

    // Routing
    #[tokio::test]
    async fn test_unknown_page_id_is_noop() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Research);
        assert!(!app.show_page_id("settings"));
        assert_eq!(app.page, Page::Research);
        assert!(app.show_page_id("ai-economics"));
        assert_eq!(app.page, Page::AiEconomics);
    }

    #[tokio::test]
    async fn test_navigate_wraps() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Research);
        app.navigate(Direction::Next);
        assert_eq!(app.page, Page::Home);
        app.navigate(Direction::Previous);
        assert_eq!(app.page, Page::Research);
    }

    #[tokio::test]
    async fn test_run_command_maps_voice_phrases() {
        let (mut app, _rx) = test_app();
        app.run_command("show me the research papers");
        assert_eq!(app.page, Page::Papers);
        app.run_command("go home");
        assert_eq!(app.page, Page::Home);
        app.run_command("about this project");
        assert_eq!(app.page, Page::Research);
    }

    #[tokio::test]
    async fn test_run_command_unknown_sets_status() {
        let (mut app, _rx) = test_app();
        app.run_command("dance");
        assert_eq!(app.page, Page::Home);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_entering_ai_economics_resets_prediction() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::AiEconomics);
        app.choose(Choice::Risky);
        assert!(app.game.choice().is_some());
        app.show_page(Page::Home);
        app.show_page(Page::AiEconomics);
        assert!(app.game.choice().is_none());
        assert_eq!(app.forecast.series().len(), 12);
    }

    // Animation lifecycle
    #[tokio::test]
    async fn test_leaving_page_releases_animation() {
        let (mut app, _rx) = test_app_with(true);
        app.show_page(Page::Home);
        let first = app.animation.as_ref().map(ActiveAnimation::generation);
        assert!(first.is_some());

        app.show_page(Page::Papers);
        assert!(app.animation.is_none());

        app.show_page(Page::AiEconomics);
        let second = app.animation.as_ref().map(ActiveAnimation::generation);
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_stale_frame_does_not_redraw() {
        let (mut app, _rx) = test_app_with(true);
        app.show_page(Page::Home);
        let stale = app.animation.as_ref().map(ActiveAnimation::generation).unwrap();
        app.show_page(Page::AiEconomics);

        app.needs_redraw = false;
        app.on_animation_frame(stale);
        assert!(!app.needs_redraw);

        app.on_animation_frame(stale + 1);
        assert!(app.needs_redraw);
    }

    #[tokio::test]
    async fn test_animations_disabled_never_start() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Home);
        assert!(app.animation.is_none());
        app.spin_hero();
        assert!(!app.hero().is_spinning());
    }

    #[tokio::test]
    async fn test_pointer_tilts_hero_only_inside_home() {
        let (mut app, _rx) = test_app_with(true);
        app.show_page(Page::Home);
        app.hero_area = Some(Rect::new(10, 5, 20, 10));
        let before = app.hero().rotation();
        app.track_pointer(29, 14);
        assert_ne!(app.hero().rotation(), before);

        assert!(app.hits_hero(15, 8));
        assert!(!app.hits_hero(2, 2));
        app.spin_hero();
        assert!(app.hero().is_spinning());
    }

    // Theme
    #[tokio::test]
    async fn test_toggle_theme_without_db_updates_prefs() {
        let (mut app, _rx) = test_app();
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(app.toggle_theme(), ThemeVariant::Dark);
        assert_eq!(app.prefs.theme(), ThemeVariant::Dark);
        assert_eq!(app.toggle_theme(), ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_toggle_theme_reports_saved() {
        let (tx, mut rx) = mpsc::channel(8);
        let db = Database::open(":memory:").await.unwrap();
        let config = Config::default();
        let prefs = PreferenceManager::load(&config, &db).await.unwrap();
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let mut app = App::new(catalog, Some(db.clone()), prefs, &config, tx);

        app.toggle_theme();
        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            AppEvent::PreferenceSaved {
                key: "theme".to_string()
            }
        );
        assert_eq!(
            db.get_preference("theme").await.unwrap().as_deref(),
            Some("dark")
        );
    }

    #[tokio::test]
    async fn test_flush_waits_for_queued_toggles() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let db = Database::open(":memory:").await.unwrap();
        let config = Config::default();
        let prefs = PreferenceManager::load(&config, &db).await.unwrap();
        let catalog = Arc::new(Catalog::embedded().unwrap());
        let mut app = App::new(catalog, Some(db.clone()), prefs, &config, tx);

        for _ in 0..5 {
            app.toggle_theme();
        }
        app.flush_preferences().await;
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
        assert_eq!(
            db.get_preference("theme").await.unwrap().as_deref(),
            Some("dark")
        );
    }

    // Papers page
    #[tokio::test]
    async fn test_search_filters_live_and_escape_clears() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Papers);
        assert_eq!(app.rendered.len(), 6);

        app.enter_search();
        for c in "behavioral".chars() {
            app.prompt_push(c);
        }
        assert_eq!(app.rendered.len(), 2);
        assert_eq!(app.pipeline.query_text(), "behavioral");

        app.cancel_prompt();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.pipeline.query_text(), "");
        assert_eq!(app.rendered.len(), 6);
    }

    #[tokio::test]
    async fn test_search_enter_keeps_query() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Papers);
        app.enter_search();
        for c in "AI".chars() {
            app.prompt_push(c);
        }
        app.commit_prompt();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.pipeline.query_text(), "AI");
    }

    #[tokio::test]
    async fn test_search_length_capped() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Papers);
        app.enter_search();
        for _ in 0..(MAX_SEARCH_QUERY_LENGTH + 10) {
            app.prompt_push('x');
        }
        assert_eq!(app.search_input.chars().count(), MAX_SEARCH_QUERY_LENGTH);
    }

    #[tokio::test]
    async fn test_toggle_topic_clamps_selection() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Papers);
        app.papers_tab = PapersTab::Papers;
        app.selected_paper = 2;

        let index = app
            .topic_index
            .iter()
            .position(|t| t == "Behavioral Economics")
            .unwrap();
        app.selected_topic = index;
        app.toggle_selected_topic();

        assert_eq!(app.rendered.papers.len(), 1);
        assert_eq!(app.rendered.conferences.len(), 1);
        assert_eq!(app.selected_paper, 0);

        app.clear_filters();
        assert_eq!(app.rendered.len(), 6);
        assert!(app.pipeline.topics().is_empty());
    }

    #[tokio::test]
    async fn test_nav_clamps_to_list() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Papers);
        for _ in 0..10 {
            app.nav_down();
        }
        assert_eq!(app.selected_conference, app.rendered.conferences.len() - 1);
        for _ in 0..10 {
            app.nav_up();
        }
        assert_eq!(app.selected_conference, 0);
    }

    #[tokio::test]
    async fn test_selected_link_follows_tab() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Papers);
        let conference = app.selected_link().map(str::to_string);
        app.switch_tab();
        let paper = app.selected_link().map(str::to_string);
        assert!(conference.is_some());
        assert!(paper.is_some());
        assert_ne!(conference, paper);
    }

    #[tokio::test]
    async fn test_open_link_on_empty_view_sets_status() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Papers);
        app.enter_search();
        for c in "zzzz-no-match".chars() {
            app.prompt_push(c);
        }
        app.commit_prompt();
        assert!(app.rendered.is_empty());
        app.open_selected_link().unwrap();
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_ref()),
            Some("Selected item has no link")
        );
    }

    // AI Economics
    #[tokio::test]
    async fn test_rate_adjust_clamps() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::AiEconomics);
        assert_eq!(app.forecast.rate(), RATE_DEFAULT);
        for _ in 0..40 {
            app.adjust_rate(true);
        }
        assert_eq!(app.forecast.rate(), RATE_MAX);
    }

    // Research
    #[tokio::test]
    async fn test_open_footnote_requires_selection() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Research);
        app.open_footnote();
        assert!(!app.footnotes.is_open());

        app.next_footnote();
        app.open_footnote();
        assert!(app.footnotes.is_open());
        app.close_footnote();
        assert!(!app.footnotes.is_open());
    }

    #[tokio::test]
    async fn test_scroll_stops_at_rendered_limit() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Research);
        app.research_max_scroll = 3;
        for _ in 0..10 {
            app.nav_down();
        }
        assert_eq!(app.research_scroll, 3);

        app.show_page(Page::AiEconomics);
        app.economics_max_scroll = 0;
        app.nav_down();
        assert_eq!(app.economics_scroll, 0);
    }

    #[tokio::test]
    async fn test_footnote_cursor_requests_follow() {
        let (mut app, _rx) = test_app();
        app.show_page(Page::Research);
        assert!(!app.research_follow);
        app.next_footnote();
        assert!(app.research_follow);
    }

    // Context
    #[tokio::test]
    async fn test_key_context_tracks_page_focus_and_prompt() {
        let (mut app, _rx) = test_app();
        assert_eq!(app.key_context(), Context::Home);
        app.show_page(Page::Papers);
        assert_eq!(app.key_context(), Context::Papers);
        app.papers_focus = PapersFocus::Topics;
        assert_eq!(app.key_context(), Context::Topics);
        app.enter_search();
        assert_eq!(app.key_context(), Context::Prompt);
    }

    // Status message expiry with time control
    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let (mut app, _rx) = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
