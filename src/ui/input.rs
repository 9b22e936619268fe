//! Input handling for the TUI.
//!
//! Keys are looked up in the keybinding registry for the current context and
//! dispatched to `App` methods. Prompts and the help overlay capture input
//! before the registry sees it.

use crate::app::{App, InputMode, PapersFocus};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::router::{Direction, Page};
use crate::simulation::Choice;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<Action> {
    // Terminals report SHIFT alongside shifted characters ('?', ':') and BackTab.
    let modifiers = match code {
        KeyCode::Char(_) | KeyCode::BackTab => modifiers.difference(KeyModifiers::SHIFT),
        _ => modifiers,
    };

    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.input_mode != InputMode::Normal {
        handle_prompt_input(app, code, modifiers);
        return Ok(Action::Continue);
    }

    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, app.key_context())
    else {
        return Ok(Action::Continue);
    };
    tracing::trace!(?action, page = %app.page, "Dispatching action");
    dispatch(app, action)
}

/// Run a registry action against the app.
fn dispatch(app: &mut App, action: KbAction) -> Result<Action> {
    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::GoHome => app.show_page(Page::Home),
        KbAction::GoPapers => app.show_page(Page::Papers),
        KbAction::GoAiEconomics => app.show_page(Page::AiEconomics),
        KbAction::GoResearch => app.show_page(Page::Research),
        KbAction::NextPage => app.navigate(Direction::Next),
        KbAction::PrevPage => app.navigate(Direction::Previous),
        KbAction::ToggleTheme => {
            app.toggle_theme();
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::CommandPrompt => app.enter_command(),
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Back => app.status_message = None,

        KbAction::EnterSearch => app.enter_search(),
        KbAction::ClearFilters => app.clear_filters(),
        KbAction::SwitchTab => app.switch_tab(),
        KbAction::FocusTopics => app.papers_focus = PapersFocus::Topics,
        KbAction::FocusList => app.papers_focus = PapersFocus::List,
        KbAction::ToggleTopic => app.toggle_selected_topic(),
        KbAction::OpenLink => app.open_selected_link()?,

        KbAction::RateUp => app.adjust_rate(true),
        KbAction::RateDown => app.adjust_rate(false),
        KbAction::ChooseSafe => app.choose(Choice::Safe),
        KbAction::ChooseRisky => app.choose(Choice::Risky),

        KbAction::NextFootnote => app.next_footnote(),
        KbAction::PrevFootnote => app.prev_footnote(),
        KbAction::OpenFootnote => app.open_footnote(),
        KbAction::CloseFootnote => app.close_footnote(),

        KbAction::SpinHero => app.spin_hero(),

        // Only reachable from the prompt context.
        KbAction::CancelPrompt | KbAction::CommitPrompt => {}
    }
    Ok(Action::Continue)
}

/// Handle input while the search or command prompt is open.
fn handle_prompt_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Prompt)
    {
        Some(KbAction::CancelPrompt) => return app.cancel_prompt(),
        Some(KbAction::CommitPrompt) => return app.commit_prompt(),
        _ => {}
    }

    match code {
        KeyCode::Backspace => app.prompt_backspace(),
        KeyCode::Char(c)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            app.prompt_push(c)
        }
        _ => {}
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Pointer input: hero tilt and click, plus horizontal swipes between pages.
pub(super) fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_help || app.input_mode != InputMode::Normal {
        return;
    }
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.hits_hero(column, row) {
                app.spin_hero();
            }
            app.swipe.press(column, row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(direction) = app.swipe.release(column, row) {
                tracing::debug!(?direction, "Swipe");
                app.navigate(direction);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            app.track_pointer(column, row);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PapersTab;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::preferences::PreferenceManager;
    use crate::theme::ThemeVariant;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn test_app() -> App {
        let (tx, _rx) = mpsc::channel(8);
        let config = Config {
            animations: false,
            ..Config::default()
        };
        let prefs = PreferenceManager::from_config(&config);
        App::new(
            Arc::new(Catalog::embedded().unwrap()),
            None,
            prefs,
            &config,
            tx,
        )
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE).unwrap()
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = test_app();
        assert!(matches!(press(&mut app, KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_alt_digits_switch_pages() {
        let mut app = test_app();
        handle_input(&mut app, KeyCode::Char('3'), KeyModifiers::ALT).unwrap();
        assert_eq!(app.page, Page::AiEconomics);
        handle_input(&mut app, KeyCode::Char('2'), KeyModifiers::ALT).unwrap();
        assert_eq!(app.page, Page::Papers);
    }

    #[tokio::test]
    async fn test_shift_is_ignored_for_symbols_and_backtab() {
        let mut app = test_app();
        handle_input(&mut app, KeyCode::Char('?'), KeyModifiers::SHIFT).unwrap();
        assert!(app.show_help);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);

        handle_input(&mut app, KeyCode::BackTab, KeyModifiers::SHIFT).unwrap();
        assert_eq!(app.page, Page::Research);
    }

    #[tokio::test]
    async fn test_alt_t_toggles_theme() {
        let mut app = test_app();
        handle_input(&mut app, KeyCode::Char('t'), KeyModifiers::ALT).unwrap();
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
    }

    #[tokio::test]
    async fn test_search_prompt_captures_q() {
        let mut app = test_app();
        app.show_page(Page::Papers);
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "quant");
        assert_eq!(app.search_input, "quant");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.pipeline.query_text(), "quan");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.pipeline.query_text(), "quan");
    }

    #[tokio::test]
    async fn test_command_prompt_navigates() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char(':'));
        type_str(&mut app, "economics");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.page, Page::AiEconomics);
    }

    #[tokio::test]
    async fn test_topic_toggle_via_keys() {
        let mut app = test_app();
        app.show_page(Page::Papers);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.papers_focus, PapersFocus::Topics);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.pipeline.topics().len(), 1);
        press(&mut app, KeyCode::Enter);
        assert!(app.pipeline.topics().is_empty());

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.papers_tab, PapersTab::Papers);
    }

    #[tokio::test]
    async fn test_slider_and_choices() {
        let mut app = test_app();
        app.show_page(Page::AiEconomics);
        let start = app.forecast.rate();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.forecast.rate(), start + 0.5);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.forecast.rate(), start - 0.5);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.game.choice(), Some(Choice::Risky));
    }

    #[tokio::test]
    async fn test_footnote_keys() {
        let mut app = test_app();
        app.show_page(Page::Research);
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Enter);
        assert!(app.footnotes.is_open());
        press(&mut app, KeyCode::Esc);
        assert!(!app.footnotes.is_open());
    }

    #[tokio::test]
    async fn test_help_captures_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.help_scroll_offset, 1);
        // 'q' closes help instead of quitting.
        assert!(matches!(press(&mut app, KeyCode::Char('q')), Action::Continue));
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_swipe_left_goes_to_next_page() {
        let mut app = test_app();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 40, 10));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 20, 11));
        assert_eq!(app.page, Page::Papers);

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 20, 10));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 40, 10));
        assert_eq!(app.page, Page::Home);
    }

    #[tokio::test]
    async fn test_short_drag_is_not_a_swipe() {
        let mut app = test_app();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 40, 10));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 37, 10));
        assert_eq!(app.page, Page::Home);
    }
}
