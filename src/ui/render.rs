//! Render functions for the TUI.
//!
//! Lays out the navigation bar, the current page, and the status bar, then
//! draws overlays on top.

use crate::app::App;
use crate::router::Page;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use super::{economics, help, home, papers, research, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 16;

/// Main render dispatch function.
///
/// Takes `&mut App` because page renderers record hit-test areas.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        app.hero_area = None;
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_nav(f, app, chunks[0]);

    match app.page {
        Page::Home => home::render(f, app, chunks[1]),
        Page::Papers => papers::render(f, app, chunks[1]),
        Page::AiEconomics => economics::render(f, app, chunks[1]),
        Page::Research => research::render(f, app, chunks[1]),
    }

    status::render(f, app, chunks[2]);

    if app.show_help {
        help::render(f, app);
    }
}

/// Page tabs with the active page highlighted and the theme on the right.
fn render_nav(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Page::ALL
        .iter()
        .map(|page| Line::from(format!(" {} ", page.title())))
        .collect();

    let theme_hint = Line::from(vec![
        Span::styled(format!(" {} ", app.theme_variant.name()), app.style("muted")),
    ])
    .alignment(Alignment::Right);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(Span::styled(" AI in Economics ", app.style("title")))
                .title_bottom(theme_hint),
        )
        .style(app.style("nav_tab"))
        .highlight_style(app.style("nav_active"))
        .select(app.page.index())
        .divider("|");

    f.render_widget(tabs, area);
}

/// Rows `lines` take once wrapped to `width` columns, borders excluded.
pub(super) fn wrapped_height(lines: &[Line<'_>], width: u16, trim: bool) -> usize {
    Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim })
        .line_count(width)
}

/// Largest scroll offset that still leaves the last row on screen.
pub(super) fn max_scroll(lines: &[Line<'_>], width: u16, visible: u16, trim: bool) -> u16 {
    let max = wrapped_height(lines, width, trim).saturating_sub(usize::from(visible));
    u16::try_from(max).unwrap_or(u16::MAX)
}

/// A rectangle of at most `width` x `height` centered in `area`.
pub(super) fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::preferences::PreferenceManager;
    use ratatui::{backend::TestBackend, Terminal};
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

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        screen_text(&terminal)
    }

    #[tokio::test]
    async fn test_every_page_renders() {
        let mut app = test_app();
        let expected = [
            (Page::Home, "application areas"),
            (Page::Papers, "Topics"),
            (Page::AiEconomics, "GDP Growth Rate"),
            (Page::Research, "Research Methodology"),
        ];
        for (page, marker) in expected {
            app.show_page(page);
            let text = draw(&mut app, 120, 40);
            assert!(text.contains(page.title()), "{} missing nav title", page);
            assert!(text.contains(marker), "{} missing {:?}", page, marker);
        }
    }

    #[tokio::test]
    async fn test_papers_empty_view_message() {
        let mut app = test_app();
        app.show_page(Page::Papers);
        app.enter_search();
        for c in "zzzz".chars() {
            app.prompt_push(c);
        }
        let text = draw(&mut app, 120, 40);
        assert!(text.contains("No items match"));
        assert!(text.contains("0 of 6"));
    }

    #[tokio::test]
    async fn test_search_placeholder_names_searched_fields() {
        let mut app = test_app();
        app.show_page(Page::Papers);
        let text = draw(&mut app, 120, 40);
        assert!(text.contains("press / to search titles, authors, abstracts and locations"));
        assert!(!text.contains("summaries"));
    }

    #[tokio::test]
    async fn test_research_footnote_panel() {
        let mut app = test_app();
        app.show_page(Page::Research);
        app.next_footnote();
        app.open_footnote();
        let text = draw(&mut app, 120, 40);
        assert!(text.contains("Footnote"));
        assert!(text.contains("reference 1/"));
    }

    #[tokio::test]
    async fn test_economics_choice_shows_analysis() {
        let mut app = test_app();
        app.show_page(Page::AiEconomics);
        app.choose(crate::simulation::Choice::Safe);
        let text = draw(&mut app, 140, 40);
        assert!(text.contains("Safe Investment"));
        assert!(text.contains("AI Analysis"));
    }

    #[tokio::test]
    async fn test_too_small_message() {
        let mut app = test_app();
        let text = draw(&mut app, 40, 10);
        assert!(text.contains("Terminal too small"));
    }

    #[tokio::test]
    async fn test_home_records_hero_area() {
        let mut app = test_app();
        app.show_page(Page::Home);
        draw(&mut app, 100, 40);
        assert!(app.hero_area.is_some());
        app.show_page(Page::Papers);
        draw(&mut app, 100, 40);
        assert!(app.hero_area.is_none());
    }

    #[tokio::test]
    async fn test_papers_page_lists_conferences() {
        let mut app = test_app();
        app.show_page(Page::Papers);
        let text = draw(&mut app, 120, 40);
        assert!(text.contains("AI in Finance 2025"));
        assert!(text.contains("May 15, 2025"));
    }

    #[tokio::test]
    async fn test_help_overlay_lists_bindings() {
        let mut app = test_app();
        app.show_help = true;
        let text = draw(&mut app, 100, 40);
        assert!(text.contains("Alt+t"));
    }

    #[test]
    fn test_wrapped_height_and_max_scroll() {
        let lines = vec![Line::from("abc"), Line::from("x".repeat(25))];
        assert_eq!(wrapped_height(&lines[..1], 10, false), 1);
        assert_eq!(wrapped_height(&lines, 10, false), 4);
        assert_eq!(max_scroll(&lines, 10, 2, false), 2);
        assert_eq!(max_scroll(&lines, 10, 40, false), 0);
    }

    #[tokio::test]
    async fn test_research_scroll_clamped_on_render() {
        let mut app = test_app();
        app.show_page(Page::Research);
        app.research_scroll = u16::MAX;
        draw(&mut app, 120, 40);
        assert!(app.research_scroll < u16::MAX);
        assert_eq!(app.research_scroll, app.research_max_scroll);

        app.economics_scroll = 500;
        app.show_page(Page::AiEconomics);
        draw(&mut app, 120, 40);
        assert_eq!(app.economics_scroll, app.economics_max_scroll);
        assert!(app.economics_scroll < 500);
    }

    #[tokio::test]
    async fn test_footnote_cursor_scrolls_reference_into_view() {
        let mut app = test_app();
        app.show_page(Page::Research);
        // Short viewport so the last reference starts below the fold.
        draw(&mut app, 80, 18);
        assert_eq!(app.research_scroll, 0);

        app.prev_footnote();
        let last = app.research.references().len();
        let text = draw(&mut app, 80, 18);
        assert!(!app.research_follow);
        assert!(app.research_scroll > 0);
        assert!(text.contains(&format!("[{}]", app.research.footnotes().len())));
        assert!(text.contains(&format!("reference {}/{}", last, last)));

        let scrolled = app.research_scroll;
        app.next_footnote();
        let text = draw(&mut app, 80, 18);
        assert!(app.research_scroll < scrolled);
        assert!(text.contains("[1]"));
        assert!(text.contains(&format!("reference 1/{}", last)));
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered(50, 50, area), area);
        assert_eq!(centered(10, 4, area), Rect::new(5, 3, 10, 4));
    }
}
