//! Research page: the methodology document and its footnotes panel.

use crate::app::App;
use super::render::{max_scroll, wrapped_height};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Height of the footnote panel, borders included.
const PANEL_HEIGHT: u16 = 6;

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let open = app
        .footnotes
        .open_id()
        .and_then(|id| app.research.footnote(id))
        .cloned();

    let (body_area, panel_area) = if open.is_some() && area.height > PANEL_HEIGHT + 3 {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(PANEL_HEIGHT)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let document = app.research.render_lines(&app.theme, app.footnotes.cursor());
    let width = body_area.width.saturating_sub(2);
    let visible = body_area.height.saturating_sub(2);

    if app.research_follow {
        if let Some(active) = document.active_line {
            let top = wrapped_height(&document.lines[..active], width, false);
            let bottom = top + wrapped_height(&document.lines[active..=active], width, false);
            app.research_scroll = follow(app.research_scroll, top, bottom, visible);
        }
        app.research_follow = false;
    }
    app.research_max_scroll = max_scroll(&document.lines, width, visible, false);
    app.research_scroll = app.research_scroll.min(app.research_max_scroll);

    let position = match app.footnotes.cursor() {
        Some(c) => format!(" reference {}/{} ", c + 1, app.research.references().len()),
        None => format!(" {} references ", app.research.references().len()),
    };

    let body = Paragraph::new(document.lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(" Research ")
                .title_bottom(Line::from(Span::styled(position, app.style("muted"))).right_aligned()),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.research_scroll, 0));
    f.render_widget(body, body_area);

    if let (Some(note), Some(panel)) = (open, panel_area) {
        let text = Paragraph::new(Line::from(vec![
            Span::styled(format!("[{}] ", note.number), app.style("footnote_active")),
            Span::styled(note.text, app.style("text")),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Footnote ")
                .title_bottom(Line::from(Span::styled(" Esc to close ", app.style("muted")))),
        )
        .wrap(Wrap { trim: true });
        f.render_widget(Clear, panel);
        f.render_widget(text, panel);
    }
}

/// Scroll offset that brings rows `top..bottom` into a `visible`-row view,
/// moving as little as possible.
fn follow(scroll: u16, top: usize, bottom: usize, visible: u16) -> u16 {
    let current = usize::from(scroll);
    let visible = usize::from(visible);
    let target = if top < current {
        top
    } else if bottom > current + visible {
        bottom.saturating_sub(visible).min(top)
    } else {
        current
    };
    u16::try_from(target).unwrap_or(u16::MAX)
}
