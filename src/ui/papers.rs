//! Papers & Conferences page: topic filters, search bar, and the card list.

use crate::app::{App, PapersFocus, PapersTab};
use crate::keybindings::{Action, Context};
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

/// Width of the topic column, borders included.
const TOPICS_WIDTH: u16 = 30;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(TOPICS_WIDTH), Constraint::Min(0)])
        .split(area);

    render_topics(f, app, columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(columns[1]);

    render_search_bar(f, app, rows[0]);
    render_tabs(f, app, rows[1]);
    render_cards(f, app, rows[2]);
}

fn border_style(app: &App, focused: bool) -> Style {
    if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    }
}

/// Every catalog topic with its filter checkbox.
fn render_topics(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.papers_focus == PapersFocus::Topics;
    let max_width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = app
        .topic_index
        .iter()
        .map(|topic| {
            let active = app.pipeline.topics().contains(topic);
            let (mark, style) = if active {
                ("[x] ", app.style("topic_active"))
            } else {
                ("[ ] ", app.style("topic"))
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(truncate_to_width(topic, max_width).into_owned(), style),
            ]))
        })
        .collect();

    let title = match app.pipeline.topics().len() {
        0 => " Topics ".to_string(),
        n => format!(" Topics ({} active) ", n),
    };

    let highlight = if focused {
        app.style("item_selected")
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app, focused))
                .title(title),
        )
        .highlight_style(highlight);

    let mut state = ListState::default().with_selected(Some(app.selected_topic));
    f.render_stateful_widget(list, area, &mut state);
}

/// Current query and how many items survive the filters.
fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let query = app.pipeline.query_text();
    let total = app.pipeline.catalog().len();
    let shown = app.rendered.len();

    let mut spans = vec![Span::styled("/ ", app.style("search_prompt"))];
    if query.is_empty() {
        let hint = match app.keybindings.key_for(Context::Papers, Action::EnterSearch) {
            Some(key) => format!("press {} to search titles, authors, abstracts and locations", key),
            None => "search titles, authors, abstracts and locations".to_string(),
        };
        spans.push(Span::styled(hint, app.style("muted")));
    } else {
        spans.push(Span::styled(query.to_string(), app.style("text")));
    }

    let count = format!(" {} of {} ", shown, total);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(" Search ")
        .title_bottom(Line::from(Span::styled(count, app.style("muted"))).right_aligned());

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles = [PapersTab::Conferences, PapersTab::Papers].map(|tab| {
        let count = match tab {
            PapersTab::Conferences => app.rendered.conferences.len(),
            PapersTab::Papers => app.rendered.papers.len(),
        };
        Line::from(format!("{} ({})", tab.title(), count))
    });
    let selected = match app.papers_tab {
        PapersTab::Conferences => 0,
        PapersTab::Papers => 1,
    };

    let tabs = Tabs::new(titles)
        .style(app.style("nav_tab"))
        .highlight_style(app.style("nav_active"))
        .select(selected)
        .divider("|");
    f.render_widget(tabs, area);
}

/// Cards for the active tab. Each card is a short block of lines.
fn render_cards(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.papers_focus == PapersFocus::List;
    let width = area.width.saturating_sub(4) as usize;

    let (items, selected): (Vec<ListItem>, usize) = match app.papers_tab {
        PapersTab::Conferences => (
            app.rendered
                .conferences
                .iter()
                .map(|c| {
                    let mut lines = vec![
                        Line::from(Span::styled(
                            truncate_to_width(&c.title, width).into_owned(),
                            app.style("card_title").add_modifier(Modifier::BOLD),
                        )),
                        Line::from(vec![
                            Span::styled(c.date.clone(), app.style("date")),
                            Span::styled("  ", app.style("text")),
                            Span::styled(c.location.clone(), app.style("venue")),
                        ]),
                        Line::from(Span::styled(
                            truncate_to_width(&c.description, width).into_owned(),
                            app.style("text"),
                        )),
                    ];
                    lines.push(topic_line(app, &c.topics, width));
                    lines.push(Line::from(""));
                    ListItem::new(lines)
                })
                .collect(),
            app.selected_conference,
        ),
        PapersTab::Papers => (
            app.rendered
                .papers
                .iter()
                .map(|p| {
                    let mut lines = vec![
                        Line::from(Span::styled(
                            truncate_to_width(&p.title, width).into_owned(),
                            app.style("card_title").add_modifier(Modifier::BOLD),
                        )),
                        Line::from(Span::styled(
                            truncate_to_width(&p.authors, width).into_owned(),
                            app.style("text"),
                        )),
                        Line::from(Span::styled(p.venue.clone(), app.style("venue"))),
                        Line::from(Span::styled(
                            truncate_to_width(&p.summary, width).into_owned(),
                            app.style("muted"),
                        )),
                    ];
                    lines.push(topic_line(app, &p.topics, width));
                    lines.push(Line::from(""));
                    ListItem::new(lines)
                })
                .collect(),
            app.selected_paper,
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, focused))
        .title(format!(" {} ", app.papers_tab.title()));

    if items.is_empty() {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled("No items match the current filters", app.style("muted"))),
        ];
        if let Some(key) = app.keybindings.key_for(Context::Papers, Action::ClearFilters) {
            lines.push(Line::from(Span::styled(
                format!("Press {} to clear them", key),
                app.style("muted"),
            )));
        }
        let msg = Paragraph::new(lines).block(block);
        f.render_widget(msg, area);
        return;
    }

    let highlight = if focused {
        app.style("item_selected")
    } else {
        Style::default()
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

/// Item tags, with the ones currently filtered on highlighted.
fn topic_line(app: &App, topics: &[String], width: usize) -> Line<'static> {
    let mut spans = Vec::with_capacity(topics.len() * 2);
    let mut used = 0;
    for topic in topics {
        let label = format!("#{}", topic);
        let label_width = display_width(&label) + 1;
        if used + label_width > width {
            break;
        }
        used += label_width;
        let role = if app.pipeline.topics().contains(topic) {
            "topic_active"
        } else {
            "topic"
        };
        spans.push(Span::styled(label, app.style(role)));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}
