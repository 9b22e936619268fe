//! AI Economics page: network banner, application cards, and the two
//! simulations.

use crate::animation::{NeuralNetwork, Scene};
use crate::app::App;
use crate::simulation::{Choice, FORECAST_MONTHS, RATE_MAX, RATE_MIN};
use super::render::max_scroll;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap,
    },
    Frame,
};

/// Nodes brighter than this are drawn in the node color, the rest dimmed.
const BRIGHT_AT: f64 = 0.5;

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    render_banner(f, app, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_applications(f, app, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(9)])
        .split(columns[1]);

    render_forecast(f, app, right[0]);
    render_game(f, app, right[1]);
}

fn fg(style: Style) -> Color {
    style.fg.unwrap_or(Color::Reset)
}

/// Page title over the drifting network, or the title alone when
/// animations are off.
fn render_banner(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"));
    let title = Line::from(Span::styled(
        "AI Economics",
        app.style("title").add_modifier(Modifier::BOLD),
    ));
    let subtitle = Line::from(Span::styled(
        "How machine learning is reshaping forecasting, finance and policy",
        app.style("muted"),
    ));

    let Some(Scene::Network(network)) = app.animation.as_ref().map(|a| &a.scene) else {
        let text = Paragraph::new(vec![Line::from(""), title, subtitle])
            .centered()
            .block(block);
        f.render_widget(text, area);
        return;
    };

    let (width, height) = network.bounds();
    let (bright, dim) = split_by_brightness(network);
    let segments: Vec<(f64, f64, f64, f64)> = network
        .edges()
        .into_iter()
        .map(|(a, b)| {
            let (a, b) = (&network.nodes()[a], &network.nodes()[b]);
            (a.x, a.y, b.x, b.y)
        })
        .collect();
    let edge_color = fg(app.style("network_edge"));
    let node_color = fg(app.style("network_node"));
    let dim_color = fg(app.style("muted"));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            for (x1, y1, x2, y2) in &segments {
                ctx.draw(&CanvasLine {
                    x1: *x1,
                    y1: *y1,
                    x2: *x2,
                    y2: *y2,
                    color: edge_color,
                });
            }
            ctx.draw(&Points {
                coords: &dim,
                color: dim_color,
            });
            ctx.draw(&Points {
                coords: &bright,
                color: node_color,
            });
            ctx.layer();
            ctx.print(width * 0.05, height * 0.6, title.clone());
            ctx.print(width * 0.05, height * 0.25, subtitle.clone());
        });

    f.render_widget(canvas, area);
}

fn split_by_brightness(network: &NeuralNetwork) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut bright = Vec::new();
    let mut dim = Vec::new();
    for (i, node) in network.nodes().iter().enumerate() {
        if network.brightness(i) >= BRIGHT_AT {
            bright.push((node.x, node.y));
        } else {
            dim.push((node.x, node.y));
        }
    }
    (bright, dim)
}

/// Application category cards, scrolled with j/k.
fn render_applications(f: &mut Frame, app: &mut App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for card in &app.applications {
        lines.push(Line::from(Span::styled(
            card.title.clone(),
            app.style("card_title").add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            card.description.clone(),
            app.style("text"),
        )));
        for list in &card.lists {
            for entry in list {
                lines.push(Line::from(vec![
                    Span::styled("  \u{2022} ", app.style("muted")),
                    Span::styled(entry.clone(), app.style("text")),
                ]));
            }
        }
        for stat in &card.stats {
            lines.push(Line::from(Span::styled(
                format!("  {}", stat),
                app.style("card_stat"),
            )));
        }
        lines.push(Line::from(""));
    }

    app.economics_max_scroll = max_scroll(
        &lines,
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
        true,
    );
    app.economics_scroll = app.economics_scroll.min(app.economics_max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(" Applications "),
        )
        .wrap(Wrap { trim: true })
        .scroll((app.economics_scroll, 0));
    f.render_widget(paragraph, area);
}

/// Twelve-month growth forecast driven by the rate slider.
fn render_forecast(f: &mut Frame, app: &App, area: Rect) {
    let points = app.forecast.points();
    let axis_style = app.style("chart_axis");

    let datasets = vec![Dataset::default()
        .name(app.forecast.label())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(app.style("chart_line"))
        .data(&points)];

    let last_month = (FORECAST_MONTHS - 1) as f64;
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(format!(" Forecast: {} ", app.forecast.label()))
                .title_bottom(Line::from(Span::styled(
                    " Left/Right adjusts the rate ",
                    app.style("muted"),
                ))),
        )
        .x_axis(
            Axis::default()
                .title("Month")
                .style(axis_style)
                .bounds([0.0, last_month])
                .labels(["1", "6", "12"]),
        )
        .y_axis(
            Axis::default()
                .title("%")
                .style(axis_style)
                .bounds([RATE_MIN - 1.0, RATE_MAX + 1.0])
                .labels(["-1", "5", "11"]),
        );
    f.render_widget(chart, area);
}

/// Safe/risky choice with the model's canned read on it.
fn render_game(f: &mut Frame, app: &App, area: Rect) {
    let choice_span = |choice: Choice, key: &str| {
        let style = if app.game.choice() == Some(choice) {
            app.style("choice_selected")
        } else {
            app.style("text")
        };
        Span::styled(format!("[{}] {}", key, choice.label()), style)
    };

    let lines = vec![
        Line::from(vec![
            choice_span(Choice::Safe, "1"),
            Span::raw("   "),
            choice_span(Choice::Risky, "2"),
        ]),
        Line::from(""),
        Line::from(Span::styled(app.game.prediction(), app.style("muted"))),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(" Behavioral Prediction "),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
