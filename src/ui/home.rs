//! Home page: intro over the particle field, and the wireframe cube.

use crate::animation::{Scene, SCENE_HEIGHT, SCENE_WIDTH};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders,
    },
    Frame,
};

/// Particles past this share of their lifetime are drawn dimmed.
const FADE_AT: f64 = 0.7;

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_intro(f, app, chunks[0]);
    render_hero(f, app, chunks[1]);
}

fn fg(style: Style) -> Color {
    style.fg.unwrap_or(Color::Reset)
}

/// Intro text printed over the rising particles.
fn render_intro(f: &mut Frame, app: &App, area: Rect) {
    let mut fresh: Vec<(f64, f64)> = Vec::new();
    let mut fading: Vec<(f64, f64)> = Vec::new();
    if let Some(Scene::Home { particles, .. }) = app.animation.as_ref().map(|a| &a.scene) {
        for p in particles.particles() {
            if p.progress() < FADE_AT {
                fresh.push((p.x, p.y));
            } else {
                fading.push((p.x, p.y));
            }
        }
    }

    let catalog = app.pipeline.catalog();
    let summary = format!(
        "{} conferences | {} papers | {} application areas",
        catalog.conferences.len(),
        catalog.papers.len(),
        catalog.applications.len()
    );
    let title_style = app.style("title").add_modifier(Modifier::BOLD);
    let text_style = app.style("text");
    let muted_style = app.style("muted");
    let particle_color = fg(app.style("particle"));
    let fading_color = fg(muted_style);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border")),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, SCENE_WIDTH])
        .y_bounds([0.0, SCENE_HEIGHT])
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &fading,
                color: fading_color,
            });
            ctx.draw(&Points {
                coords: &fresh,
                color: particle_color,
            });
            ctx.layer();

            let left = 6.0;
            let top = SCENE_HEIGHT * 0.7;
            ctx.print(left, top, Line::from(Span::styled("AI in Economics", title_style)));
            ctx.print(
                left,
                top - 6.0,
                Line::from(Span::styled(
                    "Where machine learning meets economic research.",
                    text_style,
                )),
            );
            ctx.print(
                left,
                top - 12.0,
                Line::from(Span::styled(summary.clone(), text_style)),
            );
            ctx.print(
                left,
                top - 24.0,
                Line::from(Span::styled(
                    "Tab or swipe to explore, : for commands, ? for help",
                    muted_style,
                )),
            );
        });

    f.render_widget(canvas, area);
}

/// Wireframe cube. Records its inner area for pointer hit-testing.
fn render_hero(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(Span::styled(" Click to spin ", app.style("muted")));
    let inner = block.inner(area);
    if inner.width < 2 || inner.height < 2 {
        app.hero_area = None;
        f.render_widget(block, area);
        return;
    }
    app.hero_area = Some(inner);

    // Braille dots are square on 1:2 cells; y spans 4 units, so x spans 2w/h.
    let half_x = f64::from(inner.width) / f64::from(inner.height);
    let edges = app.hero().projected_edges(0.0, 0.0, 0.8);
    let color = fg(app.style("hero"));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-half_x, half_x])
        .y_bounds([-2.0, 2.0])
        .paint(move |ctx| {
            for ((x1, y1), (x2, y2)) in &edges {
                ctx.draw(&CanvasLine {
                    x1: *x1,
                    y1: *y1,
                    x2: *x2,
                    y2: *y2,
                    color,
                });
            }
        });

    f.render_widget(canvas, area);
}
