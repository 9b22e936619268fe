//! Color themes.
//!
//! Widgets ask for a semantic role (`"nav_active"`, `"footnote_ref"`, ...) and
//! the active [`StyleMap`] answers with a concrete `Style`. Two palettes exist;
//! the chosen variant is persisted as the `theme` preference.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

/// Accent used across both palettes (teal).
const ACCENT: Color = Color::Rgb(0x1f, 0xb8, 0xcd);
/// Darker teal that stays readable on white.
const ACCENT_DEEP: Color = Color::Rgb(0x21, 0x80, 0x8d);

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    Dark,
    #[default]
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// The other variant.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Value stored in the preference table.
    pub fn key(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Display name for the status bar.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Chrome --
    pub nav_tab: Style,
    pub nav_active: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub title: Style,
    pub text: Style,
    pub muted: Style,
    pub error: Style,

    // -- Catalog lists --
    pub item_selected: Style,
    pub topic: Style,
    pub topic_active: Style,
    pub date: Style,
    pub venue: Style,
    pub link: Style,
    pub search_prompt: Style,

    // -- Application cards and simulations --
    pub card_title: Style,
    pub card_stat: Style,
    pub chart_line: Style,
    pub chart_axis: Style,
    pub choice_selected: Style,

    // -- Research document --
    pub doc_heading: Style,
    pub doc_emphasis: Style,
    pub doc_strong: Style,
    pub doc_code: Style,
    pub footnote_ref: Style,
    pub footnote_active: Style,

    // -- Animations --
    pub particle: Style,
    pub network_node: Style,
    pub network_edge: Style,
    pub hero: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            nav_tab: Style::default().fg(Color::Gray),
            nav_active: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(ACCENT),
            title: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::Gray),
            muted: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::LightRed),

            item_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            topic: Style::default().fg(Color::Gray),
            topic_active: Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
            date: Style::default().fg(ACCENT),
            venue: Style::default().fg(Color::Yellow),
            link: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            search_prompt: Style::default().fg(Color::Yellow),

            card_title: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            card_stat: Style::default().fg(Color::Yellow),
            chart_line: Style::default().fg(ACCENT),
            chart_axis: Style::default().fg(Color::Gray),
            choice_selected: Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),

            doc_heading: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            doc_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            doc_strong: Style::default().add_modifier(Modifier::BOLD),
            doc_code: Style::default().fg(Color::Yellow),
            footnote_ref: Style::default().fg(ACCENT),
            footnote_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            particle: Style::default().fg(ACCENT),
            network_node: Style::default().fg(ACCENT),
            network_edge: Style::default().fg(Color::DarkGray),
            hero: Style::default().fg(Color::White),
        }
    }

    fn light() -> Self {
        Self {
            nav_tab: Style::default().fg(Color::DarkGray),
            nav_active: Style::default()
                .fg(ACCENT_DEEP)
                .add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::Gray),
            panel_border_focused: Style::default().fg(ACCENT_DEEP),
            title: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::Black),
            muted: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),

            item_selected: Style::default().bg(ACCENT_DEEP).fg(Color::White),
            topic: Style::default().fg(Color::DarkGray),
            topic_active: Style::default()
                .fg(Color::White)
                .bg(ACCENT_DEEP)
                .add_modifier(Modifier::BOLD),
            date: Style::default().fg(ACCENT_DEEP),
            venue: Style::default().fg(Color::Magenta),
            link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            search_prompt: Style::default().fg(Color::Magenta),

            card_title: Style::default()
                .fg(ACCENT_DEEP)
                .add_modifier(Modifier::BOLD),
            card_stat: Style::default().fg(Color::Magenta),
            chart_line: Style::default().fg(ACCENT_DEEP),
            chart_axis: Style::default().fg(Color::DarkGray),
            choice_selected: Style::default()
                .fg(Color::White)
                .bg(ACCENT_DEEP)
                .add_modifier(Modifier::BOLD),

            doc_heading: Style::default()
                .fg(ACCENT_DEEP)
                .add_modifier(Modifier::BOLD),
            doc_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            doc_strong: Style::default().add_modifier(Modifier::BOLD),
            doc_code: Style::default().fg(Color::DarkGray),
            footnote_ref: Style::default().fg(ACCENT_DEEP),
            footnote_active: Style::default()
                .fg(Color::White)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            particle: Style::default().fg(ACCENT_DEEP),
            network_node: Style::default().fg(ACCENT_DEEP),
            network_edge: Style::default().fg(Color::Gray),
            hero: Style::default().fg(Color::Black),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// Role-name lookup built from a [`ColorPalette`].
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

const ROLE_COUNT: usize = 31;

/// All role names, in palette field order.
pub const ROLE_NAMES: [&str; ROLE_COUNT] = [
    "nav_tab",
    "nav_active",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "title",
    "text",
    "muted",
    "error",
    "item_selected",
    "topic",
    "topic_active",
    "date",
    "venue",
    "link",
    "search_prompt",
    "card_title",
    "card_stat",
    "chart_line",
    "chart_axis",
    "choice_selected",
    "doc_heading",
    "doc_emphasis",
    "doc_strong",
    "doc_code",
    "footnote_ref",
    "footnote_active",
    "particle",
    "network_node",
    "network_edge",
    "hero",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; ROLE_COUNT] = [
            p.nav_tab,
            p.nav_active,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.title,
            p.text,
            p.muted,
            p.error,
            p.item_selected,
            p.topic,
            p.topic_active,
            p.date,
            p.venue,
            p.link,
            p.search_prompt,
            p.card_title,
            p.card_stat,
            p.chart_line,
            p.chart_axis,
            p.choice_selected,
            p.doc_heading,
            p.doc_emphasis,
            p.doc_strong,
            p.doc_code,
            p.footnote_ref,
            p.footnote_active,
            p.particle,
            p.network_node,
            p.network_edge,
            p.hero,
        ];
        Self {
            map: ROLE_NAMES.into_iter().zip(styles).collect(),
        }
    }

    pub fn for_variant(variant: ThemeVariant) -> Self {
        Self::from_palette(&variant.palette())
    }

    /// Style for `role`, or `Style::default()` for an unknown role.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}
