//! Palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const SKY: Color = Color::Rgb(125, 207, 255); // #7dcfff
pub const VIOLET: Color = Color::Rgb(187, 154, 247); // #bb9af7
pub const AMBER: Color = Color::Rgb(224, 175, 104); // #e0af68
pub const LEAF: Color = Color::Rgb(158, 206, 106); // #9ece6a
pub const ROSE: Color = Color::Rgb(247, 118, 142); // #f7768e

pub const FOG: Color = Color::Rgb(192, 202, 245); // #c0caf5
pub const SLATE: Color = Color::Rgb(86, 95, 137); // #565f89
pub const NIGHT: Color = Color::Rgb(26, 27, 38); // #1a1b26
pub const DUSK: Color = Color::Rgb(41, 46, 66); // #292e42

// ── Chrome ────────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(VIOLET)
}

pub fn border_default() -> Style {
    Style::default().fg(SLATE)
}

pub fn tab_active() -> Style {
    Style::default().fg(VIOLET).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(FOG)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(SLATE)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::BOLD)
}

// ── Tables ────────────────────────────────────────────────────────────

pub fn table_header() -> Style {
    Style::default()
        .fg(SKY)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(FOG)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(VIOLET)
        .bg(DUSK)
        .add_modifier(Modifier::BOLD)
}

// ── Routes ────────────────────────────────────────────────────────────

/// Best route for its prefix.
pub fn primary_route() -> Style {
    Style::default().fg(LEAF)
}

pub fn blackhole() -> Style {
    Style::default().fg(ROSE).add_modifier(Modifier::BOLD)
}

/// Cells linking elsewhere (neighbour, route server).
pub fn link() -> Style {
    Style::default().fg(SKY).add_modifier(Modifier::UNDERLINED)
}

// ── Pagination ────────────────────────────────────────────────────────

pub fn page_active() -> Style {
    Style::default()
        .fg(NIGHT)
        .bg(VIOLET)
        .add_modifier(Modifier::BOLD)
}

pub fn page_link() -> Style {
    Style::default().fg(FOG)
}

pub fn page_disabled() -> Style {
    Style::default().fg(SLATE).add_modifier(Modifier::DIM)
}

// ── Status ────────────────────────────────────────────────────────────

pub fn muted() -> Style {
    Style::default().fg(SLATE)
}

pub fn error() -> Style {
    Style::default().fg(ROSE).add_modifier(Modifier::BOLD)
}

pub fn warning() -> Style {
    Style::default().fg(AMBER)
}

pub fn success() -> Style {
    Style::default().fg(LEAF)
}
