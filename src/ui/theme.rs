use ratatui::style::{Color, Modifier, Style};

// ─── Icons ────────────────────────────────────────────────────────────────
pub const ICON_PLAY: &str = "▶ ";
pub const ICON_PAUSE: &str = "⏸ ";
pub const ICON_DONE: &str = "■ ";
pub const ICON_IDLE: &str = "○ ";

// ─── Color Palette (terminal-adaptive, transparency-friendly) ──────────

/// Background: always Reset (transparent), respects terminal background
pub const BG: Color = Color::Reset;

/// Primary text color
pub const FG: Color = Color::White;

/// Dimmed text (labels, inactive elements)
pub const FG_DIM: Color = Color::DarkGray;

/// Accent color (active borders, keybinding hints)
pub const ACCENT: Color = Color::Cyan;

/// Secondary accent
pub const ACCENT2: Color = Color::Magenta;

/// Border color (inactive)
pub const BORDER: Color = Color::DarkGray;

/// Border color (focused/active panel)
pub const BORDER_FOCUSED: Color = Color::Cyan;

/// Running / success indicator
pub const ACTIVE: Color = Color::Green;

/// Paused indicator
pub const WARNING: Color = Color::Yellow;

/// Error color
pub const ERROR: Color = Color::Red;

/// Pulse effect endpoints (RGB)
pub const PULSE_FROM: (u8, u8, u8) = (20, 40, 60);
pub const PULSE_TO: (u8, u8, u8) = (0, 220, 255);

// ─── Style Constructors ──────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(FG).bg(BG)
}

pub fn style_dim() -> Style {
    Style::default().fg(FG_DIM).bg(BG)
}

pub fn style_accent() -> Style {
    Style::default().fg(ACCENT).bg(BG)
}

pub fn style_accent_bold() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG)
        .add_modifier(Modifier::BOLD)
}

pub fn style_secondary() -> Style {
    Style::default().fg(ACCENT2).bg(BG)
}

pub fn style_active() -> Style {
    Style::default()
        .fg(ACTIVE)
        .bg(BG)
        .add_modifier(Modifier::BOLD)
}

pub fn style_warning() -> Style {
    Style::default().fg(WARNING).bg(BG)
}

pub fn style_border() -> Style {
    Style::default().fg(BORDER).bg(BG)
}

pub fn style_border_focused() -> Style {
    Style::default().fg(BORDER_FOCUSED).bg(BG)
}

pub fn style_key_hint() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG)
        .add_modifier(Modifier::BOLD)
}

pub fn style_key_desc() -> Style {
    Style::default().fg(FG_DIM).bg(BG)
}
