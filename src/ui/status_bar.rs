use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::theme;

/// Render the bottom status bar with keybinding hints
pub fn render(frame: &mut Frame, area: Rect) {
    let line = Line::from(hints());
    let para = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn hints() -> Vec<Span<'static>> {
    vec![
        key("Space"),
        desc("Pause "),
        key("m"),
        desc("Mirror "),
        key("r"),
        desc("Reverse "),
        key("c"),
        desc("Continuity "),
        key("+/-/i"),
        desc("Repeat "),
        key("[/]"),
        desc("Duration "),
        key("d"),
        desc("Delay "),
        key("k"),
        desc("Curve "),
        key("e"),
        desc("Effect "),
        key("l"),
        desc("Log "),
        key("R"),
        desc("Restart "),
        key("q"),
        desc("Quit"),
    ]
}

fn key(k: &'static str) -> Span<'static> {
    Span::styled(format!(" [{k}] "), theme::style_key_hint())
}

fn desc(d: &'static str) -> Span<'static> {
    Span::styled(d, theme::style_key_desc())
}
