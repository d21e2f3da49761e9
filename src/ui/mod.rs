pub mod details;
pub mod effects;
pub mod event_log;
pub mod header;
pub mod stage;
pub mod status_bar;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;

/// Top-level draw function
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(7), // Stage
            Constraint::Min(6),    // Details + log
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    header::render(f, app, rows[0]);
    stage::render(f, app, rows[1]);

    if app.show_log {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[2]);
        details::render(f, app, cols[0]);
        event_log::render(f, app, cols[1]);
    } else {
        details::render(f, app, rows[2]);
    }

    status_bar::render(f, rows[3]);

    if let Some(ref message) = app.toast_message {
        render_toast(f, message, app.toast_is_error);
    }
}

/// Transient notification in the top-right corner
fn render_toast(f: &mut Frame, message: &str, is_error: bool) {
    let area = f.area();
    let wanted = u16::try_from(message.chars().count() + 6).unwrap_or(u16::MAX);
    let width = wanted.min(area.width.saturating_sub(4));
    let x = area.width.saturating_sub(width + 2);
    let toast_area = Rect::new(x, 1, width, 3).intersection(area);

    f.render_widget(Clear, toast_area);

    let color = if is_error { theme::ERROR } else { theme::ACTIVE };
    let icon = if is_error { " ✗ " } else { " ✓ " };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let text = Paragraph::new(Line::from(vec![
        Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(message, theme::style_default()),
    ]))
    .block(block);

    f.render_widget(text, toast_area);
}
