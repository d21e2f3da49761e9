use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use super::{effects, theme};
use crate::app::App;
use anim_loop::config::Effect;
use anim_loop::ProgressDriver;

/// Render the stage panel: the progress value through the selected effect
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" Stage · {} ", app.effect.name()),
            theme::style_accent_bold(),
        )))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::style_border_focused())
        .style(theme::style_default());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // Effect
            Constraint::Length(1), // Marker track
            Constraint::Length(1), // Readout
            Constraint::Min(0),
        ])
        .split(inner);

    let progress = app.controller.progress();
    let width = rows[1].width.saturating_sub(4);

    let effect_line = match app.effect {
        Effect::Bar => Line::from(Span::styled(
            effects::bar_string(progress, width),
            theme::style_accent(),
        )),
        Effect::Pulse => Line::from(Span::styled(
            "█".repeat(usize::from(width)),
            Style::default().fg(effects::pulse_color(
                progress,
                theme::PULSE_FROM,
                theme::PULSE_TO,
            )),
        )),
        Effect::Spin => Line::from(Span::styled(
            format!("{}", effects::spinner_frame(progress)),
            theme::style_accent_bold(),
        )),
    };
    frame.render_widget(
        Paragraph::new(effect_line).alignment(Alignment::Center),
        rows[1],
    );

    let offset = usize::from(effects::marker_offset(progress, width));
    let track = format!(
        "{}●{}",
        "─".repeat(offset),
        "─".repeat(usize::from(width).saturating_sub(offset + 1))
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(track, theme::style_dim())))
            .alignment(Alignment::Center),
        rows[2],
    );

    let readout = Line::from(vec![
        Span::styled("progress ", theme::style_dim()),
        Span::styled(format!("{progress:.3}"), theme::style_default()),
        Span::styled("  raw ", theme::style_dim()),
        Span::styled(
            format!("{:.3}", app.controller.driver().value()),
            theme::style_default(),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(readout).alignment(Alignment::Center),
        rows[3],
    );
}
