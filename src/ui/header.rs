use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use super::{effects, theme};
use crate::app::App;
use anim_loop::CycleState;

/// Render the application header bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" ◐ ", theme::style_accent_bold()),
        Span::styled("anim-loop ", theme::style_accent_bold()),
    ]);

    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::style_border_focused())
        .style(theme::style_default());

    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: 1,
    };

    let status = Paragraph::new(Line::from(status_spans(app))).alignment(Alignment::Right);
    frame.render_widget(status, inner);

    let left = Line::from(vec![
        Span::styled("  cycle ", theme::style_dim()),
        Span::styled(app.controller.cycle().to_string(), theme::style_default()),
        Span::styled("  ticks ", theme::style_dim()),
        Span::styled(app.tick_count.to_string(), theme::style_default()),
    ]);
    frame.render_widget(Paragraph::new(left).alignment(Alignment::Left), inner);
}

/// Build the state indicator on the right-hand side
fn status_spans(app: &App) -> Vec<Span<'static>> {
    match app.controller.state() {
        CycleState::Active => {
            let spin = effects::spinner_frame(app.controller.progress());
            vec![
                Span::styled(format!("{spin} "), theme::style_accent()),
                Span::styled(theme::ICON_PLAY, theme::style_active()),
                Span::styled("Running ", theme::style_active()),
            ]
        }
        CycleState::Paused => vec![
            Span::styled(theme::ICON_PAUSE, theme::style_warning()),
            Span::styled("Paused ", theme::style_warning()),
        ],
        CycleState::Completed => vec![
            Span::styled(theme::ICON_DONE, theme::style_secondary()),
            Span::styled("Completed ", theme::style_secondary()),
        ],
        CycleState::Idle => vec![
            Span::styled(theme::ICON_IDLE, theme::style_dim()),
            Span::styled("Idle ", theme::style_dim()),
        ],
    }
}
