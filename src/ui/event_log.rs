use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem};
use ratatui::Frame;

use super::theme;
use crate::app::App;
use anim_loop::LifecycleEvent;

/// Render the lifecycle event log, newest first
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Line::from(Span::styled(
            " Events ",
            theme::style_accent_bold(),
        )))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::style_border())
        .style(theme::style_default());

    let visible = usize::from(area.height.saturating_sub(2));
    let items: Vec<ListItem> = app
        .log
        .iter()
        .rev()
        .take(visible)
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", entry.at.format("%H:%M:%S%.3f")),
                    theme::style_dim(),
                ),
                Span::styled(entry.event.label(), event_style(&entry.event)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn event_style(event: &LifecycleEvent) -> ratatui::style::Style {
    match event {
        LifecycleEvent::Start | LifecycleEvent::Continue => theme::style_active(),
        LifecycleEvent::Pause => theme::style_warning(),
        LifecycleEvent::Cycle { .. } => theme::style_default(),
        LifecycleEvent::Complete => theme::style_secondary(),
    }
}
