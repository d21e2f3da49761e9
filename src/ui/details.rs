use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use super::theme;
use crate::app::App;
use anim_loop::{CycleState, ProgressDriver};

/// Render the loop detail panel: state, counters and configuration
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Line::from(Span::styled(
            " Loop ",
            theme::style_accent_bold(),
        )))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::style_border())
        .style(theme::style_default());

    let ctrl = &app.controller;
    let config = ctrl.config();

    let state_style = match ctrl.state() {
        CycleState::Active => theme::style_active(),
        CycleState::Paused => theme::style_warning(),
        CycleState::Completed => theme::style_secondary(),
        CycleState::Idle => theme::style_dim(),
    };

    let cycles = match config.repeat.total_cycles() {
        Some(total) => format!("{} / {}", ctrl.cycle(), total),
        None => format!("{} / ∞", ctrl.cycle()),
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<14}", "  State"), theme::style_dim()),
        Span::styled(ctrl.state().name(), state_style),
    ]));
    lines.push(detail_line("  Cycle", &cycles));
    lines.push(detail_line("  Driver", ctrl.driver().status().name()));
    lines.push(detail_line(
        "  Pending",
        if ctrl.has_pending_transition() {
            "waiting"
        } else {
            "—"
        },
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  ── Config ──",
        theme::style_accent(),
    )));
    lines.push(Line::from(""));
    lines.push(detail_line("  Repeat", &config.repeat.to_string()));
    lines.push(flag_line("  Mirror", config.mirror));
    lines.push(flag_line("  Reverse", config.reverse));
    lines.push(flag_line("  Continuity", config.continuity));
    lines.push(detail_line("  Curve", config.curve.name()));
    lines.push(detail_line(
        "  Duration",
        &format!(
            "{} / {} ms",
            config.duration.as_millis(),
            config.effective_backward_duration().as_millis()
        ),
    ));
    lines.push(detail_line(
        "  Delay",
        &format!(
            "{} / {} ms",
            config.delay.as_millis(),
            config.effective_backward_delay().as_millis()
        ),
    ));

    let para = Paragraph::new(lines)
        .block(block)
        .style(theme::style_default());

    frame.render_widget(para, area);
}

/// Build a key-value detail line (owns its data)
fn detail_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), theme::style_dim()),
        Span::styled(value.to_string(), theme::style_default()),
    ])
}

fn flag_line(label: &str, on: bool) -> Line<'static> {
    let (text, style) = if on {
        ("on", theme::style_active())
    } else {
        ("off", theme::style_dim())
    };
    Line::from(vec![
        Span::styled(format!("{:<14}", label), theme::style_dim()),
        Span::styled(text, style),
    ])
}
