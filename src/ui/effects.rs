//! Progress → presentation mappings. All pure and stateless.

use ratatui::style::Color;

use anim_loop::animation::lerp;

/// Braille dot spinner frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Text bar with eighth-block resolution on the leading edge
pub fn bar_string(progress: f32, width: u16) -> String {
    const PARTIALS: &[char] = &[' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];
    let exact = progress.clamp(0.0, 1.0) * f32::from(width);
    let full = exact.floor() as usize;
    let width = usize::from(width);
    let mut out = "█".repeat(full.min(width));
    if full < width {
        let eighth = ((exact - full as f32) * 8.0).floor() as usize;
        out.push(PARTIALS[eighth.min(PARTIALS.len() - 1)]);
        out.push_str(&" ".repeat(width - full - 1));
    }
    out
}

/// Interpolate between two RGB colors
pub fn pulse_color(progress: f32, from: (u8, u8, u8), to: (u8, u8, u8)) -> Color {
    let channel = |a: u8, b: u8| lerp(f32::from(a), f32::from(b), progress).round() as u8;
    Color::Rgb(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

/// Spinner frame for `progress`; one full turn per leg
pub fn spinner_frame(progress: f32) -> char {
    let len = SPINNER_FRAMES.len();
    let idx = (progress.clamp(0.0, 1.0) * len as f32) as usize;
    SPINNER_FRAMES[idx.min(len - 1)]
}

/// Horizontal offset of a marker travelling across `width` cells
pub fn marker_offset(progress: f32, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let span = f32::from(width - 1);
    (lerp(0.0, span, progress).round() as u16).min(width - 1)
}
