//! TUI rendering for Unveil using ratatui.

mod input;
mod theme;

pub use input::{InputPump, translate_event};
pub use theme::{Palette, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use unveil_engine::{Phase, RevealView};

/// Main draw function
pub fn draw(frame: &mut Frame, view: &RevealView, palette: &Palette) {
    let bg_block = Block::default().style(
        Style::default()
            .bg(palette.bg_dark)
            .fg(palette.text_primary),
    );
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // Names
            Constraint::Length(1), // Status
        ])
        .split(frame.area());

    draw_rows(frame, view, chunks[0], palette);
    draw_status(frame, view.phase, chunks[1], palette);
}

/// Height of the name block: one line per row plus a blank divider between rows.
#[must_use]
pub fn rows_height(rows: usize) -> u16 {
    let height = (rows * 2).saturating_sub(1);
    u16::try_from(height).unwrap_or(u16::MAX)
}

fn draw_rows(frame: &mut Frame, view: &RevealView, area: Rect, palette: &Palette) {
    if view.rows.is_empty() {
        return;
    }

    let mut lines = Vec::with_capacity(view.rows.len() * 2);
    for (index, row) in view.rows.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::styled(row.mask.clone(), styles::token(row.state, palette)));
    }

    let block_width = view
        .rows
        .iter()
        .map(|row| row.mask.as_str().width())
        .max()
        .unwrap_or(0);
    let block_width = u16::try_from(block_width).unwrap_or(u16::MAX);

    let target = centered(area, block_width, rows_height(view.rows.len()));
    frame.render_widget(Paragraph::new(lines), target);
}

fn draw_status(frame: &mut Frame, phase: Phase, area: Rect, palette: &Palette) {
    let Some(text) = status_text(phase) else {
        return;
    };
    let status = Paragraph::new(Line::styled(text, styles::status(palette)))
        .alignment(Alignment::Center);
    frame.render_widget(status, area);
}

#[must_use]
pub fn status_text(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Jumbling => Some("press enter to begin"),
        Phase::Resolving => Some("decrypting…"),
        Phase::AwaitingAck => Some("press enter to finish"),
        Phase::Idle | Phase::Dismissed | Phase::Cancelled => None,
    }
}

/// A `width` x `height` rect centred in `area`, clamped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
