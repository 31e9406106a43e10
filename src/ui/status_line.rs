//! Status line widget.
//!
//! One line at the bottom: the file being queried on the left, the key
//! bindings on the right.
//!
//! Example: `data.json                Enter: run  Tab: complete  Esc: quit`

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const KEY_HINTS: &str = "Enter: run  Tab: complete  \u{2191}/\u{2193}: select  Esc: quit";

pub fn render_status_line(f: &mut Frame, area: Rect, source_name: &str) {
    let style = Style::default().fg(Color::Black).bg(Color::Gray);

    let total_width = area.width as usize;
    let left_len = source_name.len();
    let padding = if left_len + KEY_HINTS.len() + 1 < total_width {
        total_width - left_len - KEY_HINTS.len()
    } else {
        1
    };

    let line = Line::from(vec![
        Span::styled(source_name.to_string(), style),
        Span::styled(" ".repeat(padding), style),
        Span::styled(KEY_HINTS, style),
    ]);

    f.render_widget(Paragraph::new(line), area);
}
