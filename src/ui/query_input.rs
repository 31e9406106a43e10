//! Query input widget.
//!
//! A single bordered line showing the expression being typed, with a block
//! cursor at the end of the input.

use crate::session::QuerySession;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_query_input(f: &mut Frame, area: Rect, session: &QuerySession) {
    let input_style = Style::default().fg(Color::White);
    let cursor_style = Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::SLOW_BLINK);

    let line = Line::from(vec![
        Span::styled(session.input().to_string(), input_style),
        Span::styled(" ", cursor_style),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Query ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(widget, area);
}
