//! Result pane widget.
//!
//! Shows the rendered value of the last successful query, or the error
//! message of the last failed one. An error does not clear the previous
//! result; both are shown so the user can keep editing against it.

use crate::session::QuerySession;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_result_view(f: &mut Frame, area: Rect, session: &QuerySession) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(error) = session.error() {
        for text_line in error.lines() {
            lines.push(Line::styled(
                text_line.to_string(),
                Style::default().fg(Color::Red),
            ));
        }
        if session.result().is_some() {
            lines.push(Line::raw(""));
        }
    }

    if let Some(result) = session.result() {
        for text_line in result.lines() {
            lines.push(Line::styled(
                text_line.to_string(),
                Style::default().fg(Color::Green),
            ));
        }
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Result ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::parser::from_json;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(session: &QuerySession) -> String {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| render_result_view(f, f.area(), session))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_result_is_shown() {
        let document = from_json(r#"{"a": 42}"#).unwrap();
        let mut session = QuerySession::new(document, Config::default());
        for ch in "_['a']".chars() {
            session.insert_char(ch);
        }
        session.submit();

        let text = draw(&session);
        assert!(text.contains("42"), "result missing: {}", text);
    }

    #[test]
    fn test_error_and_stale_result_coexist() {
        let document = from_json(r#"{"a": 42}"#).unwrap();
        let mut session = QuerySession::new(document, Config::default());
        for ch in "_['a']".chars() {
            session.insert_char(ch);
        }
        session.submit();
        session.clear_input();
        for ch in "_['b']".chars() {
            session.insert_char(ch);
        }
        session.submit();

        let text = draw(&session);
        assert!(text.contains("'b'"), "error missing: {}", text);
        assert!(text.contains("42"), "stale result missing: {}", text);
    }
}
