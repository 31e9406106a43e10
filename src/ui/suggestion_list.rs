//! Completion suggestion list widget.
//!
//! Shows the current path suggestions under the input line, highlighting
//! the selected entry.

use crate::session::QuerySession;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{List, ListItem},
    Frame,
};

pub fn render_suggestion_list(f: &mut Frame, area: Rect, session: &QuerySession) {
    let normal = Style::default().fg(Color::Gray);
    let highlighted = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = session
        .suggestions()
        .iter()
        .enumerate()
        .map(|(i, suggestion)| {
            let style = if session.selected() == Some(i) {
                highlighted
            } else {
                normal
            };
            ListItem::new(Line::styled(format!("  {}", suggestion), style))
        })
        .collect();

    f.render_widget(List::new(items), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::parser::from_json;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_suggestions_are_listed() {
        let backend = TestBackend::new(80, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let document = from_json(r#"{"alpha": 1, "beta": 2}"#).unwrap();
        let session = QuerySession::new(document, Config::default());

        terminal
            .draw(|f| render_suggestion_list(f, f.area(), &session))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("_['alpha']"), "missing suggestion: {}", text);
        assert!(text.contains("_['beta']"), "missing suggestion: {}", text);
    }

    #[test]
    fn test_selected_entry_is_highlighted() {
        let backend = TestBackend::new(80, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let document = from_json(r#"{"alpha": 1, "beta": 2}"#).unwrap();
        let mut session = QuerySession::new(document, Config::default());
        session.select_next();

        terminal
            .draw(|f| render_suggestion_list(f, f.area(), &session))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let highlighted = buffer
            .content()
            .iter()
            .any(|c| c.bg == Color::Cyan);
        assert!(highlighted, "no highlighted cell found");
    }
}
