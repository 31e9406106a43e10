/// UI module for the jsonprobe terminal interface.
///
/// Layout, top to bottom: the query input line, the completion suggestion
/// list, the result pane, and a one-line status bar.
pub mod query_input;
pub mod result_view;
pub mod status_line;
pub mod suggestion_list;

use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;

use crate::session::QuerySession;

/// Main UI structure that manages the terminal interface rendering.
pub struct UI {
    source_name: String,
}

impl UI {
    /// Creates a new UI for the given source (a filename or "stdin").
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
        }
    }

    /// Renders the full interface for the current session state.
    pub fn render<B: Backend>(
        &self,
        terminal: &mut Terminal<B>,
        session: &QuerySession,
    ) -> Result<()> {
        terminal.draw(|f| {
            let suggestion_rows = session.suggestions().len().min(10) as u16;

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),               // query input
                    Constraint::Length(suggestion_rows), // suggestions
                    Constraint::Min(3),                  // result pane
                    Constraint::Length(1),               // status line
                ])
                .split(f.area());

            query_input::render_query_input(f, chunks[0], session);
            suggestion_list::render_suggestion_list(f, chunks[1], session);
            result_view::render_result_view(f, chunks[2], session);
            status_line::render_status_line(f, chunks[3], &self.source_name);
        })?;

        Ok(())
    }
}
