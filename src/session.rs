//! Interactive query session state.
//!
//! Holds everything the TUI renders: the current input line, the live
//! completion suggestions, the selection within them, the rendered result
//! or error of the last submitted query, and the query history. Input
//! handling mutates this state; the UI layer only reads it.

use crate::completion::{FuzzyMatcher, PathIndex};
use crate::config::Config;
use crate::document::Value;
use crate::query;
use crate::render;

pub struct QuerySession {
    document: Value,
    matcher: FuzzyMatcher,
    config: Config,
    input: String,
    suggestions: Vec<String>,
    selected: Option<usize>,
    result: Option<String>,
    error: Option<String>,
    history: Vec<String>,
    history_cursor: Option<usize>,
}

impl QuerySession {
    pub fn new(document: Value, config: Config) -> Self {
        let index = PathIndex::build(&document);
        let matcher = FuzzyMatcher::from(index);
        let mut session = Self {
            document,
            matcher,
            config,
            input: String::new(),
            suggestions: Vec::new(),
            selected: None,
            result: None,
            error: None,
            history: Vec::new(),
            history_cursor: None,
        };
        session.refresh_suggestions();
        session
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.push(ch);
        self.history_cursor = None;
        self.refresh_suggestions();
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.history_cursor = None;
        self.refresh_suggestions();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.history_cursor = None;
        self.refresh_suggestions();
    }

    /// Moves the suggestion selection down, wrapping at the end.
    pub fn select_next(&mut self) {
        if self.suggestions.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.suggestions.len() => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    /// Moves the suggestion selection up, wrapping at the start.
    pub fn select_prev(&mut self) {
        if self.suggestions.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.suggestions.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// Completes the input line.
    ///
    /// A highlighted suggestion wins; otherwise a sole suggestion is taken
    /// whole; otherwise the input is extended by the longest prefix shared
    /// by every key that matches the open fragment.
    pub fn complete(&mut self) {
        if let Some(i) = self.selected {
            if let Some(suggestion) = self.suggestions.get(i) {
                self.input = suggestion.clone();
                self.refresh_suggestions();
                return;
            }
        }

        if self.suggestions.len() == 1 {
            self.input = self.suggestions[0].clone();
            self.refresh_suggestions();
            return;
        }

        if let Some((base, partial)) = crate::completion::matcher::split_open_key(&self.input) {
            let keys = self.matcher.find_keys_at_path(base, partial);
            let common = FuzzyMatcher::common_prefix(&keys);
            if common.len() > partial.len() {
                self.input = format!("{}['{}", base, common);
                self.refresh_suggestions();
            }
        }
    }

    /// Evaluates the current input against the document.
    ///
    /// On success the rendered result replaces any previous output and the
    /// query is appended to history; on failure the error message is shown
    /// and the previous result is kept.
    pub fn submit(&mut self) {
        match query::evaluate(&self.input, &self.document) {
            Ok(value) => {
                self.result = Some(render::format_value(&value));
                self.error = None;
                self.push_history();
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }
        self.history_cursor = None;
    }

    /// Recalls the previous history entry into the input line.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let cursor = match self.history_cursor {
            Some(0) => 0,
            Some(i) => i - 1,
            None => self.history.len() - 1,
        };
        self.history_cursor = Some(cursor);
        self.input = self.history[cursor].clone();
        self.refresh_suggestions();
    }

    /// Recalls the next history entry, or clears the input past the newest.
    pub fn history_next(&mut self) {
        let Some(cursor) = self.history_cursor else {
            return;
        };
        if cursor + 1 < self.history.len() {
            self.history_cursor = Some(cursor + 1);
            self.input = self.history[cursor + 1].clone();
        } else {
            self.history_cursor = None;
            self.input.clear();
        }
        self.refresh_suggestions();
    }

    fn push_history(&mut self) {
        let entry = self.input.trim().to_string();
        if entry.is_empty() {
            return;
        }
        if self.history.last().map(String::as_str) == Some(entry.as_str()) {
            return;
        }
        self.history.push(entry);
        while self.history.len() > self.config.history_limit {
            self.history.remove(0);
        }
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = self
            .matcher
            .find_matches(self.input.trim(), self.config.max_suggestions);
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::from_json;

    fn session() -> QuerySession {
        let document = from_json(
            r#"{
                "items": [{"name": "Alice"}, {"name": "Bob"}],
                "index": 7,
                "title": "people"
            }"#,
        )
        .unwrap();
        QuerySession::new(document, Config::default())
    }

    fn type_in(session: &mut QuerySession, text: &str) {
        for ch in text.chars() {
            session.insert_char(ch);
        }
    }

    #[test]
    fn test_fresh_session_suggests_top_level_paths() {
        let session = session();
        assert_eq!(
            session.suggestions(),
            &["_['items']", "_['index']", "_['title']"]
        );
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_typing_narrows_suggestions() {
        let mut session = session();
        type_in(&mut session, "_['it");
        assert_eq!(session.suggestions(), &["_['items']", "_['title']"]);
    }

    #[test]
    fn test_selection_wraps() {
        let mut session = session();
        session.select_next();
        assert_eq!(session.selected(), Some(0));
        session.select_prev();
        assert_eq!(session.selected(), Some(2));
        session.select_next();
        assert_eq!(session.selected(), Some(0));
    }

    #[test]
    fn test_complete_takes_highlighted_suggestion() {
        let mut session = session();
        session.select_next();
        session.select_next();
        session.complete();
        assert_eq!(session.input(), "_['index']");
    }

    #[test]
    fn test_complete_takes_sole_suggestion() {
        let mut session = session();
        type_in(&mut session, "_['ti");
        assert_eq!(session.suggestions().len(), 1);
        session.complete();
        assert_eq!(session.input(), "_['title']");
    }

    #[test]
    fn test_complete_extends_common_prefix() {
        let mut session = session();
        type_in(&mut session, "_['i");
        session.complete();
        // "items" and "index" share "i", already typed, so input is unchanged
        assert_eq!(session.input(), "_['i");

        let document = from_json(r#"{"network_a": 1, "network_b": 2}"#).unwrap();
        let mut session = QuerySession::new(document, Config::default());
        type_in(&mut session, "_['net");
        session.complete();
        assert_eq!(session.input(), "_['network_");
    }

    #[test]
    fn test_submit_renders_result_and_records_history() {
        let mut session = session();
        type_in(&mut session, "_['items'][1]['name']");
        session.submit();
        assert_eq!(session.result(), Some("\"Bob\""));
        assert_eq!(session.error(), None);
        assert_eq!(session.history(), &["_['items'][1]['name']"]);
    }

    #[test]
    fn test_submit_error_keeps_previous_result() {
        let mut session = session();
        type_in(&mut session, "_['index']");
        session.submit();
        assert_eq!(session.result(), Some("7"));

        session.clear_input();
        type_in(&mut session, "_['missing']");
        session.submit();
        assert!(session.error().unwrap().contains("'missing'"));
        assert_eq!(session.result(), Some("7"));
        assert_eq!(session.history(), &["_['index']"]);
    }

    #[test]
    fn test_history_navigation() {
        let mut session = session();
        type_in(&mut session, "_['index']");
        session.submit();
        session.clear_input();
        type_in(&mut session, "_['title']");
        session.submit();

        session.clear_input();
        session.history_prev();
        assert_eq!(session.input(), "_['title']");
        session.history_prev();
        assert_eq!(session.input(), "_['index']");
        session.history_next();
        assert_eq!(session.input(), "_['title']");
        session.history_next();
        assert_eq!(session.input(), "");
    }

    #[test]
    fn test_history_dedups_consecutive_and_respects_limit() {
        let document = from_json(r#"{"a": 1}"#).unwrap();
        let config = Config {
            history_limit: 2,
            ..Config::default()
        };
        let mut session = QuerySession::new(document, config);

        type_in(&mut session, "_['a']");
        session.submit();
        session.submit();
        assert_eq!(session.history().len(), 1);

        session.clear_input();
        type_in(&mut session, "_");
        session.submit();
        session.clear_input();
        type_in(&mut session, "1 + 1");
        session.submit();
        assert_eq!(session.history(), &["_", "1 + 1"]);
    }
}
