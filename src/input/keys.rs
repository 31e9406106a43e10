//! Keyboard event mapping and input event types.

use termion::event::{Event, Key};

/// High-level input events abstracted from raw keyboard input.
///
/// These represent user intentions (submit, complete, navigate) rather than
/// specific key presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Quit the session (Esc, Ctrl-c, Ctrl-d)
    Quit,
    /// Evaluate the current input (Enter)
    Submit,
    /// Complete the input from the suggestions (Tab)
    Complete,
    /// Move the suggestion selection down (Down)
    SelectNext,
    /// Move the suggestion selection up (Up)
    SelectPrev,
    /// Recall the previous history entry (Ctrl-p)
    HistoryPrev,
    /// Recall the next history entry (Ctrl-n)
    HistoryNext,
    /// Clear the whole input line (Ctrl-u)
    ClearInput,
    /// Delete the character before the cursor (Backspace)
    Backspace,
    /// Type a character into the input line
    Char(char),
    /// Anything we don't handle
    Unknown,
}

/// Maps a raw termion event to a high-level input event.
pub fn map_key_event(event: Event) -> InputEvent {
    let Event::Key(key) = event else {
        return InputEvent::Unknown;
    };

    match key {
        Key::Esc | Key::Ctrl('c') | Key::Ctrl('d') => InputEvent::Quit,
        Key::Char('\n') => InputEvent::Submit,
        Key::Char('\t') => InputEvent::Complete,
        Key::Down => InputEvent::SelectNext,
        Key::Up => InputEvent::SelectPrev,
        Key::Ctrl('p') => InputEvent::HistoryPrev,
        Key::Ctrl('n') => InputEvent::HistoryNext,
        Key::Ctrl('u') => InputEvent::ClearInput,
        Key::Backspace => InputEvent::Backspace,
        Key::Char(c) if !c.is_control() => InputEvent::Char(c),
        _ => InputEvent::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_keys() {
        assert_eq!(map_key_event(Event::Key(Key::Esc)), InputEvent::Quit);
        assert_eq!(map_key_event(Event::Key(Key::Ctrl('c'))), InputEvent::Quit);
        assert_eq!(
            map_key_event(Event::Key(Key::Char('\n'))),
            InputEvent::Submit
        );
        assert_eq!(
            map_key_event(Event::Key(Key::Char('\t'))),
            InputEvent::Complete
        );
        assert_eq!(
            map_key_event(Event::Key(Key::Ctrl('u'))),
            InputEvent::ClearInput
        );
    }

    #[test]
    fn test_printable_characters_pass_through() {
        assert_eq!(
            map_key_event(Event::Key(Key::Char('x'))),
            InputEvent::Char('x')
        );
        assert_eq!(
            map_key_event(Event::Key(Key::Char('['))),
            InputEvent::Char('[')
        );
    }

    #[test]
    fn test_unmapped_keys_are_unknown() {
        assert_eq!(map_key_event(Event::Key(Key::F(5))), InputEvent::Unknown);
        assert_eq!(map_key_event(Event::Key(Key::Home)), InputEvent::Unknown);
    }
}
