use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::input::Input;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Forwarded to `core::update` as `Action::Input`
    Key(Input),
    /// Terminal size changed, only needs a redraw
    Resize,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if event::poll(timeout)? {
        Ok(translate(event::read()?))
    } else {
        Ok(None)
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

pub fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key) => translate_key(key).map(TuiEvent::Key),
        Event::Paste(data) => Some(TuiEvent::Key(Input::Paste(data))),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Input> {
    // Release/repeat reports arrive when keyboard enhancement is on
    if key.kind != KeyEventKind::Press {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Input::Interrupt),
        (_, KeyCode::Char(c)) => Some(Input::Char(c)),
        (_, KeyCode::Enter) => Some(Input::Enter),
        (_, KeyCode::Esc) => Some(Input::Esc),
        (_, KeyCode::Up) => Some(Input::Up),
        (_, KeyCode::Down) => Some(Input::Down),
        (_, KeyCode::Left) => Some(Input::Left),
        (_, KeyCode::Right) => Some(Input::Right),
        (_, KeyCode::Home) => Some(Input::Home),
        (_, KeyCode::End) => Some(Input::End),
        (_, KeyCode::Tab) => Some(Input::Tab),
        (_, KeyCode::BackTab) => Some(Input::BackTab),
        (_, KeyCode::Backspace) => Some(Input::Backspace),
        (_, KeyCode::Delete) => Some(Input::Delete),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(TuiEvent::Key(Input::Interrupt))
        );
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::NONE)),
            Some(TuiEvent::Key(Input::Char('c')))
        );
    }

    #[test]
    fn test_shifted_char_stays_a_char() {
        assert_eq!(
            translate(key(KeyCode::Char('P'), KeyModifiers::SHIFT)),
            Some(TuiEvent::Key(Input::Char('P')))
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut release = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(Event::Key(release)), None);
    }

    #[test]
    fn test_paste_and_resize() {
        assert_eq!(
            translate(Event::Paste("abc".into())),
            Some(TuiEvent::Key(Input::Paste("abc".into())))
        );
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
        assert_eq!(translate(Event::FocusGained), None);
    }
}
