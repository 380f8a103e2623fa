//! Key → action mapping.
//!
//! Keys the engine cares about are decoded into a closed `Key` enum, and
//! every `Key` maps to exactly one `Action` — the match is exhaustive, so a
//! new key cannot silently become a no-op. Keys outside the table decode to
//! `None`. Each key event yields one synchronous action; there is no
//! queueing or debouncing.

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Digit0,
    Digit1,
    Digit2,
    Plus,
    Minus,
    Equals,
    Up,
    Down,
    Left,
    Right,
    Escape,
    QuitChar,
}

/// One engine mutation, applied by the session. `ToggleHud` and `Quit` are
/// presentation concerns forwarded to the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RandomizeBoth,
    ZeroBoth,
    RandomizeLayer1,
    RandomizeLayer2,
    IntervalUp,
    IntervalDown,
    ToggleRefresh,
    ShiftLayer1(i32),
    ShiftLayer2(i32),
    ToggleHud,
    Quit,
}

pub fn decode(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char('0') => Some(Key::Digit0),
        KeyCode::Char('1') => Some(Key::Digit1),
        KeyCode::Char('2') => Some(Key::Digit2),
        KeyCode::Char('+') => Some(Key::Plus),
        KeyCode::Char('-') => Some(Key::Minus),
        KeyCode::Char('=') => Some(Key::Equals),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Char('q') => Some(Key::QuitChar),
        _ => None,
    }
}

pub fn action_for(key: Key) -> Action {
    match key {
        Key::Space => Action::RandomizeBoth,
        Key::Digit0 => Action::ZeroBoth,
        Key::Digit1 => Action::RandomizeLayer1,
        Key::Digit2 => Action::RandomizeLayer2,
        Key::Plus => Action::IntervalUp,
        Key::Minus => Action::IntervalDown,
        Key::Equals => Action::ToggleRefresh,
        Key::Up => Action::ShiftLayer1(1),
        Key::Down => Action::ShiftLayer1(-1),
        Key::Left => Action::ShiftLayer2(-1),
        Key::Right => Action::ShiftLayer2(1),
        Key::Escape => Action::ToggleHud,
        Key::QuitChar => Action::Quit,
    }
}

pub fn map_key(code: KeyCode) -> Option<Action> {
    decode(code).map(action_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_table() {
        assert_eq!(map_key(KeyCode::Char(' ')), Some(Action::RandomizeBoth));
        assert_eq!(map_key(KeyCode::Char('0')), Some(Action::ZeroBoth));
        assert_eq!(map_key(KeyCode::Char('1')), Some(Action::RandomizeLayer1));
        assert_eq!(map_key(KeyCode::Char('2')), Some(Action::RandomizeLayer2));
        assert_eq!(map_key(KeyCode::Char('+')), Some(Action::IntervalUp));
        assert_eq!(map_key(KeyCode::Char('-')), Some(Action::IntervalDown));
        assert_eq!(map_key(KeyCode::Char('=')), Some(Action::ToggleRefresh));
        assert_eq!(map_key(KeyCode::Up), Some(Action::ShiftLayer1(1)));
        assert_eq!(map_key(KeyCode::Down), Some(Action::ShiftLayer1(-1)));
        assert_eq!(map_key(KeyCode::Left), Some(Action::ShiftLayer2(-1)));
        assert_eq!(map_key(KeyCode::Right), Some(Action::ShiftLayer2(1)));
        assert_eq!(map_key(KeyCode::Esc), Some(Action::ToggleHud));
        assert_eq!(map_key(KeyCode::Char('q')), Some(Action::Quit));
    }

    #[test]
    fn unrecognized_keys_are_no_ops() {
        assert_eq!(map_key(KeyCode::Char('x')), None);
        assert_eq!(map_key(KeyCode::Enter), None);
        assert_eq!(map_key(KeyCode::F(11)), None);
        assert_eq!(map_key(KeyCode::Tab), None);
    }
}
