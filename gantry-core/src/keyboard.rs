use bitflags::bitflags;
use std::{fmt, str::FromStr};

/// Terminal-independent key code. Converted from crossterm events at the input edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct KeyModifiers: u8 {
        const NONE = 0;
        const SHIFT = 1;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("esc", KeyCode::Esc),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("space", KeyCode::Char(' ')),
];

impl KeyEvent {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// `S-a` and `A` compare equal: characters never carry SHIFT.
    fn normalized(mut self) -> Self {
        if let KeyCode::Char(c) = self.code
            && self.modifiers.contains(KeyModifiers::SHIFT)
        {
            self.code = KeyCode::Char(c.to_ascii_uppercase());
            self.modifiers.remove(KeyModifiers::SHIFT);
        }
        self
    }
}

impl FromStr for KeyEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty key".to_string());
        }

        let mut modifiers = KeyModifiers::NONE;
        let mut rest = s;
        loop {
            if let Some(tail) = rest.strip_prefix("C-") {
                modifiers |= KeyModifiers::CONTROL;
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("A-") {
                modifiers |= KeyModifiers::ALT;
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("S-") {
                modifiers |= KeyModifiers::SHIFT;
                rest = tail;
            } else {
                break;
            }
        }

        let mut chars = rest.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            (None, _) => return Err(format!("missing key after modifiers in '{s}'")),
            _ => {
                let lower = rest.to_lowercase();
                if let Some((_, code)) = NAMED_KEYS.iter().find(|(name, _)| *name == lower) {
                    *code
                } else if let Some(n) = lower.strip_prefix('f')
                    && let Ok(n) = n.parse::<u8>()
                    && (1..=12).contains(&n)
                {
                    KeyCode::F(n)
                } else {
                    return Err(format!("unknown key '{rest}'"));
                }
            }
        };

        Ok(Self::new(code, modifiers).normalized())
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("C-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("A-")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("S-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            code => {
                let name = NAMED_KEYS
                    .iter()
                    .find(|(_, named)| *named == code)
                    .map_or("?", |(name, _)| name);
                f.write_str(name)
            }
        }
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::{KeyCode as Ct, KeyModifiers as CtMods};

        let code = match event.code {
            Ct::Char(c) => KeyCode::Char(c),
            Ct::Enter => KeyCode::Enter,
            Ct::Esc => KeyCode::Esc,
            Ct::Tab => KeyCode::Tab,
            Ct::BackTab => KeyCode::BackTab,
            Ct::Backspace => KeyCode::Backspace,
            Ct::Delete => KeyCode::Delete,
            Ct::Up => KeyCode::Up,
            Ct::Down => KeyCode::Down,
            Ct::Left => KeyCode::Left,
            Ct::Right => KeyCode::Right,
            Ct::Home => KeyCode::Home,
            Ct::End => KeyCode::End,
            Ct::PageUp => KeyCode::PageUp,
            Ct::PageDown => KeyCode::PageDown,
            Ct::F(n) => KeyCode::F(n),
            _ => KeyCode::Char('\0'),
        };

        let mut modifiers = KeyModifiers::NONE;
        if event.modifiers.contains(CtMods::CONTROL) {
            modifiers |= KeyModifiers::CONTROL;
        }
        if event.modifiers.contains(CtMods::ALT) {
            modifiers |= KeyModifiers::ALT;
        }
        if event.modifiers.contains(CtMods::SHIFT) {
            modifiers |= KeyModifiers::SHIFT;
        }
        // BackTab already encodes shift
        if code == KeyCode::BackTab {
            modifiers.remove(KeyModifiers::SHIFT);
        }

        Self::new(code, modifiers).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_char() {
        let key: KeyEvent = "q".parse().unwrap();
        assert_eq!(key, KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
    }

    #[test]
    fn test_parse_modifiers() {
        let key: KeyEvent = "C-A-x".parse().unwrap();
        assert_eq!(
            key,
            KeyEvent::new(
                KeyCode::Char('x'),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            )
        );
    }

    #[test]
    fn test_parse_named_keys_case_insensitive() {
        assert_eq!(
            "Enter".parse::<KeyEvent>().unwrap().code,
            KeyCode::Enter
        );
        assert_eq!("pagedown".parse::<KeyEvent>().unwrap().code, KeyCode::PageDown);
        assert_eq!("f5".parse::<KeyEvent>().unwrap().code, KeyCode::F(5));
        assert_eq!("space".parse::<KeyEvent>().unwrap().code, KeyCode::Char(' '));
    }

    #[test]
    fn test_shift_letter_matches_uppercase() {
        let shifted: KeyEvent = "S-g".parse().unwrap();
        let upper: KeyEvent = "G".parse().unwrap();
        assert_eq!(shifted, upper);
        assert_eq!(upper.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<KeyEvent>().is_err());
        assert!("C-".parse::<KeyEvent>().is_err());
        assert!("hyper".parse::<KeyEvent>().is_err());
        assert!("f13".parse::<KeyEvent>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for text in ["C-c", "A-G", "enter", "C-space", "f2", "S-tab"] {
            let key: KeyEvent = text.parse().unwrap();
            assert_eq!(key.to_string(), text, "display of {text}");
        }
    }

    #[test]
    fn test_from_crossterm_uppercase_drops_shift() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('P'),
            crossterm::event::KeyModifiers::SHIFT,
        );
        let key = KeyEvent::from(ct);
        assert_eq!(key, KeyEvent::new(KeyCode::Char('P'), KeyModifiers::NONE));
    }

    #[test]
    fn test_from_crossterm_control() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('c'),
            crossterm::event::KeyModifiers::CONTROL,
        );
        assert_eq!(
            KeyEvent::from(ct),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        );
    }

    #[test]
    fn test_ordering_prefers_plain_keys() {
        let plain = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let ctrl = KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL);
        assert!(plain < ctrl);
    }
}
