use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single key with modifiers, written as e.g. `q`, `ctrl+s`, `PageDown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    pub const fn with_ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        // Shift is implied by the character itself ('G', '+', '?') and by
        // BackTab, so it is only compared for the remaining keys.
        let shift_implied = matches!(self.code, KeyCode::Char(_) | KeyCode::BackTab);
        let mask = if shift_implied {
            !KeyModifiers::SHIFT
        } else {
            KeyModifiers::all()
        };
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    pub fn display(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("ctrl".into());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("alt".into());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("shift".into());
        }
        parts.push(code_name(self.code));
        parts.join("+")
    }
}

fn code_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        _ => "?".into(),
    }
}

fn parse_code(name: &str) -> Result<KeyCode, String> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        // Single characters keep their case: `g` and `G` are different keys.
        return Ok(KeyCode::Char(c));
    }

    let lower = name.to_lowercase();
    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        "plus" => KeyCode::Char('+'),
        "minus" => KeyCode::Char('-'),
        other => {
            let number = other
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .ok_or_else(|| format!("Unknown key: {name}"))?;
            KeyCode::F(number)
        }
    };
    Ok(code)
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // `+` on its own (or as the last part of `ctrl++`) is the plus key.
        let (prefix, name) = match s.rsplit_once('+') {
            Some((prefix, "")) => (prefix.strip_suffix('+').unwrap_or(prefix), "+"),
            Some((prefix, name)) => (prefix, name),
            None => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(format!("Unknown modifier: {part}")),
            };
        }

        Ok(Self {
            code: parse_code(name)?,
            modifiers,
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One or more keys bound to the same action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    Single(Key),
    Multiple(Vec<Key>),
}

impl KeyBinding {
    pub fn keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self::Multiple(keys.into_iter().collect())
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        match self {
            Self::Single(key) => key.matches(event),
            Self::Multiple(keys) => keys.iter().any(|k| k.matches(event)),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Single(key) => key.display(),
            Self::Multiple(keys) => keys.iter().map(Key::display).collect::<Vec<_>>().join("/"),
        }
    }
}

impl From<Key> for KeyBinding {
    fn from(key: Key) -> Self {
        Self::Single(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Key {
        s.parse().unwrap()
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!(parse("q"), Key::char('q'));
        assert_eq!(parse("G"), Key::char('G'));
        assert_eq!(parse("Enter"), Key::new(KeyCode::Enter));
        assert_eq!(parse("ctrl+s"), Key::with_ctrl(KeyCode::Char('s')));
        assert_eq!(parse("F5"), Key::new(KeyCode::F(5)));
        assert_eq!(parse("+"), Key::char('+'));
        assert_eq!(parse("ctrl++"), Key::with_ctrl(KeyCode::Char('+')));
        assert_eq!(parse("BackTab"), Key::new(KeyCode::BackTab));
    }

    #[test]
    fn test_key_parse_errors() {
        assert!("hyper+x".parse::<Key>().is_err());
        assert!("florp".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::char('q').display(), "q");
        assert_eq!(Key::new(KeyCode::PageDown).display(), "PageDown");
        assert_eq!(Key::with_ctrl(KeyCode::Char('s')).display(), "ctrl+s");
    }

    #[test]
    fn test_shifted_chars_match() {
        let event = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert!(Key::char('G').matches(&event));
        assert!(!Key::char('g').matches(&event));

        let plus = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::SHIFT);
        assert!(Key::char('+').matches(&plus));

        let backtab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert!(Key::new(KeyCode::BackTab).matches(&backtab));
    }

    #[test]
    fn test_ctrl_must_match() {
        let event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!Key::char('s').matches(&event));
        assert!(Key::with_ctrl(KeyCode::Char('s')).matches(&event));
    }

    #[test]
    fn test_binding_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            keys: KeyBinding,
        }
        let w: Wrapper = toml::from_str(r#"keys = ["n", "PageDown"]"#).unwrap();
        assert_eq!(w.keys.display(), "n/PageDown");
        let w: Wrapper = toml::from_str(r#"keys = "x""#).unwrap();
        assert_eq!(w.keys, KeyBinding::Single(Key::char('x')));
    }
}
