//! Keyboard chords and the actions they trigger.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortcutError {
    #[error("Empty key chord")]
    Empty,

    #[error("Unknown key '{0}'")]
    UnknownKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
}

/// A key plus modifiers. `ctrl` covers both Ctrl and Cmd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub key: Key,
}

impl KeyChord {
    /// Parses chords such as `ctrl+s`, `cmd+p`, `ctrl+shift+enter` or `esc`.
    pub fn parse(text: &str) -> Result<Self, ShortcutError> {
        let mut ctrl = false;
        let mut shift = false;
        let mut key = None;

        for part in text.split('+').map(|p| p.trim().to_lowercase()) {
            match part.as_str() {
                "" => continue,
                "ctrl" | "control" | "cmd" | "command" | "meta" => ctrl = true,
                "shift" => shift = true,
                "enter" | "return" => key = Some(Key::Enter),
                "esc" | "escape" => key = Some(Key::Escape),
                single if single.chars().count() == 1 => {
                    key = single.chars().next().map(Key::Char);
                }
                other => return Err(ShortcutError::UnknownKey(other.to_string())),
            }
        }

        key.map(|key| Self { ctrl, shift, key })
            .ok_or(ShortcutError::Empty)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            Key::Enter => f.write_str("enter"),
            Key::Escape => f.write_str("escape"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Saves the edit when editing, otherwise saves the form as a template.
    Save,
    Print,
    Generate,
    CloseDialogs,
}

/// The action bound to `chord`, if any.
pub fn resolve(chord: KeyChord) -> Option<Shortcut> {
    match chord {
        KeyChord { key: Key::Escape, .. } => Some(Shortcut::CloseDialogs),
        KeyChord {
            ctrl: true,
            shift: false,
            key: Key::Char('s'),
        } => Some(Shortcut::Save),
        KeyChord {
            ctrl: true,
            shift: false,
            key: Key::Char('p'),
        } => Some(Shortcut::Print),
        KeyChord {
            ctrl: true,
            shift: true,
            key: Key::Enter,
        } => Some(Shortcut::Generate),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn shortcut(text: &str) -> Option<Shortcut> {
        resolve(KeyChord::parse(text).expect("valid chord"))
    }

    #[test]
    fn bound_chords() {
        assert_eq!(shortcut("ctrl+s"), Some(Shortcut::Save));
        assert_eq!(shortcut("Cmd+S"), Some(Shortcut::Save));
        assert_eq!(shortcut("ctrl+p"), Some(Shortcut::Print));
        assert_eq!(shortcut("ctrl+shift+enter"), Some(Shortcut::Generate));
        assert_eq!(shortcut("escape"), Some(Shortcut::CloseDialogs));
    }

    #[test]
    fn unbound_chords() {
        assert_eq!(shortcut("ctrl+enter"), None);
        assert_eq!(shortcut("s"), None);
        assert_eq!(shortcut("ctrl+shift+s"), None);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(KeyChord::parse("ctrl+"), Err(ShortcutError::Empty));
        assert_eq!(
            KeyChord::parse("ctrl+f12"),
            Err(ShortcutError::UnknownKey("f12".to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        let chord = KeyChord::parse("cmd+shift+return").expect("valid chord");
        assert_eq!(chord.to_string(), "ctrl+shift+enter");
        assert_eq!(KeyChord::parse(&chord.to_string()), Ok(chord));
    }
}
