//! Core hotkey types: modifier set, key catalogue, and the textual grammar.
//!
//! This module provides:
//! - `Modifiers` - modifier key flags (Ctrl, Shift, Alt, Win)
//! - `Key` - the closed catalogue of bindable keys
//! - `Hotkey` - a (modifiers, key) pair with parse/serialize
//! - `HotkeyAction` - the logical actions a hotkey can be bound to
//!
//! A `Hotkey` always carries a concrete key; "no hotkey configured" is
//! expressed by a parse failure, never by a sentinel key value. Equality
//! of two `Hotkey`s (not identity) is what determines conflicts.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use thiserror::Error;

/// Errors that can occur when parsing a hotkey string.
///
/// All of these are soft for configuration purposes: a field that fails to
/// parse is treated as "not configured", not reported to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HotkeyParseError {
    #[error("hotkey text is empty")]
    Empty,
    #[error("hotkey has no key token, only modifiers")]
    NoKey,
    #[error("hotkey has more than one key token ('{first}' and '{second}')")]
    MultipleKeys { first: String, second: String },
}

bitflags! {
    /// Modifier key flags. Values mirror the OS modifier codes
    /// (MOD_ALT=1, MOD_CONTROL=2, MOD_SHIFT=4, MOD_WIN=8).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const ALT = 1;
        const CONTROL = 2;
        const SHIFT = 4;
        const SUPER = 8;
    }
}

/// The closed catalogue of keys a hotkey may bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Insert,
    Delete,
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    D8,
    D9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
}

impl Key {
    /// Every key in the catalogue, in display order.
    pub const ALL: [Key; 75] = [
        Key::Backspace,
        Key::Tab,
        Key::Enter,
        Key::Escape,
        Key::Space,
        Key::PageUp,
        Key::PageDown,
        Key::End,
        Key::Home,
        Key::Left,
        Key::Up,
        Key::Right,
        Key::Down,
        Key::Insert,
        Key::Delete,
        Key::D0,
        Key::D1,
        Key::D2,
        Key::D3,
        Key::D4,
        Key::D5,
        Key::D6,
        Key::D7,
        Key::D8,
        Key::D9,
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::F13,
        Key::F14,
        Key::F15,
        Key::F16,
        Key::F17,
        Key::F18,
        Key::F19,
        Key::F20,
        Key::F21,
        Key::F22,
        Key::F23,
        Key::F24,
    ];

    /// The fixed display token for this key, as used in the hotkey grammar.
    pub fn token(&self) -> &'static str {
        match self {
            Key::Backspace => "Backspace",
            Key::Tab => "Tab",
            Key::Enter => "Enter",
            Key::Escape => "Escape",
            Key::Space => "Space",
            Key::PageUp => "PageUp",
            Key::PageDown => "PageDown",
            Key::End => "End",
            Key::Home => "Home",
            Key::Left => "Left",
            Key::Up => "Up",
            Key::Right => "Right",
            Key::Down => "Down",
            Key::Insert => "Insert",
            Key::Delete => "Delete",
            Key::D0 => "0",
            Key::D1 => "1",
            Key::D2 => "2",
            Key::D3 => "3",
            Key::D4 => "4",
            Key::D5 => "5",
            Key::D6 => "6",
            Key::D7 => "7",
            Key::D8 => "8",
            Key::D9 => "9",
            Key::A => "A",
            Key::B => "B",
            Key::C => "C",
            Key::D => "D",
            Key::E => "E",
            Key::F => "F",
            Key::G => "G",
            Key::H => "H",
            Key::I => "I",
            Key::J => "J",
            Key::K => "K",
            Key::L => "L",
            Key::M => "M",
            Key::N => "N",
            Key::O => "O",
            Key::P => "P",
            Key::Q => "Q",
            Key::R => "R",
            Key::S => "S",
            Key::T => "T",
            Key::U => "U",
            Key::V => "V",
            Key::W => "W",
            Key::X => "X",
            Key::Y => "Y",
            Key::Z => "Z",
            Key::F1 => "F1",
            Key::F2 => "F2",
            Key::F3 => "F3",
            Key::F4 => "F4",
            Key::F5 => "F5",
            Key::F6 => "F6",
            Key::F7 => "F7",
            Key::F8 => "F8",
            Key::F9 => "F9",
            Key::F10 => "F10",
            Key::F11 => "F11",
            Key::F12 => "F12",
            Key::F13 => "F13",
            Key::F14 => "F14",
            Key::F15 => "F15",
            Key::F16 => "F16",
            Key::F17 => "F17",
            Key::F18 => "F18",
            Key::F19 => "F19",
            Key::F20 => "F20",
            Key::F21 => "F21",
            Key::F22 => "F22",
            Key::F23 => "F23",
            Key::F24 => "F24",
        }
    }

    fn function_key(n: u32) -> Option<Key> {
        Some(match n {
            1 => Key::F1,
            2 => Key::F2,
            3 => Key::F3,
            4 => Key::F4,
            5 => Key::F5,
            6 => Key::F6,
            7 => Key::F7,
            8 => Key::F8,
            9 => Key::F9,
            10 => Key::F10,
            11 => Key::F11,
            12 => Key::F12,
            13 => Key::F13,
            14 => Key::F14,
            15 => Key::F15,
            16 => Key::F16,
            17 => Key::F17,
            18 => Key::F18,
            19 => Key::F19,
            20 => Key::F20,
            21 => Key::F21,
            22 => Key::F22,
            23 => Key::F23,
            24 => Key::F24,
            _ => return None,
        })
    }

    fn letter(ch: char) -> Option<Key> {
        Some(match ch.to_ascii_uppercase() {
            'A' => Key::A,
            'B' => Key::B,
            'C' => Key::C,
            'D' => Key::D,
            'E' => Key::E,
            'F' => Key::F,
            'G' => Key::G,
            'H' => Key::H,
            'I' => Key::I,
            'J' => Key::J,
            'K' => Key::K,
            'L' => Key::L,
            'M' => Key::M,
            'N' => Key::N,
            'O' => Key::O,
            'P' => Key::P,
            'Q' => Key::Q,
            'R' => Key::R,
            'S' => Key::S,
            'T' => Key::T,
            'U' => Key::U,
            'V' => Key::V,
            'W' => Key::W,
            'X' => Key::X,
            'Y' => Key::Y,
            'Z' => Key::Z,
            _ => return None,
        })
    }

    fn digit(ch: char) -> Option<Key> {
        Some(match ch {
            '0' => Key::D0,
            '1' => Key::D1,
            '2' => Key::D2,
            '3' => Key::D3,
            '4' => Key::D4,
            '5' => Key::D5,
            '6' => Key::D6,
            '7' => Key::D7,
            '8' => Key::D8,
            '9' => Key::D9,
            _ => return None,
        })
    }

    /// Parse a single key token (already trimmed), case-insensitively.
    ///
    /// Accepts display names (`PageUp`, `Backspace`, ...), a few common
    /// synonyms (`Esc`, `Return`, `PgUp`, ...), single letters/digits, the
    /// catalogue digit names (`D0`..`D9`), and function keys `F1`..`F24`.
    /// An unsupported `F<n>` yields `None`, not an error.
    pub fn from_token(token: &str) -> Option<Key> {
        let lower = token.to_ascii_lowercase();
        let named = match lower.as_str() {
            "backspace" | "back" => Some(Key::Backspace),
            "tab" => Some(Key::Tab),
            "enter" | "return" => Some(Key::Enter),
            "escape" | "esc" => Some(Key::Escape),
            "space" => Some(Key::Space),
            "pageup" | "pgup" => Some(Key::PageUp),
            "pagedown" | "pgdn" => Some(Key::PageDown),
            "end" => Some(Key::End),
            "home" => Some(Key::Home),
            "left" => Some(Key::Left),
            "up" => Some(Key::Up),
            "right" => Some(Key::Right),
            "down" => Some(Key::Down),
            "insert" | "ins" => Some(Key::Insert),
            "delete" | "del" => Some(Key::Delete),
            _ => None,
        };
        if named.is_some() {
            return named;
        }

        let mut chars = lower.chars();
        match (chars.next(), chars.next(), chars.next()) {
            // Single character: letter or digit.
            (Some(ch), None, _) => Key::letter(ch).or_else(|| Key::digit(ch)),
            // Catalogue digit names D0..D9.
            (Some('d'), Some(ch), None) if ch.is_ascii_digit() => Key::digit(ch),
            // Function keys F1..F24.
            (Some('f'), Some(_), _) => lower[1..].parse::<u32>().ok().and_then(Key::function_key),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A global hotkey: a modifier set plus exactly one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl Hotkey {
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }

    /// Parse a hotkey string such as `"Ctrl+Shift+F9"`.
    ///
    /// Splits on `+`, trims each token, and classifies it as a modifier
    /// synonym (`ctrl`/`control`, `shift`, `alt`, `win`/`windows`, any
    /// casing, any order, duplicates collapse) or a key token. Tokens that
    /// are neither are skipped, so an input made only of unknown tokens
    /// parses to `NoKey` rather than an error about the tokens themselves.
    /// Two valid key tokens are a hard failure: a string like `"A+B"` is
    /// ambiguous and rejected rather than letting the last token win.
    pub fn parse(text: &str) -> Result<Self, HotkeyParseError> {
        if text.trim().is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut modifiers = Modifiers::empty();
        let mut key: Option<Key> = None;

        for raw in text.split('+') {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
                "shift" => modifiers |= Modifiers::SHIFT,
                "alt" => modifiers |= Modifiers::ALT,
                "win" | "windows" => modifiers |= Modifiers::SUPER,
                _ => {
                    if let Some(parsed) = Key::from_token(token) {
                        if let Some(first) = key {
                            return Err(HotkeyParseError::MultipleKeys {
                                first: first.token().to_string(),
                                second: parsed.token().to_string(),
                            });
                        }
                        key = Some(parsed);
                    }
                }
            }
        }

        match key {
            Some(key) => Ok(Self { modifiers, key }),
            None => Err(HotkeyParseError::NoKey),
        }
    }

    /// Serialize to the canonical string form: modifier tokens in the fixed
    /// order Ctrl, Shift, Alt, Win, then the key token, joined with `+`.
    pub fn to_canonical_string(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(5);
        if self.modifiers.contains(Modifiers::CONTROL) {
            parts.push("Ctrl");
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            parts.push("Shift");
        }
        if self.modifiers.contains(Modifiers::ALT) {
            parts.push("Alt");
        }
        if self.modifiers.contains(Modifiers::SUPER) {
            parts.push("Win");
        }
        parts.push(self.key.token());
        parts.join("+")
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl FromStr for Hotkey {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hotkey::parse(s)
    }
}

/// The logical actions a hotkey can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    DecreaseBrightness,
    IncreaseBrightness,
}

impl HotkeyAction {
    pub const ALL: [HotkeyAction; 2] = [
        HotkeyAction::DecreaseBrightness,
        HotkeyAction::IncreaseBrightness,
    ];

    /// Stable name used in logs and configuration keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HotkeyAction::DecreaseBrightness => "decrease-brightness",
            HotkeyAction::IncreaseBrightness => "increase-brightness",
        }
    }

    /// The canonical default binding for this action.
    pub fn default_hotkey(&self) -> &'static str {
        match self {
            HotkeyAction::DecreaseBrightness => "Ctrl+Shift+F9",
            HotkeyAction::IncreaseBrightness => "Ctrl+Shift+F10",
        }
    }
}

impl fmt::Display for HotkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
