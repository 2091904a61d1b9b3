//! OS registration seam.
//!
//! `HotkeyBackend` is the explicit registry object everything else is handed
//! a reference to; there is no ambient/static registration state. The real
//! implementation wraps `global_hotkey::GlobalHotKeyManager`; tests use the
//! mock in [`testing`].

use std::fmt;

use global_hotkey::hotkey::{Code, HotKey, Modifiers as OsModifiers};
use global_hotkey::{Error as OsHotkeyError, GlobalHotKeyManager};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

use super::types::{Hotkey, Key, Modifiers};

/// Identifier of one live OS registration.
///
/// The only contract is uniqueness among currently-active registrations in
/// this process; the allocation scheme is the backend's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationId(pub u32);

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from a registration attempt.
///
/// Surfaced synchronously at the point of the attempt; a combination the OS
/// declines simply leaves the action unbound until the next explicit
/// reconfiguration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("hotkey '{hotkey}' is already claimed by another application")]
    AlreadyClaimed { hotkey: String },
    #[error("the system rejected hotkey '{hotkey}': {reason}")]
    Rejected { hotkey: String, reason: String },
    #[error("OS error while registering hotkey '{hotkey}': {reason}")]
    Os { hotkey: String, reason: String },
    #[error("global shortcut facility unavailable: {0}")]
    Unavailable(String),
}

/// The system-wide shortcut facility.
///
/// `register` either claims the combination and returns its identifier, or
/// reports why the OS declined. `unregister` is best-effort and infallible:
/// a stale claim is recoverable by process exit and must not crash the host.
pub trait HotkeyBackend: Send + Sync {
    fn register(&self, hotkey: &Hotkey) -> Result<RegistrationId, RegistrationError>;
    fn unregister(&self, id: RegistrationId, hotkey: &Hotkey);
}

/// Production backend over `global_hotkey::GlobalHotKeyManager`.
pub struct GlobalHotKeyBackend {
    // GlobalHotKeyManager is Send but not Sync; the mutex makes the backend
    // shareable behind an Arc.
    manager: Mutex<GlobalHotKeyManager>,
}

impl GlobalHotKeyBackend {
    pub fn new() -> Result<Self, RegistrationError> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| RegistrationError::Unavailable(e.to_string()))?;
        Ok(Self {
            manager: Mutex::new(manager),
        })
    }
}

impl HotkeyBackend for GlobalHotKeyBackend {
    fn register(&self, hotkey: &Hotkey) -> Result<RegistrationId, RegistrationError> {
        let os_hotkey = to_os_hotkey(hotkey);
        match self.manager.lock().register(os_hotkey) {
            Ok(()) => Ok(RegistrationId(os_hotkey.id())),
            Err(e) => Err(classify_os_error(e, hotkey)),
        }
    }

    fn unregister(&self, id: RegistrationId, hotkey: &Hotkey) {
        let os_hotkey = to_os_hotkey(hotkey);
        if let Err(e) = self.manager.lock().unregister(os_hotkey) {
            warn!(
                hotkey = %hotkey,
                registration_id = %id,
                error = %e,
                "failed to unregister hotkey; claim will be released on process exit"
            );
        }
    }
}

fn classify_os_error(e: OsHotkeyError, hotkey: &Hotkey) -> RegistrationError {
    let hotkey = hotkey.to_canonical_string();
    match e {
        OsHotkeyError::AlreadyRegistered(_) => RegistrationError::AlreadyClaimed { hotkey },
        OsHotkeyError::FailedToRegister(reason) => RegistrationError::Rejected { hotkey, reason },
        OsHotkeyError::OsError(os_err) => RegistrationError::Os {
            hotkey,
            reason: os_err.to_string(),
        },
        other => RegistrationError::Rejected {
            hotkey,
            reason: other.to_string(),
        },
    }
}

fn to_os_hotkey(hotkey: &Hotkey) -> HotKey {
    HotKey::new(Some(to_os_modifiers(hotkey.modifiers)), to_os_code(hotkey.key))
}

fn to_os_modifiers(modifiers: Modifiers) -> OsModifiers {
    let mut out = OsModifiers::empty();
    if modifiers.contains(Modifiers::ALT) {
        out |= OsModifiers::ALT;
    }
    if modifiers.contains(Modifiers::CONTROL) {
        out |= OsModifiers::CONTROL;
    }
    if modifiers.contains(Modifiers::SHIFT) {
        out |= OsModifiers::SHIFT;
    }
    if modifiers.contains(Modifiers::SUPER) {
        out |= OsModifiers::META;
    }
    out
}

fn to_os_code(key: Key) -> Code {
    match key {
        Key::Backspace => Code::Backspace,
        Key::Tab => Code::Tab,
        Key::Enter => Code::Enter,
        Key::Escape => Code::Escape,
        Key::Space => Code::Space,
        Key::PageUp => Code::PageUp,
        Key::PageDown => Code::PageDown,
        Key::End => Code::End,
        Key::Home => Code::Home,
        Key::Left => Code::ArrowLeft,
        Key::Up => Code::ArrowUp,
        Key::Right => Code::ArrowRight,
        Key::Down => Code::ArrowDown,
        Key::Insert => Code::Insert,
        Key::Delete => Code::Delete,
        Key::D0 => Code::Digit0,
        Key::D1 => Code::Digit1,
        Key::D2 => Code::Digit2,
        Key::D3 => Code::Digit3,
        Key::D4 => Code::Digit4,
        Key::D5 => Code::Digit5,
        Key::D6 => Code::Digit6,
        Key::D7 => Code::Digit7,
        Key::D8 => Code::Digit8,
        Key::D9 => Code::Digit9,
        Key::A => Code::KeyA,
        Key::B => Code::KeyB,
        Key::C => Code::KeyC,
        Key::D => Code::KeyD,
        Key::E => Code::KeyE,
        Key::F => Code::KeyF,
        Key::G => Code::KeyG,
        Key::H => Code::KeyH,
        Key::I => Code::KeyI,
        Key::J => Code::KeyJ,
        Key::K => Code::KeyK,
        Key::L => Code::KeyL,
        Key::M => Code::KeyM,
        Key::N => Code::KeyN,
        Key::O => Code::KeyO,
        Key::P => Code::KeyP,
        Key::Q => Code::KeyQ,
        Key::R => Code::KeyR,
        Key::S => Code::KeyS,
        Key::T => Code::KeyT,
        Key::U => Code::KeyU,
        Key::V => Code::KeyV,
        Key::W => Code::KeyW,
        Key::X => Code::KeyX,
        Key::Y => Code::KeyY,
        Key::Z => Code::KeyZ,
        Key::F1 => Code::F1,
        Key::F2 => Code::F2,
        Key::F3 => Code::F3,
        Key::F4 => Code::F4,
        Key::F5 => Code::F5,
        Key::F6 => Code::F6,
        Key::F7 => Code::F7,
        Key::F8 => Code::F8,
        Key::F9 => Code::F9,
        Key::F10 => Code::F10,
        Key::F11 => Code::F11,
        Key::F12 => Code::F12,
        Key::F13 => Code::F13,
        Key::F14 => Code::F14,
        Key::F15 => Code::F15,
        Key::F16 => Code::F16,
        Key::F17 => Code::F17,
        Key::F18 => Code::F18,
        Key::F19 => Code::F19,
        Key::F20 => Code::F20,
        Key::F21 => Code::F21,
        Key::F22 => Code::F22,
        Key::F23 => Code::F23,
        Key::F24 => Code::F24,
    }
}
