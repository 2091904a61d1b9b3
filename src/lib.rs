//! brightkey - global hotkey subsystem for a display-brightness tray tool
//!
//! This library provides system-wide hotkey bindings for the two brightness
//! actions: the textual hotkey grammar, the OS registration lifecycle, the
//! reconciliation of configured text with live registrations, and the
//! interactive capture flow used to rebind a hotkey from the UI.

pub mod error;
pub mod hotkey;
pub mod logging;
pub mod settings;

pub use hotkey::{
    spawn_trigger_listener, CaptureResponse, GlobalHotKeyBackend, Hotkey, HotkeyAction,
    HotkeyBackend, HotkeyCaptureController, HotkeyManager, HotkeyParseError, HotkeyRegistration,
    Key, KeyPress, Modifiers, PressedKey, ReconcileOutcome, RegistrationError, RegistrationId,
    TriggerCallback,
};
pub use settings::{Settings, SettingsError, SettingsStore};
