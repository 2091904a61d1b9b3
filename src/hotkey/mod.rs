//! Global hotkey subsystem.
//!
//! This module provides:
//! - The hotkey grammar: parse and serialize `"Ctrl+Shift+F9"`-style text
//! - OS registration lifecycle with scoped release
//! - Reconciliation of configured text with live registrations
//! - The interactive capture state machine for rebinding
//!
//! # Example
//!
//! ```ignore
//! use brightkey::hotkey::{GlobalHotKeyBackend, HotkeyAction, HotkeyManager};
//!
//! let backend = std::sync::Arc::new(GlobalHotKeyBackend::new()?);
//! let manager = HotkeyManager::new(backend);
//! manager.reconcile(HotkeyAction::DecreaseBrightness, "Ctrl+Shift+F9")?;
//! ```

mod backend;
mod capture;
mod manager;
mod registration;
mod types;


pub use types::{Hotkey, HotkeyAction, HotkeyParseError, Key, Modifiers};

pub use backend::{GlobalHotKeyBackend, HotkeyBackend, RegistrationError, RegistrationId};

pub use registration::{HotkeyRegistration, TriggerCallback};

pub use manager::{spawn_trigger_listener, HotkeyManager, ReconcileOutcome};

pub use capture::{CaptureResponse, HotkeyCaptureController, KeyPress, PressedKey};
