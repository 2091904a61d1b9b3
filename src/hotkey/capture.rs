//! Interactive capture of a new hotkey binding.
//!
//! While a capture is active the host feeds every key press through
//! [`HotkeyCaptureController::handle_key_press`]. Modifier-only presses keep
//! the capture open, Escape abandons it, and the first concrete key commits
//! the combination of that key with the modifiers held at that instant. The
//! committed text goes to the commit sink; nothing is written before commit,
//! so a cancelled capture leaves the previous binding untouched.

use tracing::debug;

use super::types::{Hotkey, HotkeyAction, Key, Modifiers};

/// What a single press resolved to, after OS key decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressedKey {
    /// A key in the bindable catalogue.
    Key(Key),
    /// A modifier key on its own (Ctrl, Shift, Alt, Win).
    Modifier,
    /// A key outside the catalogue (media keys, IME keys, ...).
    Unrecognized,
}

/// One key press as reported by the host's input layer.
///
/// Some platforms alias presses taken with certain modifiers held into a
/// synthetic "system" key and report the real key separately; when
/// `system_key` is present it is the effective key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: PressedKey,
    pub system_key: Option<PressedKey>,
    /// Modifiers held at the instant of the press.
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: PressedKey, modifiers: Modifiers) -> Self {
        Self {
            key,
            system_key: None,
            modifiers,
        }
    }

    fn effective_key(&self) -> PressedKey {
        self.system_key.unwrap_or(self.key)
    }
}

/// Outcome of feeding one press to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureResponse {
    /// No capture in progress; the press belongs to the host.
    Ignored,
    /// Capture continues, waiting for a concrete key.
    Pending,
    /// The capture was abandoned; nothing was written.
    Cancelled,
    /// The capture completed with this hotkey, already handed to the sink.
    Committed(Hotkey),
}

impl CaptureResponse {
    /// Whether the press was consumed and must not reach normal handling.
    pub fn consumed(&self) -> bool {
        !matches!(self, CaptureResponse::Ignored)
    }
}

/// Capture state machine: idle, or capturing for exactly one action.
pub struct HotkeyCaptureController {
    capturing: Option<HotkeyAction>,
    commit: Box<dyn FnMut(HotkeyAction, &str) + Send>,
}

impl HotkeyCaptureController {
    /// `commit` receives the action and the canonical hotkey text exactly
    /// once per completed capture.
    pub fn new(commit: impl FnMut(HotkeyAction, &str) + Send + 'static) -> Self {
        Self {
            capturing: None,
            commit: Box::new(commit),
        }
    }

    /// The action currently being captured for, if any.
    pub fn capturing(&self) -> Option<HotkeyAction> {
        self.capturing
    }

    /// Begin capturing for `action`. A capture already in progress for a
    /// different action is abandoned; nothing is committed for it.
    pub fn start_capture(&mut self, action: HotkeyAction) {
        if let Some(previous) = self.capturing {
            if previous != action {
                debug!(abandoned = %previous, "capture superseded");
            }
        }
        self.capturing = Some(action);
    }

    /// Abandon the capture in progress, if any. The previous binding for the
    /// action stays whatever it was.
    pub fn cancel_capture(&mut self) {
        self.capturing = None;
    }

    /// Feed one key press through the state machine.
    pub fn handle_key_press(&mut self, press: KeyPress) -> CaptureResponse {
        let Some(action) = self.capturing else {
            return CaptureResponse::Ignored;
        };

        match press.effective_key() {
            PressedKey::Modifier | PressedKey::Unrecognized => CaptureResponse::Pending,
            PressedKey::Key(Key::Escape) => {
                self.capturing = None;
                debug!(action = %action, "capture cancelled");
                CaptureResponse::Cancelled
            }
            PressedKey::Key(key) => {
                let hotkey = Hotkey::new(press.modifiers, key);
                let text = hotkey.to_canonical_string();
                self.capturing = None;
                (self.commit)(action, &text);
                debug!(action = %action, hotkey = %text, "capture committed");
                CaptureResponse::Committed(hotkey)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{CaptureResponse, HotkeyCaptureController, KeyPress, PressedKey};
    use crate::hotkey::types::{Hotkey, HotkeyAction, Key, Modifiers};

    fn controller() -> (Arc<Mutex<Vec<(HotkeyAction, String)>>>, HotkeyCaptureController) {
        let commits = Arc::new(Mutex::new(Vec::new()));
        let sink = commits.clone();
        let controller = HotkeyCaptureController::new(move |action, text| {
            sink.lock().push((action, text.to_string()));
        });
        (commits, controller)
    }

    #[test]
    fn idle_controller_ignores_presses() {
        let (commits, mut controller) = controller();
        let response =
            controller.handle_key_press(KeyPress::new(PressedKey::Key(Key::A), Modifiers::empty()));
        assert_eq!(response, CaptureResponse::Ignored);
        assert!(!response.consumed());
        assert!(commits.lock().is_empty());
    }

    #[test]
    fn modifier_only_press_keeps_capturing() {
        let (commits, mut controller) = controller();
        controller.start_capture(HotkeyAction::DecreaseBrightness);
        let response = controller.handle_key_press(KeyPress::new(
            PressedKey::Modifier,
            Modifiers::CONTROL | Modifiers::SHIFT,
        ));
        assert_eq!(response, CaptureResponse::Pending);
        assert!(response.consumed());
        assert_eq!(controller.capturing(), Some(HotkeyAction::DecreaseBrightness));
        assert!(commits.lock().is_empty());
    }

    #[test]
    fn unrecognized_key_keeps_capturing() {
        let (commits, mut controller) = controller();
        controller.start_capture(HotkeyAction::DecreaseBrightness);
        let response = controller
            .handle_key_press(KeyPress::new(PressedKey::Unrecognized, Modifiers::empty()));
        assert_eq!(response, CaptureResponse::Pending);
        assert!(commits.lock().is_empty());
    }

    #[test]
    fn concrete_key_commits_once_with_live_modifiers() {
        let (commits, mut controller) = controller();
        controller.start_capture(HotkeyAction::IncreaseBrightness);
        controller.handle_key_press(KeyPress::new(PressedKey::Modifier, Modifiers::CONTROL));
        let response = controller.handle_key_press(KeyPress::new(
            PressedKey::Key(Key::F10),
            Modifiers::CONTROL | Modifiers::SHIFT,
        ));
        assert_eq!(
            response,
            CaptureResponse::Committed(Hotkey::new(
                Modifiers::CONTROL | Modifiers::SHIFT,
                Key::F10
            ))
        );
        assert_eq!(controller.capturing(), None);
        assert_eq!(
            *commits.lock(),
            vec![(
                HotkeyAction::IncreaseBrightness,
                "Ctrl+Shift+F10".to_string()
            )]
        );
    }

    #[test]
    fn escape_cancels_without_writing() {
        let (commits, mut controller) = controller();
        controller.start_capture(HotkeyAction::DecreaseBrightness);
        let response = controller
            .handle_key_press(KeyPress::new(PressedKey::Key(Key::Escape), Modifiers::empty()));
        assert_eq!(response, CaptureResponse::Cancelled);
        assert!(response.consumed());
        assert_eq!(controller.capturing(), None);
        assert!(commits.lock().is_empty());
    }

    #[test]
    fn system_key_takes_precedence() {
        let (commits, mut controller) = controller();
        controller.start_capture(HotkeyAction::DecreaseBrightness);
        let press = KeyPress {
            key: PressedKey::Unrecognized,
            system_key: Some(PressedKey::Key(Key::F9)),
            modifiers: Modifiers::ALT,
        };
        let response = controller.handle_key_press(press);
        assert_eq!(
            response,
            CaptureResponse::Committed(Hotkey::new(Modifiers::ALT, Key::F9))
        );
        assert_eq!(
            *commits.lock(),
            vec![(HotkeyAction::DecreaseBrightness, "Alt+F9".to_string())]
        );
    }

    #[test]
    fn new_capture_abandons_previous_without_commit() {
        let (commits, mut controller) = controller();
        controller.start_capture(HotkeyAction::DecreaseBrightness);
        controller.start_capture(HotkeyAction::IncreaseBrightness);
        assert_eq!(controller.capturing(), Some(HotkeyAction::IncreaseBrightness));
        controller.handle_key_press(KeyPress::new(PressedKey::Key(Key::B), Modifiers::ALT));
        assert_eq!(
            *commits.lock(),
            vec![(HotkeyAction::IncreaseBrightness, "Alt+B".to_string())]
        );
    }

    #[test]
    fn cancel_capture_then_presses_are_ignored() {
        let (commits, mut controller) = controller();
        controller.start_capture(HotkeyAction::DecreaseBrightness);
        controller.cancel_capture();
        let response =
            controller.handle_key_press(KeyPress::new(PressedKey::Key(Key::A), Modifiers::empty()));
        assert_eq!(response, CaptureResponse::Ignored);
        assert!(commits.lock().is_empty());
    }

    #[test]
    fn bare_key_commits_modifierless_hotkey() {
        let (commits, mut controller) = controller();
        controller.start_capture(HotkeyAction::IncreaseBrightness);
        controller.handle_key_press(KeyPress::new(PressedKey::Key(Key::Home), Modifiers::empty()));
        assert_eq!(
            *commits.lock(),
            vec![(HotkeyAction::IncreaseBrightness, "Home".to_string())]
        );
    }
}
