//! Reconciles configured hotkey text with live OS registrations and routes
//! trigger events to per-action callbacks.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::backend::{HotkeyBackend, RegistrationError, RegistrationId};
use super::registration::{HotkeyRegistration, TriggerCallback};
use super::types::{Hotkey, HotkeyAction};
use crate::settings::Settings;

/// What a reconcile pass did for an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The text parsed and the OS accepted the registration.
    Registered(Hotkey),
    /// The text did not describe a hotkey; the action is now unbound.
    Cleared,
}

/// Owns at most one [`HotkeyRegistration`] per action and keeps them in sync
/// with configured hotkey text.
///
/// Locks are never held across backend calls or callback dispatch, so
/// callbacks may call back into the manager (e.g. `reconcile` from a trigger
/// handler) without deadlocking.
pub struct HotkeyManager {
    backend: Arc<dyn HotkeyBackend>,
    registrations: Mutex<HashMap<HotkeyAction, Arc<HotkeyRegistration>>>,
    callbacks: Mutex<HashMap<HotkeyAction, Vec<TriggerCallback>>>,
}

impl HotkeyManager {
    pub fn new(backend: Arc<dyn HotkeyBackend>) -> Self {
        Self {
            backend,
            registrations: Mutex::new(HashMap::new()),
            callbacks: Mutex::new(HashMap::new()),
        }
    }

    /// Bring the OS registration for `action` in line with `text`.
    ///
    /// Any existing registration is disposed first, so two registrations for
    /// one action are never simultaneously active; a press landing in the
    /// gap between release and re-claim is missed, never misdelivered.
    ///
    /// Text that fails to parse means "not configured" and clears the
    /// binding. An OS refusal leaves the action unbound and is returned to
    /// the caller; there is no automatic retry.
    pub fn reconcile(
        &self,
        action: HotkeyAction,
        text: &str,
    ) -> Result<ReconcileOutcome, RegistrationError> {
        let old = self.registrations.lock().remove(&action);
        if let Some(old) = old {
            old.dispose();
        }

        let hotkey = match Hotkey::parse(text) {
            Ok(hotkey) => hotkey,
            Err(e) => {
                debug!(action = %action, text, error = %e, "hotkey not configured");
                return Ok(ReconcileOutcome::Cleared);
            }
        };

        let registration = HotkeyRegistration::register(self.backend.clone(), hotkey)?;
        info!(action = %action, hotkey = %hotkey, "bound global hotkey");
        self.registrations
            .lock()
            .insert(action, Arc::new(registration));
        Ok(ReconcileOutcome::Registered(hotkey))
    }

    /// Add a callback to run whenever `action`'s hotkey fires. Callbacks
    /// survive re-registration of the underlying hotkey.
    pub fn subscribe(&self, action: HotkeyAction, callback: TriggerCallback) {
        self.callbacks.lock().entry(action).or_default().push(callback);
    }

    /// Forward a trigger for the registration identified by `id`.
    ///
    /// Invoked once per OS-delivered press, in delivery order, on the
    /// listener thread; presses are never coalesced here. An id that matches
    /// no live registration (a press racing a reconcile) is dropped.
    pub fn dispatch(&self, id: RegistrationId) {
        let hit = {
            let registrations = self.registrations.lock();
            registrations
                .iter()
                .find(|(_, r)| r.id() == id)
                .map(|(action, r)| (*action, r.clone()))
        };
        let Some((action, registration)) = hit else {
            debug!(registration_id = %id, "trigger for unknown registration dropped");
            return;
        };

        let callbacks: Vec<TriggerCallback> = self
            .callbacks
            .lock()
            .get(&action)
            .cloned()
            .unwrap_or_default();
        for callback in callbacks {
            callback();
        }
        registration.notify_triggered();
    }

    /// The hotkey currently bound to `action`, if any.
    pub fn active_hotkey(&self, action: HotkeyAction) -> Option<Hotkey> {
        self.registrations
            .lock()
            .get(&action)
            .map(|r| r.hotkey())
    }

    /// Reconcile every action against `settings`. Registration failures are
    /// logged and do not stop the remaining actions from being applied.
    pub fn apply_settings(&self, settings: &Settings) {
        for action in HotkeyAction::ALL {
            if let Err(e) = self.reconcile(action, settings.hotkey_text(action)) {
                warn!(action = %action, error = %e, "failed to bind global hotkey");
            }
        }
    }

    /// Release every registration. Also happens on drop.
    pub fn dispose_all(&self) {
        let registrations: Vec<_> = {
            let mut map = self.registrations.lock();
            map.drain().map(|(_, r)| r).collect()
        };
        for registration in registrations {
            registration.dispose();
        }
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

/// Drain the process-wide hotkey event stream on a background thread,
/// forwarding each press to `manager.dispatch`. Release events are ignored.
pub fn spawn_trigger_listener(manager: Arc<HotkeyManager>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.recv() {
            if event.state == HotKeyState::Pressed {
                manager.dispatch(RegistrationId(event.id));
            }
        }
        debug!("hotkey event channel closed; listener exiting");
    })
}
