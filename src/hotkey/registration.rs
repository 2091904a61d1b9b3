//! Lifecycle of a single OS hotkey registration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::backend::{HotkeyBackend, RegistrationError, RegistrationId};
use super::types::Hotkey;

/// Callback invoked when the registered hotkey fires.
pub type TriggerCallback = Arc<dyn Fn() + Send + Sync>;

/// One active OS registration.
///
/// Registration happens at construction: `register` either yields a live
/// instance or the error, so a failed attempt never owns OS state. Disposal
/// is idempotent and also runs on drop, which ties the OS claim to the value's
/// scope instead of a manual release call.
pub struct HotkeyRegistration {
    backend: Arc<dyn HotkeyBackend>,
    hotkey: Hotkey,
    id: RegistrationId,
    disposed: AtomicBool,
    subscribers: Mutex<Vec<TriggerCallback>>,
}

impl HotkeyRegistration {
    /// Claim `hotkey` with the OS via `backend`.
    pub fn register(
        backend: Arc<dyn HotkeyBackend>,
        hotkey: Hotkey,
    ) -> Result<Self, RegistrationError> {
        let id = backend.register(&hotkey)?;
        debug!(hotkey = %hotkey, registration_id = %id, "registered global hotkey");
        Ok(Self {
            backend,
            hotkey,
            id,
            disposed: AtomicBool::new(false),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn hotkey(&self) -> Hotkey {
        self.hotkey
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// Add a callback to run when this hotkey fires.
    pub fn subscribe(&self, callback: TriggerCallback) {
        self.subscribers.lock().push(callback);
    }

    /// Invoke the current subscribers, in subscription order, on the calling
    /// thread. The list is cloned first so no lock is held during dispatch;
    /// a callback may subscribe or dispose without deadlocking.
    pub fn notify_triggered(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }
        let callbacks: Vec<TriggerCallback> = self.subscribers.lock().clone();
        for callback in callbacks {
            callback();
        }
    }

    /// Release the OS claim. Safe to call any number of times; only the first
    /// call clears subscribers and unregisters.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.subscribers.lock().clear();
        self.backend.unregister(self.id, &self.hotkey);
        debug!(hotkey = %self.hotkey, registration_id = %self.id, "disposed global hotkey");
    }
}

impl Drop for HotkeyRegistration {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::HotkeyRegistration;
    use crate::hotkey::backend::testing::MockBackend;
    use crate::hotkey::backend::{HotkeyBackend, RegistrationError};
    use crate::hotkey::types::{Hotkey, Key, Modifiers};

    fn sample_hotkey() -> Hotkey {
        Hotkey::new(Modifiers::CONTROL | Modifiers::SHIFT, Key::F9)
    }

    #[test]
    fn register_claims_hotkey_with_backend() {
        let backend = Arc::new(MockBackend::new());
        let registration =
            HotkeyRegistration::register(backend.clone(), sample_hotkey()).unwrap();
        assert_eq!(backend.active_hotkeys(), vec![sample_hotkey()]);
        assert_eq!(registration.hotkey(), sample_hotkey());
    }

    #[test]
    fn failed_register_owns_nothing() {
        let backend = Arc::new(MockBackend::new());
        *backend.fail_next.lock() = Some(RegistrationError::AlreadyClaimed {
            hotkey: "Ctrl+Shift+F9".to_string(),
        });
        let result = HotkeyRegistration::register(backend.clone(), sample_hotkey());
        assert!(result.is_err());
        assert!(backend.active_hotkeys().is_empty());
        assert!(backend.unregister_calls.lock().is_empty());
    }

    #[test]
    fn notify_runs_subscribers_in_order() {
        let backend = Arc::new(MockBackend::new());
        let registration = HotkeyRegistration::register(backend, sample_hotkey()).unwrap();

        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = order.clone();
            registration.subscribe(Arc::new(move || order.lock().push(tag)));
        }
        registration.notify_triggered();
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn dispose_twice_unregisters_once() {
        let backend = Arc::new(MockBackend::new());
        let registration =
            HotkeyRegistration::register(backend.clone(), sample_hotkey()).unwrap();
        registration.dispose();
        registration.dispose();
        assert_eq!(backend.unregister_calls.lock().len(), 1);
        assert!(backend.active_hotkeys().is_empty());
    }

    #[test]
    fn drop_releases_the_claim() {
        let backend = Arc::new(MockBackend::new());
        {
            let _registration =
                HotkeyRegistration::register(backend.clone(), sample_hotkey()).unwrap();
            assert_eq!(backend.active_hotkeys().len(), 1);
        }
        assert!(backend.active_hotkeys().is_empty());
        assert_eq!(backend.unregister_calls.lock().len(), 1);
    }

    #[test]
    fn dispose_then_drop_still_one_unregister() {
        let backend = Arc::new(MockBackend::new());
        {
            let registration =
                HotkeyRegistration::register(backend.clone(), sample_hotkey()).unwrap();
            registration.dispose();
        }
        assert_eq!(backend.unregister_calls.lock().len(), 1);
    }

    #[test]
    fn disposed_registration_stops_notifying() {
        let backend = Arc::new(MockBackend::new());
        let registration = HotkeyRegistration::register(backend, sample_hotkey()).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let hits = hits.clone();
            registration.subscribe(Arc::new(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
        }
        registration.notify_triggered();
        registration.dispose();
        registration.notify_triggered();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mock_ids_are_unique() {
        let backend = Arc::new(MockBackend::new());
        let a = backend.register(&sample_hotkey()).unwrap();
        let b = backend
            .register(&Hotkey::new(Modifiers::CONTROL | Modifiers::SHIFT, Key::F10))
            .unwrap();
        assert_ne!(a, b);
    }
}
