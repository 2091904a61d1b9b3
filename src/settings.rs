//! Persisted user settings.
//!
//! Hotkeys are stored as text in the hotkey grammar; an empty string means
//! the action is unbound. Missing fields fall back to the canonical default
//! bindings, so an empty or partial settings file still yields a working
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::hotkey::HotkeyAction;

const SETTINGS_DIR: &str = ".brightkey";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not determine home directory")]
    NoHomeDir,
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

fn default_decrease_hotkey() -> String {
    HotkeyAction::DecreaseBrightness.default_hotkey().to_string()
}

fn default_increase_hotkey() -> String {
    HotkeyAction::IncreaseBrightness.default_hotkey().to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_decrease_hotkey")]
    pub decrease_brightness_hotkey: String,
    #[serde(default = "default_increase_hotkey")]
    pub increase_brightness_hotkey: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decrease_brightness_hotkey: default_decrease_hotkey(),
            increase_brightness_hotkey: default_increase_hotkey(),
        }
    }
}

impl Settings {
    pub fn hotkey_text(&self, action: HotkeyAction) -> &str {
        match action {
            HotkeyAction::DecreaseBrightness => &self.decrease_brightness_hotkey,
            HotkeyAction::IncreaseBrightness => &self.increase_brightness_hotkey,
        }
    }

    pub fn set_hotkey_text(&mut self, action: HotkeyAction, text: impl Into<String>) {
        let slot = match action {
            HotkeyAction::DecreaseBrightness => &mut self.decrease_brightness_hotkey,
            HotkeyAction::IncreaseBrightness => &mut self.increase_brightness_hotkey,
        };
        *slot = text.into();
    }

    /// Restore the canonical default for `action`, whatever the field held
    /// before, and return it.
    pub fn reset_hotkey(&mut self, action: HotkeyAction) -> &str {
        let default = action.default_hotkey();
        self.set_hotkey_text(action, default);
        default
    }
}

/// Loads and saves [`Settings`] at a fixed path.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.brightkey/settings.json`.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let home = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;
        Ok(home.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. An absent file yields defaults; a file that exists but
    /// does not parse is an error rather than silently discarded user data.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, SettingsStore};
    use crate::hotkey::HotkeyAction;

    #[test]
    fn defaults_match_canonical_bindings() {
        let settings = Settings::default();
        assert_eq!(
            settings.hotkey_text(HotkeyAction::DecreaseBrightness),
            "Ctrl+Shift+F9"
        );
        assert_eq!(
            settings.hotkey_text(HotkeyAction::IncreaseBrightness),
            "Ctrl+Shift+F10"
        );
    }

    #[test]
    fn reset_restores_default_over_anything() {
        let mut settings = Settings::default();
        settings.set_hotkey_text(HotkeyAction::DecreaseBrightness, "Alt+Q");
        assert_eq!(
            settings.reset_hotkey(HotkeyAction::DecreaseBrightness),
            "Ctrl+Shift+F9"
        );
        assert_eq!(
            settings.hotkey_text(HotkeyAction::DecreaseBrightness),
            "Ctrl+Shift+F9"
        );

        settings.set_hotkey_text(HotkeyAction::IncreaseBrightness, "");
        assert_eq!(
            settings.reset_hotkey(HotkeyAction::IncreaseBrightness),
            "Ctrl+Shift+F10"
        );
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));
        let mut settings = Settings::default();
        settings.set_hotkey_text(HotkeyAction::IncreaseBrightness, "Ctrl+Alt+Up");
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"decrease_brightness_hotkey": "Win+F5"}"#).unwrap();
        let settings = SettingsStore::new(path).load().unwrap();
        assert_eq!(settings.hotkey_text(HotkeyAction::DecreaseBrightness), "Win+F5");
        assert_eq!(
            settings.hotkey_text(HotkeyAction::IncreaseBrightness),
            "Ctrl+Shift+F10"
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(SettingsStore::new(path).load().is_err());
    }
}
