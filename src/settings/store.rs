//! Settings persistence

use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use super::model::{
    clamp_font_size, DisplayPatch, DisplaySettings, LastTimerInput, PartialSettings, Settings,
    TimerField,
};
use crate::error::{PersistenceError, SettingsError};

/// Owns the settings record and its optional on-disk copy.
///
/// Writes only reach the disk while the persist toggle is on; otherwise the
/// record lives for the session only.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    persist: bool,
    settings: Settings,
}

impl ConfigStore {
    /// Create a store holding the default settings
    pub fn new(path: impl Into<PathBuf>, persist: bool) -> Self {
        Self {
            path: path.into(),
            persist,
            settings: Settings::default(),
        }
    }

    /// Load settings from disk (when persistence is enabled), filling any
    /// missing key from the defaults. Read errors fall back to defaults.
    pub fn load(&mut self) -> Settings {
        self.settings = if self.persist && self.path.exists() {
            match read_settings(&self.path) {
                Ok(settings) => {
                    info!("Loaded settings from {}", self.path.display());
                    settings
                }
                Err(e) => {
                    warn!("Error loading config from {}: {}", self.path.display(), e);
                    Settings::default()
                }
            }
        } else {
            debug!("Using default settings");
            Settings::default()
        };
        self.settings.clone()
    }

    /// Write the current settings when persistence is enabled
    pub fn save(&self) -> Result<(), PersistenceError> {
        if !self.persist {
            debug!("Persistence disabled, keeping settings in memory only");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.path, json)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Best-effort save, failures are logged
    pub fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            warn!("Error saving config: {}", e);
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn persist_enabled(&self) -> bool {
        self.persist
    }

    /// Toggle persistence. Enabling it writes the current state right away.
    pub fn set_persist(&mut self, persist: bool) -> Result<(), PersistenceError> {
        self.persist = persist;
        info!("Settings persistence {}", if persist { "enabled" } else { "disabled" });
        self.save()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.settings.display
    }

    pub fn last_timer(&self) -> LastTimerInput {
        self.settings.last_timer
    }

    /// Apply a live display edit and persist it
    pub fn update_display(&mut self, patch: &DisplayPatch) -> Result<DisplaySettings, SettingsError> {
        patch.apply_to(&mut self.settings.display)?;
        self.save_or_warn();
        Ok(self.settings.display.clone())
    }

    /// Apply the raw text of one timer input field and persist it
    pub fn set_timer_field(&mut self, field: TimerField, raw: &str) -> Result<LastTimerInput, SettingsError> {
        self.settings.last_timer.apply_keystroke(field, raw)?;
        self.save_or_warn();
        Ok(self.settings.last_timer)
    }

    pub fn set_last_timer(&mut self, input: LastTimerInput) {
        self.settings.last_timer = input.clamped();
    }

    /// Record the overlay geometry (drag, resize or application close)
    pub fn set_overlay_geometry(&mut self, position: (i32, i32), size: (u32, u32)) {
        self.settings.display.overlay_position = position;
        self.settings.display.overlay_size = size;
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.settings.display.font_size = clamp_font_size(size);
    }
}

/// Read and merge a settings document
pub fn read_settings(path: &Path) -> Result<Settings, PersistenceError> {
    let contents = fs::read_to_string(path)?;
    let partial: PartialSettings = serde_json::from_str(&contents)?;
    Ok(partial.merge_over_defaults())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_round_trip() -> Result<(), PersistenceError> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("timer.json");

        let mut store = ConfigStore::new(&path, true);
        store.update_display(&DisplayPatch {
            font_family: Some("Consolas".to_string()),
            font_size: Some(48),
            text_color: Some("#FF0000".to_string()),
            bg_color: Some("#00FF00".to_string()),
            opacity: Some(0.5),
            auto_size: Some(false),
            overlay_position: Some((120, -40)),
            overlay_size: Some((640, 300)),
        }).unwrap();
        store.set_last_timer(LastTimerInput::new(1, 2, 3, 4));
        store.save()?;

        let mut reloaded = ConfigStore::new(&path, true);
        let settings = reloaded.load();
        assert_eq!(&settings, store.settings());
        Ok(())
    }

    #[test]
    fn test_load_fills_missing_keys() -> Result<(), PersistenceError> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("timer.json");
        fs::write(&path, r##"{ "bg_color": "#101010", "overlay_size": [300, 120] }"##)?;

        let mut store = ConfigStore::new(&path, true);
        let settings = store.load();

        assert_eq!(settings.display.bg_color, "#101010");
        assert_eq!(settings.display.overlay_size, (300, 120));
        assert_eq!(settings.display.font_family, "Arial");
        assert_eq!(settings.display.opacity, 0.9);
        assert_eq!(settings.last_timer, LastTimerInput::default());
        Ok(())
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() -> Result<(), PersistenceError> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("timer.json");
        fs::write(&path, "{ not json")?;

        let mut store = ConfigStore::new(&path, true);
        assert_eq!(store.load(), Settings::default());
        assert!(matches!(read_settings(&path), Err(PersistenceError::Json(_))));
        Ok(())
    }

    #[test]
    fn test_disabled_persistence_never_touches_disk() -> Result<(), PersistenceError> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("timer.json");

        let mut store = ConfigStore::new(&path, false);
        store.set_timer_field(TimerField::Minutes, "15").unwrap();
        store.save()?;
        assert!(!path.exists());

        // A file from an earlier session is ignored too
        fs::write(&path, r#"{ "font_size": 99 }"#)?;
        assert_eq!(store.load().display.font_size, 12);

        store.set_persist(true)?;
        assert_eq!(read_settings(&path)?.display.font_size, 12);
        Ok(())
    }

    #[test]
    fn test_save_reports_io_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing-dir").join("timer.json");

        let store = ConfigStore::new(&path, true);
        assert!(matches!(store.save(), Err(PersistenceError::Io(_))));
    }
}
