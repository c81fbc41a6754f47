//! Persisted display theme preference

use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable overriding the home directory used for `.countries/`
pub const HOME_ENV: &str = "COUNTRIES_HOME";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Label for the toggle control, naming the mode it switches to
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Light => "Dark Mode",
            Theme::Dark => "Light Mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: Option<Theme>,
}

/// Get the directory holding persisted state (`~/.countries`)
pub fn get_state_dir() -> Result<PathBuf> {
    state_dir_in(std::env::var(HOME_ENV).ok(), dirs::home_dir())
}

/// An empty override is ignored
fn state_dir_in(home_override: Option<String>, home: Option<PathBuf>) -> Result<PathBuf> {
    let home = match home_override.filter(|h| !h.is_empty()) {
        Some(h) => PathBuf::from(h),
        None => home.context("Could not determine home directory")?,
    };
    Ok(home.join(".countries"))
}

/// One key-value preference file
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(get_state_dir()?.join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored theme, or `None` when nothing valid is stored
    pub fn load_theme(&self) -> Option<Theme> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("No preferences at {}: {}", self.path.display(), e);
                return None;
            }
        };
        match toml::from_str::<Preferences>(&contents) {
            Ok(prefs) => prefs.theme,
            Err(e) => {
                log::debug!("Ignoring unreadable preferences {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string(&Preferences { theme: Some(theme) })?;
        AtomicFile::new(&self.path, OverwriteBehavior::AllowOverwrite)
            .write(|f| {
                f.write_all(contents.as_bytes())?;
                f.flush()
            })
            .map_err(|err| anyhow::anyhow!("Failed to write preferences: {err}"))?;
        Ok(())
    }
}

/// Current theme plus its persistence
#[derive(Debug)]
pub struct ThemeController {
    store: PreferenceStore,
    current: Theme,
}

impl ThemeController {
    /// Read the stored preference once; absent means [`Theme::Light`]
    pub fn load(store: PreferenceStore) -> Self {
        let current = store.load_theme().unwrap_or_default();
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip the theme and persist it. The in-memory value only changes once
    /// the write succeeded.
    pub fn toggle(&mut self) -> Result<Theme> {
        let next = self.current.toggled();
        self.store.save_theme(next)?;
        self.current = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, PreferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join(".countries").join("preferences.toml"));
        (dir, store)
    }

    #[test]
    fn test_absent_preference_defaults_to_light() {
        let (_dir, store) = temp_store();
        let controller = ThemeController::load(store);
        assert_eq!(controller.current(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let (_dir, store) = temp_store();
        let mut controller = ThemeController::load(store.clone());
        assert_eq!(controller.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.load_theme(), Some(Theme::Dark));

        let reloaded = ThemeController::load(store);
        assert_eq!(reloaded.current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let (_dir, store) = temp_store();
        store.save_theme(Theme::Dark).unwrap();

        let mut controller = ThemeController::load(store.clone());
        let original_flag = controller.current();
        let original_stored = store.load_theme();

        controller.toggle().unwrap();
        controller.toggle().unwrap();

        assert_eq!(controller.current(), original_flag);
        assert_eq!(store.load_theme(), original_stored);
    }

    #[test]
    fn test_garbage_preferences_fall_back_to_default() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "theme = \"sepia\"\n").unwrap();
        assert_eq!(store.load_theme(), None);
        assert_eq!(ThemeController::load(store).current(), Theme::Light);
    }

    #[test]
    fn test_file_format() {
        let (_dir, store) = temp_store();
        store.save_theme(Theme::Dark).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents.trim(), "theme = \"dark\"");
    }

    #[test]
    fn test_toggle_label_names_target_mode() {
        assert_eq!(Theme::Light.toggle_label(), "Dark Mode");
        assert_eq!(Theme::Dark.toggle_label(), "Light Mode");
    }

    #[test]
    fn test_state_dir_prefers_non_empty_override() {
        let fallback = Some(PathBuf::from("/home/someone"));
        assert_eq!(
            state_dir_in(Some("/tmp/sandbox".into()), fallback.clone()).unwrap(),
            PathBuf::from("/tmp/sandbox/.countries")
        );
        assert_eq!(
            state_dir_in(Some(String::new()), fallback).unwrap(),
            PathBuf::from("/home/someone/.countries")
        );
        assert!(state_dir_in(Some(String::new()), None).is_err());
    }
}
