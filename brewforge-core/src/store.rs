//! Per-device preferences: favorite methods and the display unit system.
//!
//! Values live behind a small string key/value store so the same logic runs
//! against a JSON file on disk or an in-memory map in tests. Unreadable values
//! are treated as absent and never surface as errors.

use crate::error::BrewError;
use brewforge_schemas::units::UnitSystem;
use directories::ProjectDirs;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub const FAVORITES_KEY: &str = "bitter-grind-favorites";
pub const UNITS_KEY: &str = "bitter-grind-units";

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "brewforge";
const APP_NAME: &str = "brewforge";
const STORE_FILENAME: &str = "preferences.json";

pub type FavoriteSet = BTreeSet<String>;

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), BrewError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BrewError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object of string entries, rewritten in full on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Platform config location, e.g. `~/.config/brewforge/preferences.json` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .map(|dirs| dirs.config_dir().join(STORE_FILENAME))
    }

    /// Opens the store at `path`. A missing or unparsable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => {
                    debug!(path = %path.display(), "loaded preferences");
                    entries
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "preference file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no preference file yet");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read preference file, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), BrewError> {
        let display = self.path.display().to_string();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| BrewError::FileIO(display.clone(), e))?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content).map_err(|e| BrewError::FileIO(display, e))
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BrewError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// Favorites and unit preference, read once from the store and written back on change.
#[derive(Debug)]
pub struct Preferences<S: PreferenceStore> {
    store: S,
    favorites: FavoriteSet,
    units: UnitSystem,
}

impl<S: PreferenceStore> Preferences<S> {
    pub fn load(store: S) -> Self {
        let favorites = store
            .get(FAVORITES_KEY)
            .and_then(|raw| match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => Some(ids.into_iter().collect()),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable favorites");
                    None
                }
            })
            .unwrap_or_default();
        // Anything other than "imperial" reads as metric.
        let units = match store.get(UNITS_KEY).as_deref() {
            Some("imperial") => UnitSystem::Imperial,
            _ => UnitSystem::Metric,
        };
        Self { store, favorites, units }
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, method_id: &str) -> bool {
        self.favorites.contains(method_id)
    }

    /// Flips a method in or out of the favorites and returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, method_id: &str) -> bool {
        let now_favorite = if self.favorites.remove(method_id) {
            false
        } else {
            self.favorites.insert(method_id.to_string());
            true
        };
        self.save_favorites();
        now_favorite
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.units
    }

    pub fn set_unit_system(&mut self, units: UnitSystem) {
        self.units = units;
        self.save_units();
    }

    pub fn toggle_units(&mut self) -> UnitSystem {
        self.set_unit_system(self.units.toggled());
        self.units
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn save_favorites(&mut self) {
        let ids: Vec<&String> = self.favorites.iter().collect();
        let result = serde_json::to_string(&ids)
            .map_err(BrewError::from)
            .and_then(|raw| self.store.set(FAVORITES_KEY, &raw));
        if let Err(e) = result {
            warn!(error = %e, "failed to save favorites");
        }
    }

    fn save_units(&mut self) {
        if let Err(e) = self.store.set(UNITS_KEY, self.units.as_str()) {
            warn!(error = %e, "failed to save unit preference");
        }
    }
}
