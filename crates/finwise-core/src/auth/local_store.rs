//! Durable local key-value store
//!
//! A single JSON file in the platform data directory holding the serialized
//! active profile and the dark-mode flag. Writes are atomic (temp file +
//! rename) and best-effort: failures are logged, never surfaced, matching
//! the role local storage plays in the sign-in flow.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::UserProfile;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    profile: Option<UserProfile>,
    #[serde(default)]
    dark_mode: bool,
}

/// File-backed local store for the active profile and UI flags
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Open the store at the default platform location
    /// (e.g. `~/.local/share/finwise/store.json`)
    pub fn open_default() -> Self {
        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("finwise").join("store.json"),
        }
    }

    /// Open a store at an explicit path (tests, alternate profiles)
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn load(&self) -> StoreData {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "Local store unreadable, starting fresh");
                StoreData::default()
            }),
            Err(_) => StoreData::default(),
        }
    }

    /// Atomic write: temp file in the same directory, then rename over.
    fn store(&self, data: &StoreData) -> std::io::Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| std::path::Path::new("."));
        fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        let json = serde_json::to_string_pretty(data)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut StoreData)) {
        let mut data = self.load();
        apply(&mut data);
        if let Err(e) = self.store(&data) {
            warn!(path = %self.path.display(), error = %e, "Local store write failed");
        }
    }

    /// The stored profile, if any
    pub fn load_profile(&self) -> Option<UserProfile> {
        self.load().profile
    }

    /// Persist the active profile (best-effort)
    pub fn save_profile(&self, profile: &UserProfile) {
        self.update(|data| data.profile = Some(profile.clone()));
    }

    /// Remove the stored profile, keeping other keys
    pub fn clear_profile(&self) {
        self.update(|data| data.profile = None);
    }

    pub fn dark_mode(&self) -> bool {
        self.load().dark_mode
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        self.update(|data| data.dark_mode = enabled);
    }
}
