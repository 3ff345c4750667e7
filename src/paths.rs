//! Filesystem layout of the sound library
//!
//! ```text
//! <home>/
//!   app_data/
//!     sounds/            built-in sounds (read-only)
//!     ambiences/         built-in ambiences (read-only)
//!     sound_config/      one record per role (alarm.json, ...)
//!   user_data/
//!     user_sounds/       imported sounds
//!     user_ambiences/    imported ambiences
//!   logs/
//! ```

use std::path::{Path, PathBuf};

use crate::assets::{AssetCategory, AssetLocation};

/// Application folder name under the platform data directory
pub const APP_DIR_NAME: &str = "FocusKeeper";

const CONFIG_DIR_NAME: &str = "sound_config";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    home: PathBuf,
    app_data: PathBuf,
    user_data: PathBuf,
}

impl AppPaths {
    /// Layout rooted at `home`
    pub fn under(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            app_data: home.join("app_data"),
            user_data: home.join("user_data"),
            home,
        }
    }

    /// Layout under the platform data directory, e.g. `~/.local/share/FocusKeeper`
    pub fn platform_default() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::under(dir.join(APP_DIR_NAME)))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn app_data(&self) -> &Path {
        &self.app_data
    }

    pub fn user_data(&self) -> &Path {
        &self.user_data
    }

    pub fn sounds_dir(&self) -> PathBuf {
        self.app_data.join("sounds")
    }

    pub fn ambiences_dir(&self) -> PathBuf {
        self.app_data.join("ambiences")
    }

    pub fn user_sounds_dir(&self) -> PathBuf {
        self.user_data.join("user_sounds")
    }

    pub fn user_ambiences_dir(&self) -> PathBuf {
        self.user_data.join("user_ambiences")
    }

    /// Directory holding assets of `category` at `location`
    pub fn dir_for(&self, category: AssetCategory, location: AssetLocation) -> PathBuf {
        match (category, location) {
            (AssetCategory::Sound, AssetLocation::BuiltIn) => self.sounds_dir(),
            (AssetCategory::Ambient, AssetLocation::BuiltIn) => self.ambiences_dir(),
            (AssetCategory::Sound, AssetLocation::User) => self.user_sounds_dir(),
            (AssetCategory::Ambient, AssetLocation::User) => self.user_ambiences_dir(),
        }
    }

    /// Directory holding the role binding records
    pub fn config_dir(&self) -> PathBuf {
        self.app_data.join(CONFIG_DIR_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.home.join("logs")
    }

    /// Every directory of the layout, parents first
    pub fn all_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.home.clone(),
            self.app_data.clone(),
            self.sounds_dir(),
            self.ambiences_dir(),
            self.user_data.clone(),
            self.user_sounds_dir(),
            self.user_ambiences_dir(),
        ]
    }
}
