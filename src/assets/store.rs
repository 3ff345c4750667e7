//! Read-only view over the built-in and user asset directories.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::category::{is_allowed_extension, AssetCategory, AssetLocation};
use crate::error::{LibraryError, LibraryResult};
use crate::paths::AppPaths;

/// Base names of the default built-in assets. User assets may never take them.
pub const DEFAULT_RESERVED_NAMES: [&str; 3] = ["alarm", "signal", "rain"];

/// A single audio file in the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub category: AssetCategory,
    pub location: AssetLocation,
    pub base_name: String,
    pub extension: String,
    pub path: PathBuf,
}

impl Asset {
    /// Build an asset from a file name found in `dir`.
    /// Returns `None` for files outside the extension allow-list.
    pub fn from_file_name(
        category: AssetCategory,
        location: AssetLocation,
        dir: &Path,
        file_name: &str,
    ) -> Option<Self> {
        let (base_name, extension) = split_file_name(file_name)?;
        Some(Self {
            category,
            location,
            base_name: base_name.to_string(),
            extension: extension.to_string(),
            path: dir.join(file_name),
        })
    }

    /// Name shown to the user
    pub fn display_name(&self) -> &str {
        &self.base_name
    }

    /// File name with extension, as stored in role bindings
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.base_name, self.extension)
    }

    /// Directory the file lives in
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Split `name.ext` into its base name and an allowed extension
pub(crate) fn split_file_name(file_name: &str) -> Option<(&str, &str)> {
    let (base, ext) = file_name.rsplit_once('.')?;
    if base.is_empty() || !is_allowed_extension(ext) {
        return None;
    }
    Some((base, ext))
}

/// Enumerates and resolves assets across both storage locations.
#[derive(Debug, Clone)]
pub struct AssetStore {
    paths: AppPaths,
    reserved: BTreeSet<String>,
}

impl AssetStore {
    /// Store over `paths` with the default reserved names
    pub fn new(paths: AppPaths) -> Self {
        Self {
            paths,
            reserved: DEFAULT_RESERVED_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the reserved name set
    pub fn with_reserved_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Names that user assets may never adopt
    pub fn reserved_names(&self) -> &BTreeSet<String> {
        &self.reserved
    }

    pub fn is_reserved(&self, base_name: &str) -> bool {
        self.reserved.contains(base_name)
    }

    /// All assets of `category`, built-in and user, sorted by base name
    pub fn assets(&self, category: AssetCategory) -> LibraryResult<Vec<Asset>> {
        let mut assets = Vec::new();
        for location in AssetLocation::PRIORITY {
            assets.extend(self.scan(category, location)?);
        }
        assets.sort_by(|a, b| a.base_name.cmp(&b.base_name));
        Ok(assets)
    }

    /// Display names for `category`, sorted for stable display
    pub fn list_assets(&self, category: AssetCategory) -> LibraryResult<Vec<String>> {
        Ok(self
            .assets(category)?
            .into_iter()
            .map(|asset| asset.base_name)
            .collect())
    }

    /// Sounds and ambiences merged into one sorted list (the preview selector)
    pub fn list_preview_names(&self) -> LibraryResult<Vec<String>> {
        let mut names = self.list_assets(AssetCategory::Sound)?;
        names.extend(self.list_assets(AssetCategory::Ambient)?);
        names.sort();
        Ok(names)
    }

    /// Assets of `category` stored at `location`, in directory order
    pub fn scan(&self, category: AssetCategory, location: AssetLocation) -> LibraryResult<Vec<Asset>> {
        let dir = self.paths.dir_for(category, location);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("Asset directory missing, treating as empty: {}", dir.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(LibraryError::io(&dir, err)),
        };

        // Entries can vanish mid-scan; skip them rather than fail
        let assets = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                Asset::from_file_name(category, location, &dir, &file_name)
            })
            .collect();
        Ok(assets)
    }

    /// Find `name` (base name or file name) trying built-in first, then user
    pub fn resolve(&self, category: AssetCategory, name: &str) -> LibraryResult<Asset> {
        for location in AssetLocation::PRIORITY {
            if let Some(asset) = self.find_at(category, location, name)? {
                debug!("Resolved {} {} to {}", category, name, asset.path.display());
                return Ok(asset);
            }
        }
        Err(LibraryError::NotFound(name.to_string()))
    }

    /// Find `name` at one specific location
    pub fn resolve_at(
        &self,
        category: AssetCategory,
        location: AssetLocation,
        name: &str,
    ) -> LibraryResult<Asset> {
        self.find_at(category, location, name)?
            .ok_or_else(|| LibraryError::NotFound(name.to_string()))
    }

    /// Find `name` in the sound pool first, then the ambient pool
    pub fn resolve_any(&self, name: &str) -> LibraryResult<Asset> {
        for category in AssetCategory::ALL {
            match self.resolve(category, name) {
                Ok(asset) => return Ok(asset),
                Err(LibraryError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(LibraryError::NotFound(name.to_string()))
    }

    /// True if a file called exactly `file_name` was already imported
    pub fn is_user_imported(&self, file_name: &str, category: AssetCategory) -> bool {
        self.paths
            .dir_for(category, AssetLocation::User)
            .join(file_name)
            .exists()
    }

    /// True if any visible asset of `category` other than `except` uses `base_name`
    pub fn base_name_taken(
        &self,
        category: AssetCategory,
        base_name: &str,
        except: Option<&Asset>,
    ) -> LibraryResult<bool> {
        Ok(self
            .assets(category)?
            .iter()
            .any(|asset| asset.base_name == base_name && Some(asset) != except))
    }

    fn find_at(
        &self,
        category: AssetCategory,
        location: AssetLocation,
        name: &str,
    ) -> LibraryResult<Option<Asset>> {
        let dir = self.paths.dir_for(category, location);

        if let Some(asset) = Asset::from_file_name(category, location, &dir, name) {
            if asset.path.is_file() {
                return Ok(Some(asset));
            }
        }

        Ok(self
            .scan(category, location)?
            .into_iter()
            .find(|asset| asset.base_name == name))
    }
}
