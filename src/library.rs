//! Import, rename and removal of sound assets.
//!
//! Every operation validates all of its preconditions before touching the
//! filesystem, then performs a single filesystem step, then reconciles the
//! role bindings so none of them points at a file that no longer exists.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::assets::{is_allowed_extension, Asset, AssetCategory, AssetLocation, AssetStore, Role};
use crate::config::{ConfigStore, RoleBinding};
use crate::error::{LibraryError, LibraryResult};
use crate::messaging::{EventBus, LibraryEvent};
use crate::slug::{is_valid_sound_name, soundify};

/// The only writer of asset files and, besides the user's own selections,
/// of role bindings.
pub struct SoundLibrary {
    store: AssetStore,
    config: Arc<ConfigStore>,
    events: Option<EventBus>,
    // Serialises directory mutation and the binding fix-up that follows it
    mutation: Mutex<()>,
}

impl SoundLibrary {
    pub fn new(store: AssetStore, config: Arc<ConfigStore>) -> Self {
        Self {
            store,
            config,
            events: None,
            mutation: Mutex::new(()),
        }
    }

    /// Publish a [`LibraryEvent`] on `bus` after each successful mutation
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    /// Copy `source` into the user directory for `category`.
    ///
    /// The base name is sanitised with [`soundify`]. No role is assigned.
    pub fn import_asset(&self, category: AssetCategory, source: &Path) -> LibraryResult<Asset> {
        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let base_name = soundify(&stem);
        if base_name.is_empty() {
            return Err(LibraryError::InvalidName(stem));
        }
        if self.store.is_reserved(&base_name) {
            warn!("Rejected import of {}: name reserved", source.display());
            return Err(LibraryError::ReservedName(base_name));
        }

        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| is_allowed_extension(ext))
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| LibraryError::UnsupportedFormat(source.display().to_string()))?;
        let file_name = format!("{base_name}.{extension}");

        let _guard = self.mutation.lock();

        if self.store.is_user_imported(&file_name, category)
            || self.store.base_name_taken(category, &base_name, None)?
        {
            warn!("Rejected import of {}: already imported", source.display());
            return Err(LibraryError::DuplicateAsset(base_name));
        }
        if !source.is_file() {
            return Err(LibraryError::NotFound(source.display().to_string()));
        }

        let dir = self.store.paths().dir_for(category, AssetLocation::User);
        fs::create_dir_all(&dir).map_err(|e| LibraryError::io(&dir, e))?;
        let target = dir.join(&file_name);
        copy_into_place(source, &target)?;

        info!("Imported {} as {}", source.display(), target.display());
        self.publish(LibraryEvent::AssetImported {
            category,
            name: base_name.clone(),
        });

        Ok(Asset {
            category,
            location: AssetLocation::User,
            base_name,
            extension,
            path: target,
        })
    }

    /// Give a user asset a new base name, keeping its directory and extension
    pub fn rename_asset(
        &self,
        category: AssetCategory,
        location: AssetLocation,
        old_name: &str,
        new_name: &str,
    ) -> LibraryResult<Asset> {
        if self.store.is_reserved(new_name) {
            warn!("Rejected rename of {} to {}: name reserved", old_name, new_name);
            return Err(LibraryError::ReservedName(new_name.to_string()));
        }
        if !location.is_mutable() {
            return Err(LibraryError::Forbidden(old_name.to_string()));
        }
        if !is_valid_sound_name(new_name) {
            return Err(LibraryError::InvalidName(new_name.to_string()));
        }

        let _guard = self.mutation.lock();

        let asset = self.store.resolve_at(category, location, old_name)?;
        if asset.base_name == new_name {
            return Ok(asset);
        }
        if self.store.base_name_taken(category, new_name, Some(&asset))? {
            warn!("Rejected rename of {} to {}: name taken", old_name, new_name);
            return Err(LibraryError::DuplicateAsset(new_name.to_string()));
        }

        let old_file_name = asset.file_name();
        let new_file_name = format!("{new_name}.{}", asset.extension);
        let target = asset.dir().join(&new_file_name);
        // fs::rename overwrites on unix
        if target.exists() {
            return Err(LibraryError::DuplicateAsset(new_name.to_string()));
        }
        fs::rename(&asset.path, &target).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LibraryError::NotFound(old_name.to_string()),
            _ => LibraryError::io(&asset.path, e),
        })?;
        info!("Renamed {} to {}", asset.path.display(), target.display());

        let rebound = match self.rebind_renamed(category, &old_file_name, &new_file_name) {
            Ok(rebound) => rebound,
            Err(err) => {
                warn!("Rolling back rename of {}: {}", asset.path.display(), err);
                if let Err(e) = fs::rename(&target, &asset.path) {
                    warn!("Failed to restore {}: {}", asset.path.display(), e);
                }
                return Err(err);
            }
        };

        self.publish(LibraryEvent::AssetRenamed {
            category,
            old_name: asset.base_name.clone(),
            new_name: new_name.to_string(),
        });
        self.publish_bindings(&rebound);

        Ok(Asset {
            base_name: new_name.to_string(),
            path: target,
            ..asset
        })
    }

    /// Delete a user asset. Confirmation is the caller's responsibility.
    pub fn remove_asset(
        &self,
        category: AssetCategory,
        location: AssetLocation,
        name: &str,
    ) -> LibraryResult<()> {
        if !location.is_mutable() {
            return Err(LibraryError::Forbidden(name.to_string()));
        }

        let _guard = self.mutation.lock();

        let asset = self.store.resolve_at(category, location, name)?;
        let file_name = asset.file_name();

        // Park the file under a name no scan lists until the bindings are settled
        let parked = asset.dir().join(format!(".{file_name}.removing"));
        fs::rename(&asset.path, &parked).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LibraryError::NotFound(name.to_string()),
            _ => LibraryError::io(&asset.path, e),
        })?;

        let cleared = match self.clear_removed(category, &file_name) {
            Ok(cleared) => cleared,
            Err(err) => {
                warn!("Rolling back removal of {}: {}", asset.path.display(), err);
                if let Err(e) = fs::rename(&parked, &asset.path) {
                    warn!("Failed to restore {}: {}", asset.path.display(), e);
                }
                return Err(err);
            }
        };

        fs::remove_file(&parked).map_err(|e| LibraryError::io(&parked, e))?;
        info!("Removed {}", asset.path.display());

        self.publish(LibraryEvent::AssetRemoved {
            category,
            name: asset.base_name,
        });
        self.publish_bindings(&cleared);
        Ok(())
    }

    /// Bind `role` to the asset displayed as `name` in the role's category
    pub fn assign_role(&self, role: Role, name: &str) -> LibraryResult<RoleBinding> {
        let _guard = self.mutation.lock();

        let asset = self.store.resolve(role.category(), name)?;
        self.config
            .update_role_binding(role, &asset.file_name(), asset.dir())?;
        let binding = self.config.get_role_binding(role)?;
        self.publish(LibraryEvent::RoleBindingChanged {
            role,
            binding: binding.clone(),
        });
        Ok(binding)
    }

    /// Full path of the file currently bound to `role`
    pub fn role_file(&self, role: Role) -> LibraryResult<PathBuf> {
        Ok(self.config.get_role_binding(role)?.file_path())
    }

    /// Move every binding of `old_file_name` to `new_file_name`.
    /// On failure the roles already moved are put back.
    fn rebind_renamed(
        &self,
        category: AssetCategory,
        old_file_name: &str,
        new_file_name: &str,
    ) -> LibraryResult<Vec<Role>> {
        let mut rebound = Vec::new();
        for role in category.roles() {
            match self.config.rename_if_bound(*role, old_file_name, new_file_name) {
                Ok(true) => rebound.push(*role),
                Ok(false) => {}
                Err(err) => {
                    for role in &rebound {
                        if let Err(e) = self.config.rename_if_bound(*role, new_file_name, old_file_name) {
                            warn!("Failed to restore {} binding: {}", role, e);
                        }
                    }
                    return Err(err.into());
                }
            }
        }
        Ok(rebound)
    }

    /// Reset every role bound to `file_name` to its fallback.
    /// On failure the roles already reset are rebound to `file_name`.
    fn clear_removed(&self, category: AssetCategory, file_name: &str) -> LibraryResult<Vec<Role>> {
        let mut cleared: Vec<(Role, RoleBinding)> = Vec::new();
        for role in category.roles() {
            let previous = self.config.get_role_binding(*role).ok();
            match self.config.clear_if_bound(*role, file_name) {
                Ok(true) => {
                    info!("{} fell back to its default sound", role);
                    if let Some(previous) = previous {
                        cleared.push((*role, previous));
                    }
                }
                Ok(false) => {}
                Err(err) => {
                    for (role, previous) in &cleared {
                        if let Err(e) =
                            self.config
                                .update_role_binding(*role, &previous.name, &previous.path)
                        {
                            warn!("Failed to restore {} binding: {}", role, e);
                        }
                    }
                    return Err(err.into());
                }
            }
        }
        Ok(cleared.into_iter().map(|(role, _)| role).collect())
    }

    fn publish_bindings(&self, roles: &[Role]) {
        for role in roles {
            if let Ok(binding) = self.config.get_role_binding(*role) {
                self.publish(LibraryEvent::RoleBindingChanged {
                    role: *role,
                    binding,
                });
            }
        }
    }

    fn publish(&self, event: LibraryEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}

/// Copy `source` to a temporary file beside `target`, then move it into place
/// without replacing an existing file.
fn copy_into_place(source: &Path, target: &Path) -> LibraryResult<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".import-")
        .tempfile_in(dir)
        .map_err(|e| LibraryError::io(dir, e))?;

    let mut reader = fs::File::open(source).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LibraryError::NotFound(source.display().to_string()),
        _ => LibraryError::io(source, e),
    })?;
    io::copy(&mut reader, tmp.as_file_mut()).map_err(|e| LibraryError::io(target, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| LibraryError::io(target, e))?;

    tmp.persist_noclobber(target).map_err(|e| match e.error.kind() {
        io::ErrorKind::AlreadyExists => LibraryError::DuplicateAsset(
            target
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
        ),
        _ => LibraryError::io(target, e.error),
    })?;
    Ok(())
}
