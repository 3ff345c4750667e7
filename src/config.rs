use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::assets::Role;
use crate::error::ConfigError;
use crate::paths::AppPaths;

/// Default built-in alarm, installed at setup
pub const DEFAULT_ALARM_SOUND: &str = "alarm.wav";
/// Default built-in signal, installed at setup
pub const DEFAULT_SIGNAL_SOUND: &str = "signal.wav";
/// Default built-in ambience, installed at setup
pub const DEFAULT_AMBIENT_SOUND: &str = "rain.wav";

/// Which file currently fills a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    /// File name with extension
    pub name: String,
    /// Directory the file lives in
    pub path: String,
}

impl RoleBinding {
    pub fn new(name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Full path of the bound file
    pub fn file_path(&self) -> PathBuf {
        Path::new(&self.path).join(&self.name)
    }
}

/// Bindings installed at setup; also the fallback when a bound asset is removed
pub fn default_bindings(paths: &AppPaths) -> BTreeMap<Role, RoleBinding> {
    Role::ALL
        .into_iter()
        .map(|role| {
            let binding = match role {
                Role::Alarm => RoleBinding::new(DEFAULT_ALARM_SOUND, paths.sounds_dir()),
                Role::Signal => RoleBinding::new(DEFAULT_SIGNAL_SOUND, paths.sounds_dir()),
                Role::Ambient => RoleBinding::new(DEFAULT_AMBIENT_SOUND, paths.ambiences_dir()),
            };
            (role, binding)
        })
        .collect()
}

/// On-disk record for one role: `{"version": 1, "name": ..., "path": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Record version (for future migrations)
    pub version: u32,

    #[serde(flatten)]
    pub binding: RoleBinding,
}

impl RoleRecord {
    pub const VERSION: u32 = 1;

    pub fn new(binding: RoleBinding) -> Self {
        Self {
            version: Self::VERSION,
            binding,
        }
    }
}

/// Owner of the persisted role bindings.
///
/// Each role lives in its own record file, so an update rewrites only that
/// role. A record is written to disk before it becomes visible in memory;
/// a failed write leaves both unchanged.
#[derive(Debug)]
pub struct ConfigStore {
    dir: PathBuf,
    fallbacks: BTreeMap<Role, RoleBinding>,
    bindings: RwLock<BTreeMap<Role, RoleBinding>>,
}

impl ConfigStore {
    /// Open the records under `dir`. Missing records leave their role unbound.
    pub fn open(
        dir: impl Into<PathBuf>,
        fallbacks: BTreeMap<Role, RoleBinding>,
    ) -> Result<Self, ConfigError> {
        let dir = dir.into();
        let mut bindings = BTreeMap::new();
        for role in Role::ALL {
            if let Some(record) = load_record(&record_path(&dir, role))? {
                bindings.insert(role, record.binding);
            }
        }
        tracing::debug!(
            "Loaded {} role bindings from: {}",
            bindings.len(),
            dir.display()
        );

        Ok(Self {
            dir,
            fallbacks,
            bindings: RwLock::new(bindings),
        })
    }

    /// Open the store for an application layout with its default fallbacks
    pub fn for_paths(paths: &AppPaths) -> Result<Self, ConfigError> {
        Self::open(paths.config_dir(), default_bindings(paths))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Binding a role reverts to when its asset is removed
    pub fn fallback(&self, role: Role) -> Option<&RoleBinding> {
        self.fallbacks.get(&role)
    }

    /// Install the fallback binding for every role that has none.
    /// Returns true if anything was written.
    pub fn install_defaults(&self) -> Result<bool, ConfigError> {
        let mut changed = false;
        for (role, fallback) in &self.fallbacks {
            changed |= self.mutate(*role, |current| match current {
                Some(_) => None,
                None => Some(fallback.clone()),
            })?;
        }
        Ok(changed)
    }

    pub fn get_role_binding(&self, role: Role) -> Result<RoleBinding, ConfigError> {
        self.bindings
            .read()
            .get(&role)
            .cloned()
            .ok_or(ConfigError::RoleNotBound(role))
    }

    /// Overwrite the binding for `role`. File existence is not checked.
    pub fn update_role_binding(
        &self,
        role: Role,
        name: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), ConfigError> {
        let binding = RoleBinding::new(name, path);
        self.mutate(role, |_| Some(binding))?;
        tracing::info!("Bound {} to {}", role, name);
        Ok(())
    }

    /// Point the binding at `new_name` if it currently names `old_name`
    pub fn rename_if_bound(
        &self,
        role: Role,
        old_name: &str,
        new_name: &str,
    ) -> Result<bool, ConfigError> {
        self.mutate(role, |current| match current {
            Some(binding) if binding.name == old_name => Some(RoleBinding {
                name: new_name.to_string(),
                path: binding.path.clone(),
            }),
            _ => None,
        })
    }

    /// Reset `role` to its fallback if it is bound to `name`
    pub fn clear_if_bound(&self, role: Role, name: &str) -> Result<bool, ConfigError> {
        let Some(fallback) = self.fallbacks.get(&role).cloned() else {
            return Ok(false);
        };
        self.mutate(role, |current| match current {
            Some(binding) if binding.name == name => Some(fallback),
            _ => None,
        })
    }

    /// Compute a new binding for `role` from the current one, persist it,
    /// then publish it. `change` returns `None` to leave the role untouched.
    fn mutate<F>(&self, role: Role, change: F) -> Result<bool, ConfigError>
    where
        F: FnOnce(Option<&RoleBinding>) -> Option<RoleBinding>,
    {
        let mut bindings = self.bindings.write();
        let Some(updated) = change(bindings.get(&role)) else {
            return Ok(false);
        };
        self.persist(role, &updated)?;
        bindings.insert(role, updated);
        Ok(true)
    }

    fn persist(&self, role: Role, binding: &RoleBinding) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.dir).map_err(|e| ConfigError::DirectoryCreationFailed {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let path = record_path(&self.dir, role);
        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source,
        };

        let json = serde_json::to_string_pretty(&RoleRecord::new(binding.clone()))
            .map_err(|e| save_failed(Box::new(e)))?;

        // Write beside the target and rename into place
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| save_failed(Box::new(e)))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| save_failed(Box::new(e)))?;
        tmp.persist(&path)
            .map_err(|e| save_failed(Box::new(e.error)))?;

        tracing::debug!("Saved {} binding to: {}", role, path.display());
        Ok(())
    }
}

fn record_path(dir: &Path, role: Role) -> PathBuf {
    dir.join(format!("{}.json", role.as_str()))
}

fn load_record(path: &Path) -> Result<Option<RoleRecord>, ConfigError> {
    let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::LoadFailed {
        path: path.display().to_string(),
        source,
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(load_failed(Box::new(e))),
    };
    let record: RoleRecord = serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;

    if record.version != RoleRecord::VERSION {
        tracing::warn!(
            "Role record version mismatch in {}: expected {}, found {}",
            path.display(),
            RoleRecord::VERSION,
            record.version
        );
    }
    Ok(Some(record))
}
