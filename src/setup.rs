//! First-run application setup
//!
//! Creates the directory layout, installs the built-in sound packs and the
//! default role bindings. Safe to run on every start.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::assets::is_allowed_extension;
use crate::config::ConfigStore;
use crate::error::{LibraryError, LibraryResult};
use crate::paths::AppPaths;

/// Where to copy built-in assets from when their directories are first created
#[derive(Debug, Clone, Default)]
pub struct SeedSources {
    pub sounds: Option<PathBuf>,
    pub ambiences: Option<PathBuf>,
}

/// What a setup run changed
#[derive(Debug, Default)]
pub struct SetupReport {
    pub created_dirs: Vec<PathBuf>,
    pub seeded_files: Vec<PathBuf>,
    pub defaults_installed: bool,
}

impl SetupReport {
    pub fn is_first_run(&self) -> bool {
        !self.created_dirs.is_empty()
    }
}

pub struct AppSetup;

impl AppSetup {
    /// Prepare `paths` and return the opened config store
    pub fn run(paths: &AppPaths, seeds: &SeedSources) -> LibraryResult<(ConfigStore, SetupReport)> {
        let mut report = SetupReport::default();

        for dir in paths.all_dirs() {
            if dir.exists() {
                continue;
            }
            fs::create_dir_all(&dir).map_err(|e| LibraryError::io(&dir, e))?;
            info!("Created {}", dir.display());
            report.created_dirs.push(dir);
        }

        let seeds_for = [
            (paths.sounds_dir(), seeds.sounds.as_deref()),
            (paths.ambiences_dir(), seeds.ambiences.as_deref()),
        ];
        for (target, seed) in seeds_for {
            let Some(seed) = seed else { continue };
            if report.created_dirs.contains(&target) {
                report.seeded_files.extend(copy_audio_files(seed, &target)?);
            }
        }

        let config = ConfigStore::for_paths(paths)?;
        report.defaults_installed = config.install_defaults()?;
        if report.defaults_installed {
            info!("Installed default sounds in {}", config.dir().display());
        }

        Ok((config, report))
    }
}

fn copy_audio_files(from: &Path, to: &Path) -> LibraryResult<Vec<PathBuf>> {
    let entries = fs::read_dir(from).map_err(|e| LibraryError::io(from, e))?;
    let mut copied = Vec::new();

    for entry in entries.filter_map(|entry| entry.ok()) {
        let source = entry.path();
        let allowed = source
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(is_allowed_extension);
        if !source.is_file() || !allowed {
            continue;
        }
        let target = to.join(entry.file_name());
        fs::copy(&source, &target).map_err(|e| LibraryError::io(&target, e))?;
        info!("Copying: {}", source.display());
        copied.push(target);
    }

    copied.sort();
    Ok(copied)
}
