use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use sysinfo::System;

use focus_keeper_sounds::{
    AppPaths, AppSetup, AssetCategory, AssetStore, ConfigStore, PlaybackController, RodioBackend,
    Role, SeedSources, SoundLibrary,
};

const LOG_TARGET_STARTUP: &str = "focus_keeper_sounds::startup";

#[derive(Parser, Debug)]
#[command(name = "focus-keeper-sounds", version, about = "Manage Focus Keeper alarm, signal and ambient sounds")]
struct Cli {
    /// Application home directory (defaults to the platform data directory)
    #[arg(long, env = "FOCUS_KEEPER_HOME", global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the directory layout and default role bindings
    Setup {
        /// Directory to copy built-in sounds from on first run
        #[arg(long)]
        seed_sounds: Option<PathBuf>,
        /// Directory to copy built-in ambiences from on first run
        #[arg(long)]
        seed_ambiences: Option<PathBuf>,
    },
    /// List sounds of a category (sound, ambient or all)
    List {
        #[arg(default_value = "all")]
        category: String,
    },
    /// Copy an audio file into the user library
    Import {
        category: AssetCategory,
        file: PathBuf,
    },
    /// Rename a user sound
    Rename {
        category: AssetCategory,
        old_name: String,
        new_name: String,
    },
    /// Delete a user sound
    Remove {
        category: AssetCategory,
        name: String,
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
    /// Bind a role to a sound
    Assign { role: Role, name: String },
    /// Show the sound bound to a role
    Binding { role: Role },
    /// Play a sound from either pool
    Preview {
        name: String,
        /// Stop after this many seconds
        #[arg(long, default_value_t = 10)]
        seconds: u64,
        /// Playback volume from 0.0 to 1.0
        #[arg(long, default_value_t = 1.0)]
        volume: f32,
    },
}

/// Initialize tracing with file rotation
///
/// Logs are written to `<home>/logs/focus-keeper-sounds.YYYY-MM-DD.log`.
/// Debug builds also log to the console.
fn initialize_tracing(paths: &AppPaths) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = paths.log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "focus-keeper-sounds.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::debug!("Log directory: {}", log_dir.display());
    guard
}

fn log_runtime_environment() {
    let version = env!("CARGO_PKG_VERSION");
    let os_name = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| "Unknown OS".to_string());
    let architecture = std::env::consts::ARCH;

    tracing::info!(target: LOG_TARGET_STARTUP, "Starting focus-keeper-sounds v{} on {} ({})", version, os_name, architecture);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.home {
        Some(home) => AppPaths::under(home),
        None => AppPaths::platform_default()
            .ok_or_else(|| anyhow!("Could not determine user data directory"))?,
    };

    let _log_guard = initialize_tracing(&paths);
    log_runtime_environment();

    let config = Arc::new(
        ConfigStore::for_paths(&paths).context("Failed to open sound configuration")?,
    );
    let store = AssetStore::new(paths.clone());
    let library = SoundLibrary::new(store.clone(), Arc::clone(&config));

    match cli.command {
        Commands::Setup {
            seed_sounds,
            seed_ambiences,
        } => {
            let seeds = SeedSources {
                sounds: seed_sounds,
                ambiences: seed_ambiences,
            };
            let (_config, report) = AppSetup::run(&paths, &seeds).context("Setup failed")?;
            println!("✓ Focus Keeper home: {}", paths.home().display());
            println!("  Created {} folders", report.created_dirs.len());
            println!("  Copied {} built-in sounds", report.seeded_files.len());
            if report.defaults_installed {
                println!("  Installed default role sounds");
            }
        }
        Commands::List { category } => {
            let names = match category.as_str() {
                "all" => store.list_preview_names()?,
                other => {
                    let category: AssetCategory = other.parse().map_err(|e: String| anyhow!(e))?;
                    store.list_assets(category)?
                }
            };
            for name in names {
                println!("{name}");
            }
        }
        Commands::Import { category, file } => {
            let asset = library.import_asset(category, &file)?;
            println!("✓ Imported: {}", asset.file_name());
        }
        Commands::Rename {
            category,
            old_name,
            new_name,
        } => {
            let location = store.resolve(category, &old_name)?.location;
            let asset = library.rename_asset(category, location, &old_name, &new_name)?;
            println!("✓ Renamed {} to {}", old_name, asset.display_name());
        }
        Commands::Remove {
            category,
            name,
            yes,
        } => {
            if !yes {
                bail!("Refusing to remove {name} without --yes");
            }
            let location = store.resolve(category, &name)?.location;
            library.remove_asset(category, location, &name)?;
            println!("✓ Removed {name}");
        }
        Commands::Assign { role, name } => {
            let binding = library.assign_role(role, &name)?;
            println!("✓ {}: {}", role, binding.name);
        }
        Commands::Binding { role } => {
            let binding = config.get_role_binding(role)?;
            println!("{}: {} ({})", role, binding.name, binding.path);
        }
        Commands::Preview {
            name,
            seconds,
            volume,
        } => {
            let backend = RodioBackend::try_default()?;
            let controller = PlaybackController::new(store, Box::new(backend));
            controller.set_volume(volume);
            let asset = controller.preview(&name)?;
            println!("▶ {} (Ctrl+C to stop)", asset.display_name());

            let deadline = Instant::now() + Duration::from_secs(seconds);
            while controller.is_previewing() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(100));
            }
            controller.stop_all();
        }
    }

    Ok(())
}
