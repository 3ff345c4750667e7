//! Sound asset management and playback control for the Focus Keeper timer.
//!
//! Built-in and user-imported sounds are merged into one namespace per
//! category, role bindings (alarm, signal, ambient) are persisted and kept
//! valid across renames and removals, and previews play one at a time.

pub mod assets;
pub mod audio_system;
pub mod config;
pub mod error;
pub mod library;
pub mod messaging;
pub mod paths;
pub mod setup;
pub mod slug;

pub use assets::{Asset, AssetCategory, AssetLocation, AssetStore, Role};
pub use audio_system::{AudioBackend, PlaybackChannel, PlaybackController, RodioBackend, Voice};
pub use config::{ConfigStore, RoleBinding};
pub use error::{ConfigError, LibraryError, LibraryResult, PlaybackError};
pub use library::SoundLibrary;
pub use messaging::{EventBus, LibraryEvent};
pub use paths::AppPaths;
pub use setup::{AppSetup, SeedSources, SetupReport};
