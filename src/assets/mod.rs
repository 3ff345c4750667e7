//! Sound asset catalogue
//!
//! Built-in and user directories are merged into one namespace per
//! category. Lookups try each [`AssetLocation`] in priority order and
//! return the first hit; nothing is cached, every call re-scans disk.

pub mod category;
pub mod store;

pub use category::{is_allowed_extension, AssetCategory, AssetLocation, Role, ALLOWED_EXTENSIONS};
pub use store::{Asset, AssetStore, DEFAULT_RESERVED_NAMES};
