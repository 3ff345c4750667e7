//! Asset categories, storage locations and the roles that draw from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Audio file extensions scanned in every asset directory
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["wav", "mp3", "ogg", "flac", "opus"];

/// True if `ext` (without the dot) is an allowed audio extension
pub fn is_allowed_extension(ext: &str) -> bool {
    ALLOWED_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(ext))
}

/// Storage pool an asset belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetCategory {
    /// Short sounds used for alarms and signals
    Sound,

    /// Long background loops
    Ambient,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 2] = [AssetCategory::Sound, AssetCategory::Ambient];

    /// Roles that draw their asset from this pool
    pub fn roles(self) -> &'static [Role] {
        match self {
            AssetCategory::Sound => &[Role::Alarm, Role::Signal],
            AssetCategory::Ambient => &[Role::Ambient],
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetCategory::Sound => write!(f, "sound"),
            AssetCategory::Ambient => write!(f, "ambient"),
        }
    }
}

impl FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sound" | "sounds" => Ok(AssetCategory::Sound),
            "ambient" | "ambience" | "ambiences" => Ok(AssetCategory::Ambient),
            other => Err(format!("unknown sound category: {other}")),
        }
    }
}

/// Where an asset file lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetLocation {
    /// Shipped with the application, read-only
    BuiltIn,

    /// Imported by the user, mutable
    User,
}

impl AssetLocation {
    /// Lookup order when resolving a name
    pub const PRIORITY: [AssetLocation; 2] = [AssetLocation::BuiltIn, AssetLocation::User];

    pub fn is_mutable(self) -> bool {
        matches!(self, AssetLocation::User)
    }
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetLocation::BuiltIn => write!(f, "built-in"),
            AssetLocation::User => write!(f, "user"),
        }
    }
}

/// Semantic slot read by the timer to pick a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End of a focus or break phase
    Alarm,

    /// Short cue during a phase
    Signal,

    /// Background loop while focusing
    Ambient,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Alarm, Role::Signal, Role::Ambient];

    /// Pool the role's asset is chosen from
    pub fn category(self) -> AssetCategory {
        match self {
            Role::Alarm | Role::Signal => AssetCategory::Sound,
            Role::Ambient => AssetCategory::Ambient,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Alarm => "alarm",
            Role::Signal => "signal",
            Role::Ambient => "ambient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alarm" => Ok(Role::Alarm),
            "signal" => Ok(Role::Signal),
            "ambient" => Ok(Role::Ambient),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
