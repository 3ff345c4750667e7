//! Event types published by the sound library.
//!
//! Events represent things that have happened (past tense).

use crate::assets::{AssetCategory, Role};
use crate::config::RoleBinding;

/// Sound library events
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryEvent {
    /// A file was copied into a user directory
    AssetImported { category: AssetCategory, name: String },

    /// A user asset changed its base name
    AssetRenamed {
        category: AssetCategory,
        old_name: String,
        new_name: String,
    },

    /// A user asset was deleted
    AssetRemoved { category: AssetCategory, name: String },

    /// A role now points at a different file
    RoleBindingChanged { role: Role, binding: RoleBinding },
}

impl LibraryEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            LibraryEvent::AssetImported { category, name } => {
                format!("Imported {category}: {name}")
            }
            LibraryEvent::AssetRenamed {
                category,
                old_name,
                new_name,
            } => format!("Renamed {category}: {old_name} -> {new_name}"),
            LibraryEvent::AssetRemoved { category, name } => {
                format!("Removed {category}: {name}")
            }
            LibraryEvent::RoleBindingChanged { role, binding } => {
                format!("{role} set to {}", binding.name)
            }
        }
    }
}
