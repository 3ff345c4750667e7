//! Playback channels
//!
//! Each channel holds at most one voice. Channels play simultaneously.

use std::fmt;

use crate::assets::Role;

/// Independent playback slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackChannel {
    /// Auditioning a sound from the settings screen
    Preview,

    /// Timer playback for a role (alarm chime, signal cue, ambient loop)
    Role(Role),
}

impl fmt::Display for PlaybackChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackChannel::Preview => write!(f, "Preview"),
            PlaybackChannel::Role(Role::Alarm) => write!(f, "Alarm"),
            PlaybackChannel::Role(Role::Signal) => write!(f, "Signal"),
            PlaybackChannel::Role(Role::Ambient) => write!(f, "Ambient"),
        }
    }
}

impl PlaybackChannel {
    /// Whether the voice restarts when it reaches the end
    pub fn is_looped(&self) -> bool {
        matches!(self, PlaybackChannel::Role(Role::Ambient))
    }
}
