//! Audio system module
//!
//! Plays library assets on independent channels:
//!
//! ```text
//! PlaybackController
//!   ├── Preview        ─┐ exclusive: a new preview stops the old one first
//!   ├── Role(Alarm)    ─┤
//!   ├── Role(Signal)   ─┤ simultaneous playback
//!   └── Role(Ambient)  ─┘ looped
//!
//! Each channel holds one Voice started by an AudioBackend
//! (RodioBackend on the default output device).
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let backend = RodioBackend::try_default()?;
//! let controller = PlaybackController::new(store, Box::new(backend));
//!
//! controller.preview("bell")?;
//! controller.preview("rain")?;   // bell is stopped first
//! controller.stop_all();
//! ```

pub mod manager;
pub mod player;
pub mod source;

pub use manager::PlaybackController;
pub use player::{AudioBackend, RodioBackend, Voice, VoiceOptions};
pub use source::PlaybackChannel;
