//! Playback controller
//!
//! Owns one voice per [`PlaybackChannel`]. The preview channel is exclusive:
//! a new preview always stops and frees the previous one before starting.

use std::collections::HashMap;
use std::path::Path;

use parking_lot::Mutex;

use super::player::{AudioBackend, Voice, VoiceOptions};
use super::source::PlaybackChannel;
use crate::assets::{Asset, AssetStore, Role};
use crate::config::RoleBinding;
use crate::error::LibraryResult;

pub struct PlaybackController {
    store: AssetStore,
    backend: Box<dyn AudioBackend>,
    voices: Mutex<HashMap<PlaybackChannel, Box<dyn Voice>>>,
    volume: Mutex<f32>,
}

impl PlaybackController {
    pub fn new(store: AssetStore, backend: Box<dyn AudioBackend>) -> Self {
        Self {
            store,
            backend,
            voices: Mutex::new(HashMap::new()),
            volume: Mutex::new(1.0),
        }
    }

    /// Audition `name`, looked up in sounds first and then ambiences
    pub fn preview(&self, name: &str) -> LibraryResult<Asset> {
        let asset = self.store.resolve_any(name)?;
        self.start(PlaybackChannel::Preview, &asset.path)?;
        tracing::info!("Previewing {}", asset.path.display());
        Ok(asset)
    }

    /// Play the file bound to `role` on the role's own channel
    pub fn play_role(&self, role: Role, binding: &RoleBinding) -> LibraryResult<()> {
        let path = binding.file_path();
        self.start(PlaybackChannel::Role(role), &path)?;
        tracing::info!("Playing {} sound {}", role, path.display());
        Ok(())
    }

    pub fn stop_role(&self, role: Role) {
        self.stop(PlaybackChannel::Role(role));
    }

    /// Stop every channel. No-op when nothing is playing.
    pub fn stop_all(&self) {
        let drained: Vec<_> = self.voices.lock().drain().collect();
        for (channel, mut voice) in drained {
            voice.stop();
            tracing::debug!("Stopped {}", channel);
        }
    }

    /// Stop and release the voice on `channel`, if any
    pub fn stop(&self, channel: PlaybackChannel) {
        let voice = self.voices.lock().remove(&channel);
        if let Some(mut voice) = voice {
            voice.stop();
            tracing::debug!("Stopped {}", channel);
        }
    }

    pub fn is_playing(&self, channel: PlaybackChannel) -> bool {
        self.voices
            .lock()
            .get(&channel)
            .map(|voice| voice.is_playing())
            .unwrap_or(false)
    }

    pub fn is_previewing(&self) -> bool {
        self.is_playing(PlaybackChannel::Preview)
    }

    /// Volume applied to voices started from now on (0.0-1.0)
    pub fn set_volume(&self, volume: f32) {
        *self.volume.lock() = volume.clamp(0.0, 1.0);
    }

    /// Number of voices currently held, finished or not
    pub fn active_voices(&self) -> usize {
        self.voices.lock().len()
    }

    fn start(&self, channel: PlaybackChannel, path: &Path) -> LibraryResult<()> {
        // Stop-then-start: the old voice is gone before the new one exists
        self.stop(channel);

        let options = VoiceOptions {
            looped: channel.is_looped(),
            volume: *self.volume.lock(),
        };
        let voice = self.backend.start(path, options).map_err(|err| {
            tracing::warn!("Playback failed on {}: {}", channel, err);
            err
        })?;
        self.voices.lock().insert(channel, voice);
        Ok(())
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.stop_all();
    }
}
