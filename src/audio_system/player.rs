//! Audio output backends
//!
//! [`AudioBackend`] starts a [`Voice`] for a file; the voice owns every
//! resource of that playback and releases them on drop.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::error::PlaybackError;

/// Options for starting a voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceOptions {
    pub looped: bool,
    pub volume: f32,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            looped: false,
            volume: 1.0,
        }
    }
}

/// A single playing sound
pub trait Voice: Send {
    /// Stop playback. Safe to call more than once.
    fn stop(&mut self);

    /// True until the sound finishes or is stopped
    fn is_playing(&self) -> bool;
}

/// Something that can turn a file into a playing [`Voice`] without blocking
pub trait AudioBackend {
    fn start(&self, path: &Path, options: VoiceOptions) -> Result<Box<dyn Voice>, PlaybackError>;
}

/// Backend on the default output device
pub struct RodioBackend {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl RodioBackend {
    /// Open the default output device
    pub fn try_default() -> Result<Self, PlaybackError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::StreamInitFailed(Box::new(e)))?;
        tracing::debug!("Opened default audio output stream");
        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }
}

impl AudioBackend for RodioBackend {
    fn start(&self, path: &Path, options: VoiceOptions) -> Result<Box<dyn Voice>, PlaybackError> {
        let file = File::open(path).map_err(|e| PlaybackError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let reader = BufReader::new(file);
        let decode_failed = |e: rodio::decoder::DecoderError| PlaybackError::DecodeFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        };

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| PlaybackError::PlaybackFailed(Box::new(e)))?;
        sink.set_volume(options.volume.clamp(0.0, 1.0));

        // Decoding runs on the mixer thread; only the header is probed here
        if options.looped {
            sink.append(Decoder::new_looped(reader).map_err(decode_failed)?);
        } else {
            sink.append(Decoder::new(reader).map_err(decode_failed)?);
        }
        sink.play();

        tracing::debug!("Started voice for {} (looped={})", path.display(), options.looped);
        Ok(Box::new(RodioVoice { sink }))
    }
}

struct RodioVoice {
    sink: Sink,
}

impl Voice for RodioVoice {
    fn stop(&mut self) {
        self.sink.stop();
    }

    fn is_playing(&self) -> bool {
        !self.sink.empty() && !self.sink.is_paused()
    }
}
