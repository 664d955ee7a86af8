//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback. Every play
//! request gets its own sink; finished sinks are pruned on the next play.

use std::io::Cursor;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use super::AudioBackend;
use crate::audio::{AudioError, AudioSource};
use crate::core::AudioConfig;

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Sinks that may still be playing
    active_sinks: Vec<Sink>,
    volume: f32,
}

impl RodioBackend {
    /// Create a closed backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            active_sinks: Vec::new(),
            volume: 1.0,
        }
    }

    /// Number of sinks still playing
    pub fn active_count(&self) -> usize {
        self.active_sinks.iter().filter(|sink| !sink.empty()).count()
    }

    fn decode(source: &AudioSource) -> Result<Decoder<Cursor<std::sync::Arc<[u8]>>>, AudioError> {
        Decoder::new(Cursor::new(source.shared_data())).map_err(|e| AudioError::InvalidFormat {
            name: source.name().to_string(),
            reason: e.to_string(),
        })
    }
}

impl AudioBackend for RodioBackend {
    fn name(&self) -> &'static str {
        "rodio"
    }

    fn open(&mut self, config: &AudioConfig) -> Result<(), AudioError> {
        if self.stream_handle.is_some() {
            return Ok(());
        }

        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(format!("Failed to create audio output: {e}")))?;

        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);
        self.volume = config.volume.clamp(0.0, 1.0);

        log::info!("Rodio audio backend initialized");
        Ok(())
    }

    fn prepare(&mut self, source: &AudioSource) -> Result<(), AudioError> {
        Self::decode(source).map(|_| ())
    }

    fn play(&mut self, source: &AudioSource) -> Result<(), AudioError> {
        let stream_handle = self
            .stream_handle
            .as_ref()
            .ok_or(AudioError::BackendNotInitialized)?;

        let sink = Sink::try_new(stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {e}")))?;
        sink.set_volume(self.volume);
        sink.append(Self::decode(source)?);

        self.active_sinks.retain(|sink| !sink.empty());
        self.active_sinks.push(sink);
        Ok(())
    }

    fn close(&mut self) {
        if self.stream_handle.is_none() {
            return;
        }

        for sink in self.active_sinks.drain(..) {
            sink.stop();
        }
        self.stream_handle = None;
        self._output_stream = None;

        log::info!("Rodio audio backend shutdown");
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tests::silent_wav;

    #[test]
    fn test_playback_without_initialization() {
        let mut backend = RodioBackend::new();
        let source = AudioSource::new("jump", silent_wav());

        let result = backend.play(&source);
        assert!(matches!(result, Err(AudioError::BackendNotInitialized)));
    }

    #[test]
    fn test_prepare_decodes_wav() {
        let mut backend = RodioBackend::new();
        assert!(backend.prepare(&AudioSource::new("ok", silent_wav())).is_ok());
        assert!(backend.prepare(&AudioSource::new("bad", vec![0_u8; 64])).is_err());
    }

    #[test]
    fn test_open_close_when_device_available() {
        let mut backend = RodioBackend::new();

        // May fail in CI/test environments without audio device
        if backend.open(&AudioConfig::default()).is_ok() {
            backend.play(&AudioSource::new("jump", silent_wav())).unwrap();
            backend.close();
            assert_eq!(backend.active_count(), 0);
        }
    }
}
