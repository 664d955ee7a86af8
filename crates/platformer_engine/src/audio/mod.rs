//! Audio system
//!
//! Sources are loaded once at startup into an [`AudioSystem`] registry and
//! shared read-only by every playback request. Gameplay never calls the
//! backend directly: it spawns [`AudioPlayer`](crate::ecs::AudioPlayer)
//! entities, which [`trigger::drain_audio_requests`] plays and destroys
//! once per frame.

pub mod backend;
pub mod trigger;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use slotmap::SlotMap;
use thiserror::Error;

use crate::core::AudioConfig;

pub use backend::{AudioBackend, NullAudioBackend, PlayLog};
pub use trigger::drain_audio_requests;

slotmap::new_key_type! {
    /// Handle to a loaded [`AudioSource`]
    pub struct AudioSourceId;
}

/// Audio errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// Playback requested before [`AudioSystem::open`]
    #[error("Audio backend is not initialized")]
    BackendNotInitialized,

    /// The output device could not be opened
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// The sample is not in a supported format
    #[error("Invalid audio data in {name}: {reason}")]
    InvalidFormat {
        /// Source name
        name: String,
        /// What was wrong
        reason: String,
    },

    /// The sample file could not be read
    #[error("Failed to read audio file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The id does not name a loaded source
    #[error("Unknown audio source {0:?}")]
    UnknownSource(AudioSourceId),

    /// The backend failed to start playback
    #[error("Audio playback failed: {0}")]
    PlaybackFailed(String),
}

/// Immutable encoded sample
#[derive(Debug, Clone)]
pub struct AudioSource {
    name: String,
    data: Arc<[u8]>,
}

impl AudioSource {
    /// Wrap encoded bytes
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Name used in logs, usually the file path
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the encoded bytes
    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }
}

/// Check for a RIFF/WAVE header
pub fn validate_wav(name: &str, bytes: &[u8]) -> Result<(), AudioError> {
    let invalid = |reason: &str| AudioError::InvalidFormat {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if bytes.len() < 12 {
        return Err(invalid("file too short for a RIFF header"));
    }
    if &bytes[0..4] != b"RIFF" {
        return Err(invalid("missing RIFF tag"));
    }
    if &bytes[8..12] != b"WAVE" {
        return Err(invalid("RIFF form is not WAVE"));
    }
    Ok(())
}

/// Source registry plus the playback backend
pub struct AudioSystem {
    backend: Box<dyn AudioBackend>,
    sources: SlotMap<AudioSourceId, AudioSource>,
    config: AudioConfig,
    opened: bool,
}

impl AudioSystem {
    /// Create a closed audio system over `backend`
    pub fn new(backend: Box<dyn AudioBackend>, config: AudioConfig) -> Self {
        Self {
            backend,
            sources: SlotMap::with_key(),
            config,
            opened: false,
        }
    }

    /// Open the output device
    pub fn open(&mut self) -> Result<(), AudioError> {
        if self.opened {
            return Ok(());
        }
        self.backend.open(&self.config)?;
        self.opened = true;
        log::info!("Audio backend '{}' opened", self.backend.name());
        Ok(())
    }

    /// Whether [`open`](Self::open) has succeeded
    pub const fn is_open(&self) -> bool {
        self.opened
    }

    /// Load a WAV file into the registry
    pub fn load_wav(&mut self, path: impl AsRef<Path>) -> Result<AudioSourceId, AudioError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AudioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_wav_bytes(path.display().to_string(), bytes)
    }

    /// Register in-memory WAV bytes
    pub fn add_wav_bytes(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Result<AudioSourceId, AudioError> {
        let source = AudioSource::new(name, bytes);
        validate_wav(source.name(), source.data())?;
        self.backend.prepare(&source)?;

        log::debug!("Loaded audio source '{}' ({} bytes)", source.name(), source.data().len());
        Ok(self.sources.insert(source))
    }

    /// Look up a loaded source
    pub fn source(&self, id: AudioSourceId) -> Option<&AudioSource> {
        self.sources.get(id)
    }

    /// Number of loaded sources
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Start one playback of `id`
    pub fn play(&mut self, id: AudioSourceId) -> Result<(), AudioError> {
        if !self.opened {
            return Err(AudioError::BackendNotInitialized);
        }
        let source = self.sources.get(id).ok_or(AudioError::UnknownSource(id))?;
        self.backend.play(source)
    }

    /// Stop playback and release the device
    pub fn close(&mut self) {
        if self.opened {
            self.backend.close();
            self.opened = false;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal valid WAV: 16-bit mono 8 kHz, four silent samples
    pub(crate) fn silent_wav() -> Vec<u8> {
        let samples = [0_u8; 8];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + samples.len() as u32).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16_u32.to_le_bytes());
        bytes.extend_from_slice(&1_u16.to_le_bytes());
        bytes.extend_from_slice(&1_u16.to_le_bytes());
        bytes.extend_from_slice(&8_000_u32.to_le_bytes());
        bytes.extend_from_slice(&16_000_u32.to_le_bytes());
        bytes.extend_from_slice(&2_u16.to_le_bytes());
        bytes.extend_from_slice(&16_u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&(samples.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&samples);
        bytes
    }

    fn system() -> (AudioSystem, PlayLog) {
        let backend = NullAudioBackend::new();
        let log = backend.play_log();
        (AudioSystem::new(Box::new(backend), AudioConfig::default()), log)
    }

    #[test]
    fn test_validate_wav() {
        assert!(validate_wav("ok", &silent_wav()).is_ok());
        assert!(matches!(
            validate_wav("short", b"RIFF"),
            Err(AudioError::InvalidFormat { .. })
        ));
        assert!(validate_wav("ogg", b"OggS\0\0\0\0\0\0\0\0\0\0").is_err());
    }

    #[test]
    fn test_play_requires_open() {
        let (mut audio, log) = system();
        let id = audio.add_wav_bytes("jump", silent_wav()).unwrap();

        assert!(matches!(audio.play(id), Err(AudioError::BackendNotInitialized)));

        audio.open().unwrap();
        audio.play(id).unwrap();
        assert_eq!(log.names(), vec!["jump".to_string()]);
    }

    #[test]
    fn test_invalid_bytes_not_registered() {
        let (mut audio, _) = system();
        assert!(audio.add_wav_bytes("noise", vec![1, 2, 3]).is_err());
        assert_eq!(audio.source_count(), 0);
    }

    #[test]
    fn test_missing_file() {
        let (mut audio, _) = system();
        let result = audio.load_wav("does/not/exist.wav");
        assert!(matches!(result, Err(AudioError::Io { .. })));
    }

    #[test]
    fn test_sources_share_data() {
        let (mut audio, _) = system();
        let id = audio.add_wav_bytes("coin", silent_wav()).unwrap();
        let source = audio.source(id).unwrap();

        assert_eq!(source.name(), "coin");
        assert_eq!(source.data(), silent_wav().as_slice());
        assert_eq!(Arc::strong_count(&source.shared_data()), 2);
    }
}
