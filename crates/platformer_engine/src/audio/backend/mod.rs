//! Audio backend implementations
//!
//! Platform-independent abstraction over audio playback libraries.

#[cfg(feature = "rodio")]
pub mod rodio_backend;

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::{validate_wav, AudioError, AudioSource};
use crate::core::AudioConfig;

#[cfg(feature = "rodio")]
pub use rodio_backend::RodioBackend;

/// Audio backend trait for platform abstraction
///
/// Single-threaded: implementations need not be `Send`.
pub trait AudioBackend {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Open the output device
    fn open(&mut self, config: &AudioConfig) -> Result<(), AudioError>;

    /// Validate a source at load time so playback cannot fail on its format
    fn prepare(&mut self, source: &AudioSource) -> Result<(), AudioError>;

    /// Enqueue one playback
    fn play(&mut self, source: &AudioSource) -> Result<(), AudioError>;

    /// Stop every sound and release the device
    fn close(&mut self);
}

/// Shared record of the sources a [`NullAudioBackend`] played
#[derive(Debug, Clone, Default)]
pub struct PlayLog(Rc<RefCell<Vec<String>>>);

impl PlayLog {
    /// Names of the played sources, in order
    pub fn names(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Number of playbacks
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether nothing was played
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Forget recorded playbacks
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn record(&self, name: &str) {
        self.0.borrow_mut().push(name.to_string());
    }
}

/// Silent backend that records playbacks
///
/// Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct NullAudioBackend {
    log: PlayLog,
    opened: bool,
}

impl NullAudioBackend {
    /// Create a closed backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the playback record, valid after the backend is boxed
    pub fn play_log(&self) -> PlayLog {
        self.log.clone()
    }
}

impl AudioBackend for NullAudioBackend {
    fn name(&self) -> &'static str {
        "null"
    }

    fn open(&mut self, _config: &AudioConfig) -> Result<(), AudioError> {
        self.opened = true;
        Ok(())
    }

    fn prepare(&mut self, source: &AudioSource) -> Result<(), AudioError> {
        validate_wav(source.name(), source.data())
    }

    fn play(&mut self, source: &AudioSource) -> Result<(), AudioError> {
        if !self.opened {
            return Err(AudioError::BackendNotInitialized);
        }
        self.log.record(source.name());
        Ok(())
    }

    fn close(&mut self) {
        self.opened = false;
    }
}

/// Create the backend selected by cargo features
///
/// With the `rodio` feature this opens the default output device; otherwise
/// it is the silent [`NullAudioBackend`].
pub fn create_backend() -> Box<dyn AudioBackend> {
    #[cfg(feature = "rodio")]
    {
        Box::new(RodioBackend::new())
    }
    #[cfg(not(feature = "rodio"))]
    {
        Box::new(NullAudioBackend::new())
    }
}
