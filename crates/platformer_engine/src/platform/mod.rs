//! Platform event sources
//!
//! A [`Platform`] turns OS events into [`PlatformEvent`]s for the engine's
//! event pump. [`ScriptedPlatform`] replays a fixed script for headless runs
//! and tests; `GlfwPlatform` (feature `glfw`) reads a real window.

#[cfg(feature = "glfw")]
pub mod glfw_platform;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::input::KeyCode;

#[cfg(feature = "glfw")]
pub use glfw_platform::GlfwPlatform;

/// Platform errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The windowing library failed to start
    #[error("Platform initialization failed: {0}")]
    InitializationFailed(String),

    /// The window could not be created
    #[error("Window creation failed")]
    WindowCreationFailed,
}

/// Event delivered to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The user asked to close the game
    Quit,
    /// A key changed state
    Key {
        /// Key
        key: KeyCode,
        /// `true` on press, `false` on release
        pressed: bool,
    },
}

/// Source of platform events
pub trait Platform {
    /// Drain every event that arrived since the last call
    fn poll_events(&mut self) -> Vec<PlatformEvent>;
}

/// Headless event source that replays events by frame number
///
/// Frame numbers count calls to [`Platform::poll_events`], starting at 0.
/// A [`PlatformEvent::Quit`] is delivered on the configured quit frame.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlatform {
    script: BTreeMap<u64, Vec<PlatformEvent>>,
    quit_after: Option<u64>,
    frame: u64,
}

impl ScriptedPlatform {
    /// Create an empty script that never quits
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: quit on poll number `frames`
    #[must_use]
    pub const fn quit_after(mut self, frames: u64) -> Self {
        self.quit_after = Some(frames);
        self
    }

    /// Builder: deliver `event` on poll number `frame`
    #[must_use]
    pub fn with_event(mut self, frame: u64, event: PlatformEvent) -> Self {
        self.push_event(frame, event);
        self
    }

    /// Builder: press `key` on `frame` and release it on `release_frame`
    #[must_use]
    pub fn with_key_held(mut self, key: KeyCode, frame: u64, release_frame: u64) -> Self {
        self.push_event(frame, PlatformEvent::Key { key, pressed: true });
        self.push_event(release_frame, PlatformEvent::Key { key, pressed: false });
        self
    }

    /// Schedule `event` on poll number `frame`
    pub fn push_event(&mut self, frame: u64, event: PlatformEvent) {
        self.script.entry(frame).or_default().push(event);
    }

    /// Number of polls so far
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}

impl Platform for ScriptedPlatform {
    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let mut events = self.script.remove(&self.frame).unwrap_or_default();
        if self.quit_after.is_some_and(|quit| self.frame >= quit) {
            events.push(PlatformEvent::Quit);
        }
        self.frame += 1;
        events
    }
}
