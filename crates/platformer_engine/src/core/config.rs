//! # Engine Configuration
//!
//! Serializable settings for each engine subsystem. Every struct carries
//! defaults so a partial file only needs to name what it changes.
//!
//! ```toml
//! [window]
//! title = "Platformer"
//!
//! [physics]
//! gravity = [0.0, -10.0]
//! solver_iterations = 4
//!
//! [logging]
//! level = "debug"
//! file = "platformer-log.txt"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// # Engine Configuration
///
/// Root of all engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Physics world settings
    pub physics: PhysicsConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Audio settings
    pub audio: AudioConfig,
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err("Window dimensions must be non-zero".to_string());
        }
        if self.window.viewport.iter().any(|extent| *extent <= 0.0) {
            return Err("Camera viewport must be positive".to_string());
        }
        self.physics.validate()
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// World units visible through the camera
    pub viewport: [f32; 2],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Platformer".to_string(),
            width: 1280,
            height: 736,
            viewport: [640.0, 368.0],
        }
    }
}

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World gravity applied to bodies with the gravity flag
    pub gravity: [f32; 2],
    /// Solver iterations per step
    pub solver_iterations: usize,
    /// Density shared by every collider shape
    pub density: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -10.0],
            solver_iterations: 4,
            density: 1_000.0,
        }
    }
}

impl PhysicsConfig {
    /// Validate the physics settings
    pub fn validate(&self) -> Result<(), String> {
        if self.solver_iterations == 0 {
            return Err("Physics solver iterations must be at least 1".to_string());
        }
        if self.density <= 0.0 {
            return Err("Collider density must be positive".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter (`RUST_LOG` takes precedence)
    pub level: String,
    /// Optional file that receives a copy of every log line
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Audio configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Playback volume for one-shot effects (0.0 - 1.0)
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [physics]
            solver_iterations = 8

            [logging]
            level = "trace"
            "#,
        )
        .unwrap();

        assert_eq!(config.physics.solver_iterations, 8);
        assert_eq!(config.physics.gravity, [0.0, -10.0]);
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = EngineConfig::default();
        config.logging.file = Some("platformer-log.txt".to_string());

        let text = config.to_toml_string().unwrap();
        let parsed = EngineConfig::from_toml_str(&text).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_zero_solver_iterations_rejected() {
        let mut config = EngineConfig::default();
        config.physics.solver_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::load_from_file("Cargo.lock");
        assert!(result.is_err());
    }
}
