//! # Platformer
//!
//! A single-screen tile platformer: walk, jump and collect coins. The level
//! is a text grid, the player is a dynamic circle and coins are sensors.

pub mod assets;
pub mod components;
pub mod config;
pub mod game;
pub mod tilemap;

pub use config::{GameConfig, CONFIG_PATH};
pub use game::Game;

use thiserror::Error;

/// Top-level errors surfaced by the game binary
#[derive(Error, Debug)]
pub enum GameError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] platformer_engine::config::ConfigError),

    /// Engine failed to initialize or run
    #[error("Engine error: {0}")]
    Engine(#[from] platformer_engine::EngineError),

    /// Logger could not be installed
    #[error("Logging error: {0}")]
    Logging(#[from] platformer_engine::foundation::logging::LoggingError),

    /// Window or event source failure
    #[error("Platform error: {0}")]
    Platform(#[from] platformer_engine::platform::PlatformError),
}
