//! # Core Engine Module
//!
//! Shared configuration types used by every engine subsystem.

pub mod config;

pub use config::{
    AudioConfig,
    EngineConfig,
    LoggingConfig,
    PhysicsConfig,
    WindowConfig,
};
pub use crate::config::{Config, ConfigError};
