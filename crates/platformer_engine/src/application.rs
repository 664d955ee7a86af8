//! Application trait and lifecycle management

use crate::audio::AudioError;
use crate::engine::EngineContext;
use crate::physics::PhysicsError;
use crate::render::RenderError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to create a game on top of the engine. The engine
/// calls [`initialize`](Self::initialize) once after the renderer and audio
/// device are up, [`update`](Self::update) once per frame between the
/// physics step and the input post-update, and [`shutdown`](Self::shutdown)
/// once when the loop stops.
pub trait Application {
    /// Build the initial world: load assets, spawn entities, install hooks
    fn initialize(&mut self, ctx: &mut EngineContext) -> Result<(), AppError>;

    /// Run one frame of game logic
    ///
    /// # Arguments
    /// * `ctx` - Engine subsystems
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, ctx: &mut EngineContext, delta_time: f32) -> Result<(), AppError>;

    /// Release game state before the engine stops
    fn shutdown(&mut self, _ctx: &mut EngineContext) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Audio loading or playback failed
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Texture loading failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Physics precondition violated
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
