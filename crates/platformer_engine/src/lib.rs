//! # Platformer Engine
//!
//! Runtime core for 2D tile platformers: an entity-component store with
//! lifecycle hooks, a `rapier2d` physics adapter, keyboard edge detection,
//! a one-shot audio trigger queue and a frame orchestrator that ties them
//! together in a fixed per-frame order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platformer_engine::prelude::*;
//!
//! struct MyGame;
//!
//! impl Application for MyGame {
//!     fn initialize(&mut self, ctx: &mut EngineContext) -> Result<(), AppError> {
//!         register_collider_hooks(&mut ctx.world);
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, ctx: &mut EngineContext, _delta_time: f32) -> Result<(), AppError> {
//!         drain_audio_requests(&mut ctx.world, &mut ctx.audio);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(
//!         EngineConfig::default(),
//!         Box::new(HeadlessRenderer::new()),
//!         Box::new(NullAudioBackend::new()),
//!         Box::new(ScriptedPlatform::new().quit_after(60)),
//!     );
//!     let mut game = MyGame;
//!     engine.initialize(&mut game)?;
//!     engine.run(&mut game)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod ecs;
pub mod physics;
pub mod input;
pub mod audio;
pub mod render;
pub mod platform;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineContext, EngineError, EngineState};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, Application,
        Engine, EngineContext, EngineError, EngineState,
        audio::{drain_audio_requests, AudioSourceId, AudioSystem, NullAudioBackend},
        core::{Config, EngineConfig},
        ecs::{AudioPlayer, BodyKind, Collider, ColliderShape, Component, Entity, Sprite, Transform, World},
        foundation::{
            math::{Mat4, Vec2},
            time::Timer,
        },
        input::{InputState, KeyCode},
        physics::{register_collider_hooks, BodyHandle, PhysicsError, PhysicsWorld},
        platform::{Platform, PlatformEvent, ScriptedPlatform},
        render::{Camera2D, HeadlessRenderer, Renderer, TextureId},
    };
}
