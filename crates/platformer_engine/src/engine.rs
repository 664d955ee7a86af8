//! Frame orchestrator
//!
//! [`Engine`] owns every subsystem and drives the main loop:
//!
//! 1. compute the frame delta from a monotonic clock
//! 2. pump platform events (quit stops the loop, keys go to [`InputState`])
//! 3. update: physics step, [`Application::update`], input post-update
//! 4. render: hand every (Transform, Sprite) pair to the [`Renderer`]
//!
//! The timestep is variable; there is no accumulator or frame skipping.

use std::fmt;

use thiserror::Error;

use crate::application::{AppError, Application};
use crate::audio::{AudioBackend, AudioSystem};
use crate::core::EngineConfig;
use crate::ecs::World;
use crate::foundation::time::Timer;
use crate::input::InputState;
use crate::physics::PhysicsWorld;
use crate::platform::{Platform, PlatformEvent};
use crate::render::{Camera2D, Renderer, SpriteFrame};

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, nothing acquired yet
    Uninitialized,
    /// Renderer, audio and game world ready
    Initialized,
    /// Inside [`Engine::run`]
    Running,
    /// Terminal: the loop ended or initialization failed
    Stopped,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// A startup stage failed; the engine is stopped
    #[error("Engine initialization failed at {stage}: {reason}")]
    InitializationFailed {
        /// Stage that failed
        stage: &'static str,
        /// Error message
        reason: String,
    },

    /// Operation not allowed in the current state
    #[error("Engine is {actual}, expected {expected}")]
    InvalidState {
        /// Required state
        expected: EngineState,
        /// Current state
        actual: EngineState,
    },

    /// Game logic failed during a frame
    #[error("Application update failed: {0}")]
    Update(#[source] AppError),
}

/// Subsystems handed to the application
pub struct EngineContext {
    /// Entity store; holds the [`PhysicsWorld`] as a resource
    pub world: World,
    /// Keyboard state
    pub input: InputState,
    /// Audio sources and playback
    pub audio: AudioSystem,
    /// Sprite renderer
    pub renderer: Box<dyn Renderer>,
    /// Camera used for rendering
    pub camera: Camera2D,
    /// Engine configuration
    pub config: EngineConfig,
    quit_requested: bool,
}

impl EngineContext {
    /// Stop the main loop after the current frame
    pub fn request_quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.quit_requested = true;
    }

    /// Whether [`request_quit`](Self::request_quit) was called
    pub const fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

/// Main engine struct
pub struct Engine {
    context: EngineContext,
    platform: Box<dyn Platform>,
    timer: Timer,
    state: EngineState,
}

impl Engine {
    /// Create an uninitialized engine over the given backends
    ///
    /// The physics world is created here and stored in the ECS world as a
    /// resource.
    pub fn new(
        config: EngineConfig,
        renderer: Box<dyn Renderer>,
        audio_backend: Box<dyn AudioBackend>,
        platform: Box<dyn Platform>,
    ) -> Self {
        let mut world = World::new();
        world.insert_resource(PhysicsWorld::new(&config.physics));

        let [width, height] = config.window.viewport;
        let context = EngineContext {
            world,
            input: InputState::new(),
            audio: AudioSystem::new(audio_backend, config.audio.clone()),
            renderer,
            camera: Camera2D::new(width, height),
            config,
            quit_requested: false,
        };

        Self {
            context,
            platform,
            timer: Timer::new(),
            state: EngineState::Uninitialized,
        }
    }

    /// Bring up the renderer, then the audio device, then the game world
    ///
    /// Any failure stops the engine for good.
    pub fn initialize<A: Application>(&mut self, app: &mut A) -> Result<(), EngineError> {
        self.expect_state(EngineState::Uninitialized)?;
        log::info!("Initializing engine...");

        let result = self.initialize_stages(app);
        match &result {
            Ok(()) => {
                self.state = EngineState::Initialized;
                log::info!("Engine initialized");
            }
            Err(err) => {
                self.state = EngineState::Stopped;
                log::error!("{err}");
            }
        }
        result
    }

    fn initialize_stages<A: Application>(&mut self, app: &mut A) -> Result<(), EngineError> {
        self.context
            .config
            .validate()
            .map_err(|e| init_failed("configuration", e))?;
        self.context
            .renderer
            .initialize()
            .map_err(|e| init_failed("renderer", e))?;
        self.context.audio.open().map_err(|e| init_failed("audio", e))?;
        app.initialize(&mut self.context)
            .map_err(|e| init_failed("application", e))
    }

    /// Run the main loop until a quit event or request
    pub fn run<A: Application>(&mut self, app: &mut A) -> Result<(), EngineError> {
        self.expect_state(EngineState::Initialized)?;
        self.state = EngineState::Running;
        self.timer.reset();
        log::info!("Starting main loop...");

        let result = loop {
            let delta_time = self.timer.tick();

            if self.pump_events() || self.context.quit_requested {
                break Ok(());
            }

            if let Err(err) = self.frame(app, delta_time) {
                break Err(err);
            }
        };

        self.stop(app);
        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps average)",
            self.timer.frame_count(),
            self.timer.average_fps()
        );
        result
    }

    /// Run one update and render pass with an explicit delta time
    pub fn frame<A: Application>(&mut self, app: &mut A, delta_time: f32) -> Result<(), EngineError> {
        if !matches!(self.state, EngineState::Initialized | EngineState::Running) {
            return Err(EngineError::InvalidState {
                expected: EngineState::Running,
                actual: self.state,
            });
        }

        self.update(app, delta_time)?;
        self.render();
        Ok(())
    }

    fn update<A: Application>(&mut self, app: &mut A, delta_time: f32) -> Result<(), EngineError> {
        if let Some(mut physics) = self.context.world.resource_mut::<PhysicsWorld>() {
            physics.step(delta_time);
        }

        app.update(&mut self.context, delta_time)
            .map_err(EngineError::Update)?;

        self.context.input.post_update();
        Ok(())
    }

    fn render(&mut self) {
        let frame = SpriteFrame::collect(&self.context.world, &self.context.camera);
        if let Err(err) = self.context.renderer.render(&frame) {
            log::error!("Render failed: {err}");
        }
    }

    /// Feed pending events to the input state; `true` on quit
    fn pump_events(&mut self) -> bool {
        for event in self.platform.poll_events() {
            match event {
                PlatformEvent::Quit => {
                    log::info!("Quit event received");
                    return true;
                }
                PlatformEvent::Key { key, pressed } => self.context.input.handle_event(key, pressed),
            }
        }
        false
    }

    fn stop<A: Application>(&mut self, app: &mut A) {
        if self.state == EngineState::Stopped {
            return;
        }
        app.shutdown(&mut self.context);
        self.context.audio.close();
        self.state = EngineState::Stopped;
    }

    fn expect_state(&self, expected: EngineState) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Engine subsystems
    pub const fn context(&self) -> &EngineContext {
        &self.context
    }

    /// Mutable engine subsystems
    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.context
    }
}

fn init_failed(stage: &'static str, err: impl fmt::Display) -> EngineError {
    EngineError::InitializationFailed {
        stage,
        reason: err.to_string(),
    }
}
