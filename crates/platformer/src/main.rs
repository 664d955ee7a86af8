//! Platformer entry point

use std::process::ExitCode;

use platformer::{Game, GameConfig, GameError, CONFIG_PATH};
use platformer_engine::audio::backend::create_backend;
use platformer_engine::config::Config;
use platformer_engine::foundation::logging;
use platformer_engine::platform::Platform;
use platformer_engine::render::HeadlessRenderer;
use platformer_engine::Engine;

fn create_platform(config: &GameConfig) -> Result<Box<dyn Platform>, GameError> {
    #[cfg(feature = "glfw")]
    {
        let platform = platformer_engine::platform::GlfwPlatform::new(&config.engine.window)?;
        Ok(Box::new(platform))
    }
    #[cfg(not(feature = "glfw"))]
    {
        log::info!("No window backend, running {} frames", config.headless_frames);
        Ok(Box::new(
            platformer_engine::platform::ScriptedPlatform::new().quit_after(config.headless_frames),
        ))
    }
}

fn run() -> Result<(), GameError> {
    let config = GameConfig::load_or_default(CONFIG_PATH)?;
    logging::init(&config.engine.logging)?;
    log::info!("Starting platformer");

    let platform = create_platform(&config)?;
    let mut engine = Engine::new(
        config.engine.clone(),
        Box::new(HeadlessRenderer::new()),
        create_backend(),
        platform,
    );

    let mut game = Game::new(config);
    engine.initialize(&mut game)?;
    engine.run(&mut game)?;

    log::info!("Platformer exited after scoring {}", game.score());
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("platformer: {err}");
            ExitCode::FAILURE
        }
    }
}
