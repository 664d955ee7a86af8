//! Game asset loading
//!
//! Textures and sounds are loaded once during initialization and referenced
//! by handle for the rest of the run.

use std::path::Path;

use platformer_engine::audio::{AudioSourceId, AudioSystem};
use platformer_engine::render::{Renderer, TextureId};
use platformer_engine::AppError;

use crate::config::AssetsConfig;

/// Handles to every loaded asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameAssets {
    /// Player texture
    pub player: TextureId,
    /// Block texture
    pub block: TextureId,
    /// Coin texture
    pub coin: TextureId,
    /// Background texture
    pub background: TextureId,
    /// Jump sound
    pub jump: AudioSourceId,
    /// Coin pickup sound
    pub pickup: AudioSourceId,
}

impl GameAssets {
    /// Load every texture through `renderer` and every sound into `audio`
    pub fn load(renderer: &mut dyn Renderer, audio: &mut AudioSystem, config: &AssetsConfig) -> Result<Self, AppError> {
        let mut texture = |path: &str| renderer.load_texture(Path::new(path));
        let player = texture(&config.player_texture)?;
        let block = texture(&config.block_texture)?;
        let coin = texture(&config.coin_texture)?;
        let background = texture(&config.background_texture)?;

        let jump = audio.load_wav(&config.jump_sound)?;
        let pickup = audio.load_wav(&config.pickup_sound)?;

        log::info!("Loaded game assets");
        Ok(Self {
            player,
            block,
            coin,
            background,
            jump,
            pickup,
        })
    }
}
