//! Game configuration
//!
//! Loaded from `config/platformer.toml` when present. Every section has
//! defaults, so the file only needs the values it changes.

use platformer_engine::config::{Config, Deserialize, Serialize};
use platformer_engine::core::EngineConfig;
use platformer_engine::input::KeyCode;

/// Default location of the game configuration file
pub const CONFIG_PATH: &str = "config/platformer.toml";

/// Root game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frames to run before quitting when no window backend is built in
    pub headless_frames: u64,

    /// Engine subsystems
    pub engine: EngineConfig,

    /// Gameplay tuning
    pub gameplay: GameplayConfig,

    /// Asset file locations
    pub assets: AssetsConfig,

    /// Key bindings
    pub controls: ControlsConfig,
}

impl Config for GameConfig {}

impl Default for GameConfig {
    fn default() -> Self {
        let mut engine = EngineConfig::default();
        engine.logging.file = Some("platformer-log.txt".to_string());

        Self {
            headless_frames: 600,
            engine,
            gameplay: GameplayConfig::default(),
            assets: AssetsConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Horizontal player speed (units/s)
    pub player_speed: f32,

    /// Vertical speed given by a jump (units/s)
    pub jump_speed: f32,

    /// Downward acceleration while airborne (units/s²)
    pub fall_acceleration: f32,

    /// Largest |x| of a contact normal that still counts as floor
    pub ground_tolerance: f32,

    /// Tile edge length in world units
    pub tile_size: f32,

    /// Player collision radius
    pub player_radius: f32,

    /// Player sprite edge length
    pub player_sprite_size: f32,

    /// Coin overlap radius
    pub coin_radius: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            player_speed: 400.0,
            jump_speed: 400.0,
            fall_acceleration: 1_000.0,
            ground_tolerance: 0.1,
            tile_size: 16.0,
            player_radius: 7.5,
            player_sprite_size: 19.0,
            coin_radius: 6.0,
        }
    }
}

/// Asset paths, relative to the working directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Tile map
    pub level: String,
    /// Player texture
    pub player_texture: String,
    /// Solid block texture
    pub block_texture: String,
    /// Coin texture
    pub coin_texture: String,
    /// Background texture
    pub background_texture: String,
    /// Sound played on jump
    pub jump_sound: String,
    /// Sound played on coin pickup
    pub pickup_sound: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            level: "assets/level1.txt".to_string(),
            player_texture: "assets/knight.png".to_string(),
            block_texture: "assets/block.png".to_string(),
            coin_texture: "assets/coin.png".to_string(),
            background_texture: "assets/background.png".to_string(),
            jump_sound: "assets/jump.wav".to_string(),
            pickup_sound: "assets/pickup_coin.wav".to_string(),
        }
    }
}

/// Key bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Move left
    pub left: KeyCode,
    /// Move right
    pub right: KeyCode,
    /// Jump
    pub jump: KeyCode,
    /// Quit the game
    pub quit: KeyCode,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            left: KeyCode::A,
            right: KeyCode::D,
            jump: KeyCode::Space,
            quit: KeyCode::Escape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_gameplay_constants() {
        let config = GameConfig::default();
        assert_eq!(config.gameplay.player_speed, 400.0);
        assert_eq!(config.gameplay.jump_speed, 400.0);
        assert_eq!(config.gameplay.fall_acceleration, 1_000.0);
        assert_eq!(config.gameplay.tile_size, 16.0);
        assert_eq!(config.engine.logging.file.as_deref(), Some("platformer-log.txt"));
    }

    #[test]
    fn test_partial_file_overrides_controls() {
        let config = GameConfig::from_toml_str(
            r#"
            [controls]
            left = "Left"
            right = "Right"

            [gameplay]
            jump_speed = 300.0
            "#,
        )
        .unwrap();

        assert_eq!(config.controls.left, KeyCode::Left);
        assert_eq!(config.controls.jump, KeyCode::Space);
        assert_eq!(config.gameplay.jump_speed, 300.0);
        assert_eq!(config.gameplay.player_speed, 400.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = GameConfig::default();
        config.assets.level = "assets/level2.txt".to_string();
        config.engine.physics.solver_iterations = 8;

        let text = config.to_toml_string().unwrap();
        assert_eq!(GameConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_shipped_config_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/platformer.toml");
        let config = GameConfig::load_from_file(path).unwrap();
        assert!(config.engine.validate().is_ok());
    }
}
