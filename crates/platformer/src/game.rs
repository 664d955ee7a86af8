//! Platformer gameplay
//!
//! [`Game`] builds the level from a tile map and runs the per-frame rules
//! in a fixed order:
//!
//! 1. copy physics positions into transforms
//! 2. collect coins the player overlaps
//! 3. move players from keyboard input
//! 4. drain the audio trigger queue

use platformer_engine::audio::trigger::request_audio;
use platformer_engine::audio::{drain_audio_requests, AudioSourceId};
use platformer_engine::ecs::{AudioPlayer, BodyKind, Collider, Entity, Sprite, Transform, World};
use platformer_engine::foundation::math::Vec2;
use platformer_engine::input::InputState;
use platformer_engine::physics::{register_collider_hooks, BodyHandle, PhysicsError, PhysicsWorld};
use platformer_engine::{AppError, Application, EngineContext};

use crate::assets::GameAssets;
use crate::components::{Coin, Player};
use crate::config::{ControlsConfig, GameConfig, GameplayConfig};
use crate::tilemap::{Tile, TileMap};

/// Size of the background sprite
const BACKGROUND_SIZE: [f32; 2] = [640.0, 360.0];

/// Whether a contact normal is a floor the player can stand on
pub fn is_grounded(normal: Vec2, tolerance: f32) -> bool {
    normal.y > 0.0 && normal.x.abs() < tolerance
}

/// Entities spawned by [`spawn_level`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    /// Solid blocks
    pub blocks: usize,
    /// Players
    pub players: usize,
    /// Coins
    pub coins: usize,
}

/// Spawn the background and one entity per occupied tile
///
/// Collider hooks must already be registered for bodies to be created.
pub fn spawn_level(world: &mut World, map: &TileMap, assets: &GameAssets, gameplay: &GameplayConfig) -> LevelStats {
    let background_size = Vec2::from(BACKGROUND_SIZE);
    let background = world.spawn();
    world.insert(background, Transform::from_position(background_size / 2.0));
    world.insert(background, Sprite::new(assets.background, background_size).with_z_index(-1));

    let tile = gameplay.tile_size;
    let half = tile / 2.0;
    let mut stats = LevelStats::default();

    for (col, row, kind) in map.occupied() {
        let entity = world.spawn();
        world.insert(entity, Transform::from_position(map.tile_center(col, row, tile)));

        match kind {
            Tile::Block => {
                world.insert(entity, Sprite::new(assets.block, Vec2::new(tile, tile)));
                world.insert(entity, Collider::rectangle(BodyKind::Static, half, half));
                stats.blocks += 1;
            }
            Tile::Player => {
                let size = gameplay.player_sprite_size;
                world.insert(entity, Player);
                world.insert(entity, Sprite::new(assets.player, Vec2::new(size, size)));
                world.insert(
                    entity,
                    Collider::circle(BodyKind::Dynamic, gameplay.player_radius).with_gravity(false),
                );
                stats.players += 1;
            }
            Tile::Coin => {
                world.insert(entity, Coin);
                world.insert(entity, Sprite::new(assets.coin, Vec2::new(tile, tile)));
                world.insert(
                    entity,
                    Collider::circle(BodyKind::Static, gameplay.coin_radius).with_sensor(true),
                );
                stats.coins += 1;
            }
            Tile::Empty => {}
        }
    }

    log::info!(
        "Spawned level: {} blocks, {} players, {} coins",
        stats.blocks,
        stats.players,
        stats.coins
    );
    stats
}

/// Copy physics positions into transforms
pub fn sync_transforms(world: &World) {
    let Some(physics) = world.resource::<PhysicsWorld>() else {
        return;
    };

    world
        .query::<(&mut Transform, &Collider)>()
        .for_each(|entity, (transform, collider)| {
            if !collider.is_registered() {
                return;
            }
            match physics.position(collider) {
                Ok(position) => transform.position = position,
                Err(err) => log::warn!("No position for {entity:?}: {err}"),
            }
        });
}

/// Platformer game state
pub struct Game {
    config: GameConfig,
    assets: Option<GameAssets>,
    map: Option<TileMap>,
    score: u32,
}

impl Game {
    /// Game that loads assets and the level from the configured paths
    pub const fn new(config: GameConfig) -> Self {
        Self {
            config,
            assets: None,
            map: None,
            score: 0,
        }
    }

    /// Game with assets and level already loaded
    pub const fn with_level(config: GameConfig, assets: GameAssets, map: TileMap) -> Self {
        Self {
            config,
            assets: Some(assets),
            map: Some(map),
            score: 0,
        }
    }

    /// Coins collected so far
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Despawn every coin a player overlaps and request the pickup sound
    pub fn collect_coins(&mut self, world: &mut World, pickup: AudioSourceId) -> usize {
        let mut player_bodies: Vec<BodyHandle> = Vec::new();
        world
            .query::<(&Player, &Collider)>()
            .for_each(|_, (_, collider)| player_bodies.extend(collider.body()));

        let mut collected: Vec<Entity> = Vec::new();
        {
            let Some(physics) = world.resource::<PhysicsWorld>() else {
                return 0;
            };
            world
                .query::<(&Coin, &Collider)>()
                .for_each(|entity, (_, collider)| {
                    if !collider.is_registered() {
                        return;
                    }
                    match physics.contact_others(collider) {
                        Ok(others) if others.iter().any(|other| player_bodies.contains(other)) => {
                            collected.push(entity);
                        }
                        Ok(_) => {}
                        Err(err) => log::warn!("Coin {entity:?} contact query failed: {err}"),
                    }
                });
        }

        for &coin in &collected {
            world.despawn(coin);
            request_audio(world, AudioPlayer(pickup));
            self.score += 1;
            log::info!("Coin collected, score {}", self.score);
        }
        collected.len()
    }

    /// Apply keyboard input to every player, returning how many jumped
    pub fn move_players(
        &self,
        world: &mut World,
        input: &InputState,
        jump: AudioSourceId,
        delta_time: f32,
    ) -> Result<usize, PhysicsError> {
        let GameplayConfig {
            player_speed,
            jump_speed,
            fall_acceleration,
            ground_tolerance,
            ..
        } = self.config.gameplay;
        let ControlsConfig {
            left,
            right,
            jump: jump_key,
            ..
        } = self.config.controls;

        let axis = input.axis(left, right);
        let jump_pressed = input.was_just_pressed(jump_key);
        let players = world.query::<(&Player, &Collider)>().entities();

        let mut jumps = 0;
        {
            let Some(mut physics) = world.resource_mut::<PhysicsWorld>() else {
                return Ok(0);
            };

            for entity in players {
                let Some(collider) = world.get::<Collider>(entity) else {
                    continue;
                };
                if !collider.is_registered() {
                    continue;
                }

                if axis != 0.0 {
                    if let Some(mut sprite) = world.get_mut::<Sprite>(entity) {
                        sprite.flip_x = axis < 0.0;
                    }
                }

                let mut velocity = physics.velocity(&collider)?;
                velocity.x = axis * player_speed;

                let grounded = physics
                    .contact_normals(&collider)?
                    .into_iter()
                    .any(|normal| is_grounded(normal, ground_tolerance));
                if !grounded {
                    velocity.y -= fall_acceleration * delta_time;
                } else if jump_pressed {
                    velocity.y = jump_speed;
                    jumps += 1;
                }

                physics.set_velocity(&collider, velocity)?;
            }
        }

        for _ in 0..jumps {
            request_audio(world, AudioPlayer(jump));
        }
        Ok(jumps)
    }
}

impl Application for Game {
    fn initialize(&mut self, ctx: &mut EngineContext) -> Result<(), AppError> {
        register_collider_hooks(&mut ctx.world);

        let assets = match self.assets {
            Some(assets) => assets,
            None => GameAssets::load(ctx.renderer.as_mut(), &mut ctx.audio, &self.config.assets)?,
        };
        let map = match self.map.take() {
            Some(map) => map,
            None => TileMap::load(&self.config.assets.level).map_err(|e| AppError::Asset(e.to_string()))?,
        };

        let stats = spawn_level(&mut ctx.world, &map, &assets, &self.config.gameplay);
        if stats.players == 0 {
            log::warn!("Level has no player spawn");
        }

        self.assets = Some(assets);
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, delta_time: f32) -> Result<(), AppError> {
        let assets = self
            .assets
            .ok_or_else(|| AppError::GameLogic("update before initialize".to_string()))?;

        if ctx.input.was_just_pressed(self.config.controls.quit) {
            ctx.request_quit();
        }

        sync_transforms(&ctx.world);
        self.collect_coins(&mut ctx.world, assets.pickup);
        self.move_players(&mut ctx.world, &ctx.input, assets.jump, delta_time)?;
        drain_audio_requests(&mut ctx.world, &mut ctx.audio);
        Ok(())
    }

    fn shutdown(&mut self, _ctx: &mut EngineContext) {
        log::info!("Game over, final score {}", self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use platformer_engine::audio::{NullAudioBackend, PlayLog};
    use platformer_engine::input::KeyCode;
    use platformer_engine::platform::ScriptedPlatform;
    use platformer_engine::render::HeadlessRenderer;
    use platformer_engine::Engine;

    const DT: f32 = 1.0 / 60.0;

    /// 16-bit mono WAV with a handful of silent samples
    fn silent_wav() -> Vec<u8> {
        let data = [0_u8; 8];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16_u32.to_le_bytes());
        bytes.extend_from_slice(&1_u16.to_le_bytes());
        bytes.extend_from_slice(&1_u16.to_le_bytes());
        bytes.extend_from_slice(&8_000_u32.to_le_bytes());
        bytes.extend_from_slice(&16_000_u32.to_le_bytes());
        bytes.extend_from_slice(&2_u16.to_le_bytes());
        bytes.extend_from_slice(&16_u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&data);
        bytes
    }

    struct Harness {
        engine: Engine,
        game: Game,
        plays: PlayLog,
    }

    impl Harness {
        fn new(rows: &[&str]) -> Self {
            let mut renderer = HeadlessRenderer::new();
            let player = renderer.create_texture(19, 19);
            let block = renderer.create_texture(16, 16);
            let coin = renderer.create_texture(16, 16);
            let background = renderer.create_texture(640, 360);

            let backend = NullAudioBackend::new();
            let plays = backend.play_log();
            let config = GameConfig::default();
            let mut engine = Engine::new(
                config.engine.clone(),
                Box::new(renderer),
                Box::new(backend),
                Box::new(ScriptedPlatform::new()),
            );

            let audio = &mut engine.context_mut().audio;
            let jump = audio.add_wav_bytes("jump", silent_wav()).unwrap();
            let pickup = audio.add_wav_bytes("pickup", silent_wav()).unwrap();

            let assets = GameAssets {
                player,
                block,
                coin,
                background,
                jump,
                pickup,
            };
            let map = TileMap::from_rows(rows, rows[0].len()).unwrap();
            let mut game = Game::with_level(config, assets, map);
            engine.initialize(&mut game).unwrap();

            Self { engine, game, plays }
        }

        fn frames(&mut self, count: usize) {
            for _ in 0..count {
                self.engine.frame(&mut self.game, DT).unwrap();
            }
        }

        fn key(&mut self, key: KeyCode, pressed: bool) {
            self.engine.context_mut().input.handle_event(key, pressed);
        }

        fn world(&self) -> &World {
            &self.engine.context().world
        }

        fn player(&self) -> Entity {
            self.world().query::<&Player>().entities()[0]
        }

        fn player_velocity(&self) -> Vec2 {
            let world = self.world();
            let physics = world.resource::<PhysicsWorld>().unwrap();
            let collider = world.get::<Collider>(self.player()).unwrap();
            physics.velocity(&collider).unwrap()
        }

        fn player_grounded(&self) -> bool {
            let world = self.world();
            let physics = world.resource::<PhysicsWorld>().unwrap();
            let collider = world.get::<Collider>(self.player()).unwrap();
            physics
                .contact_normals(&collider)
                .unwrap()
                .into_iter()
                .any(|normal| is_grounded(normal, 0.1))
        }

        fn body_count(&self) -> usize {
            self.world().resource::<PhysicsWorld>().unwrap().body_count()
        }
    }

    #[test]
    fn test_grounded_rule() {
        assert!(is_grounded(Vec2::new(0.0, 1.0), 0.1));
        assert!(is_grounded(Vec2::new(0.05, 0.998), 0.1));
        assert!(!is_grounded(Vec2::new(1.0, 0.0), 0.1));
        assert!(!is_grounded(Vec2::new(0.0, -1.0), 0.1));
        assert!(!is_grounded(Vec2::new(0.7, 0.7), 0.1));
    }

    #[test]
    fn test_spawn_small_map() {
        let harness = Harness::new(&["###", " P ", "###"]);
        let world = harness.world();

        assert_eq!(world.count::<Player>(), 1);
        assert_eq!(world.count::<Coin>(), 0);
        assert_eq!(world.count::<Collider>(), 7);
        assert_eq!(harness.body_count(), 7);

        // Background plus the seven tiles
        assert_eq!(world.count::<Sprite>(), 8);
        let mut backgrounds = 0;
        world.query::<&Sprite>().for_each(|_, sprite| {
            if sprite.z_index == -1 {
                backgrounds += 1;
            }
        });
        assert_eq!(backgrounds, 1);

        let player = world.get::<Transform>(harness.player()).unwrap();
        assert_abs_diff_eq!(player.position, Vec2::new(24.0, 24.0));
    }

    #[test]
    fn test_airborne_player_falls() {
        let mut harness = Harness::new(&[" P ", "   ", "   ", "###"]);
        harness.frames(1);

        assert!(!harness.player_grounded());
        assert_abs_diff_eq!(harness.player_velocity().y, -1_000.0 * DT, epsilon = 1e-3);

        harness.frames(1);
        assert_abs_diff_eq!(harness.player_velocity().y, -2_000.0 * DT, epsilon = 1e-3);
    }

    #[test]
    fn test_jump_only_on_press_edge() {
        let mut harness = Harness::new(&[" P ", "###"]);
        harness.frames(30);
        assert!(harness.player_grounded());
        assert_abs_diff_eq!(harness.player_velocity().y, 0.0, epsilon = 0.5);
        assert!(harness.plays.is_empty());

        harness.key(KeyCode::Space, true);
        harness.frames(1);
        assert_eq!(harness.plays.names(), vec!["jump".to_string()]);
        assert_abs_diff_eq!(harness.player_velocity().y, 400.0, epsilon = 1e-3);

        // Held: no new jump request
        harness.frames(1);
        assert_eq!(harness.plays.len(), 1);
        assert_eq!(harness.world().count::<AudioPlayer>(), 0);
    }

    #[test]
    fn test_jump_request_spawned_before_drain() {
        let mut harness = Harness::new(&[" P ", "###"]);
        harness.frames(30);

        let jump = harness.game.assets.unwrap().jump;
        let mut input = InputState::new();
        input.handle_event(KeyCode::Space, true);

        let world = &mut harness.engine.context_mut().world;
        let jumps = harness.game.move_players(world, &input, jump, DT).unwrap();

        assert_eq!(jumps, 1);
        assert_eq!(world.count::<AudioPlayer>(), 1);
    }

    #[test]
    fn test_coin_collected_exactly_once() {
        let mut harness = Harness::new(&["PC ", "###"]);
        assert_eq!(harness.body_count(), 5);

        harness.key(KeyCode::D, true);
        harness.frames(10);

        assert_eq!(harness.game.score(), 1);
        assert_eq!(harness.world().count::<Coin>(), 0);
        assert_eq!(harness.body_count(), 4);
        assert_eq!(harness.plays.names(), vec!["pickup".to_string()]);
        assert_eq!(harness.world().count::<AudioPlayer>(), 0);

        harness.frames(10);
        assert_eq!(harness.game.score(), 1);
        assert_eq!(harness.plays.len(), 1);
    }

    #[test]
    fn test_flip_follows_last_direction() {
        let mut harness = Harness::new(&["   P   ", "#######"]);
        let flipped = |harness: &Harness| harness.world().get::<Sprite>(harness.player()).unwrap().flip_x;

        harness.key(KeyCode::A, true);
        harness.frames(1);
        assert!(flipped(&harness));
        assert_abs_diff_eq!(harness.player_velocity().x, -400.0, epsilon = 1e-3);

        harness.key(KeyCode::A, false);
        harness.frames(1);
        assert!(flipped(&harness));
        assert_abs_diff_eq!(harness.player_velocity().x, 0.0, epsilon = 1e-3);

        harness.key(KeyCode::D, true);
        harness.frames(1);
        assert!(!flipped(&harness));
    }

    #[test]
    fn test_transforms_follow_physics() {
        let mut harness = Harness::new(&[" P ", "   ", "   ", "###"]);
        let start = harness.world().get::<Transform>(harness.player()).unwrap().position;

        harness.frames(10);

        let now = harness.world().get::<Transform>(harness.player()).unwrap().position;
        assert!(now.y < start.y);
        assert_abs_diff_eq!(now.x, start.x, epsilon = 1e-3);
    }

    #[test]
    fn test_quit_key_requests_stop() {
        let mut harness = Harness::new(&[" P ", "###"]);
        harness.key(KeyCode::Escape, true);
        harness.frames(1);

        assert!(harness.engine.context().quit_requested());
    }
}
