//! # Rendering
//!
//! Application-agnostic sprite rendering interface. Each frame the engine
//! collects every entity holding both a [`Transform`] and a [`Sprite`] into
//! a [`SpriteFrame`] and hands it, with the camera, to a [`Renderer`].
//! Draw ordering and blending belong to the renderer.

pub mod headless;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ecs::{Entity, Sprite, Transform, World};
use crate::foundation::math::{self, Mat4, Vec2};

pub use headless::{DrawCommand, HeadlessRenderer};

slotmap::new_key_type! {
    /// Handle to a texture owned by a [`Renderer`]
    pub struct TextureId;
}

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Rendering before [`Renderer::initialize`]
    #[error("Renderer is not initialized")]
    NotInitialized,

    /// A texture file could not be read or decoded
    #[error("Failed to load texture {path}: {reason}")]
    TextureLoad {
        /// File path
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// A sprite names a texture the renderer does not own
    #[error("Unknown texture {0:?}")]
    UnknownTexture(TextureId),

    /// Backend-specific failure
    #[error("Render backend error: {0}")]
    Backend(String),
}

/// Orthographic camera over a pixel viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// Viewport size in world units
    pub viewport: Vec2,
    /// Bottom-left corner of the view in world space
    pub position: Vec2,
}

impl Camera2D {
    /// Camera showing `width` x `height` units from the origin
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width, height),
            position: Vec2::zeros(),
        }
    }

    /// Combined view and projection matrix
    pub fn view_projection(&self) -> Mat4 {
        math::orthographic(self.viewport.x, self.viewport.y)
            * math::translate_scale(-self.position, Vec2::new(1.0, 1.0))
    }
}

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteInstance {
    /// Source entity
    pub entity: Entity,
    /// Entity transform
    pub transform: Transform,
    /// Entity sprite
    pub sprite: Sprite,
}

impl SpriteInstance {
    /// Model matrix mapping the unit quad centred on the origin to the
    /// sprite's world rectangle
    pub fn model_matrix(&self) -> Mat4 {
        let scale = self.transform.scale.component_mul(&self.sprite.size);
        math::translate_scale(self.transform.position, scale)
    }
}

/// Snapshot handed to the renderer once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame {
    /// Camera view-projection
    pub camera: Mat4,
    /// Every (Transform, Sprite) pair in the world, unordered
    pub sprites: Vec<SpriteInstance>,
}

impl SpriteFrame {
    /// Collect every entity holding both a transform and a sprite
    pub fn collect(world: &World, camera: &Camera2D) -> Self {
        let mut sprites = Vec::new();
        world
            .query::<(&Transform, &Sprite)>()
            .for_each(|entity, (transform, sprite)| {
                sprites.push(SpriteInstance {
                    entity,
                    transform: *transform,
                    sprite: *sprite,
                });
            });

        Self {
            camera: camera.view_projection(),
            sprites,
        }
    }
}

/// Sprite renderer interface
pub trait Renderer {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Acquire device resources
    fn initialize(&mut self) -> Result<(), RenderError>;

    /// Decode and upload a texture file
    fn load_texture(&mut self, path: &Path) -> Result<TextureId, RenderError>;

    /// Pixel dimensions of a loaded texture
    fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)>;

    /// Draw one frame
    fn render(&mut self, frame: &SpriteFrame) -> Result<(), RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    #[test]
    fn test_camera_maps_viewport_to_clip_space() {
        let camera = Camera2D::new(640.0, 368.0);
        let top_right = camera.view_projection() * Vector4::new(640.0, 368.0, 0.0, 1.0);

        assert_relative_eq!(top_right.x, 1.0);
        assert_relative_eq!(top_right.y, 1.0);
    }

    #[test]
    fn test_camera_offset_moves_view() {
        let mut camera = Camera2D::new(100.0, 100.0);
        camera.position = Vec2::new(50.0, 0.0);
        let centre = camera.view_projection() * Vector4::new(100.0, 50.0, 0.0, 1.0);

        assert_relative_eq!(centre.x, 0.0);
        assert_relative_eq!(centre.y, 0.0);
    }

    #[test]
    fn test_collect_takes_only_sprites_with_transforms() {
        let mut world = World::new();
        let texture = TextureId::default();

        let drawn = world.spawn();
        world.insert(drawn, Transform::from_position(Vec2::new(8.0, 8.0)));
        world.insert(drawn, Sprite::new(texture, Vec2::new(16.0, 16.0)));

        let no_transform = world.spawn();
        world.insert(no_transform, Sprite::new(texture, Vec2::new(16.0, 16.0)));

        let no_sprite = world.spawn();
        world.insert(no_sprite, Transform::default());

        let frame = SpriteFrame::collect(&world, &Camera2D::new(640.0, 368.0));
        assert_eq!(frame.sprites.len(), 1);
        assert_eq!(frame.sprites[0].entity, drawn);
    }

    #[test]
    fn test_model_matrix_covers_sprite_rectangle() {
        let instance = SpriteInstance {
            entity: Entity::default(),
            transform: Transform::from_position(Vec2::new(8.0, 8.0)),
            sprite: Sprite::new(TextureId::default(), Vec2::new(16.0, 16.0)),
        };
        let corner = instance.model_matrix() * Vector4::new(0.5, 0.5, 0.0, 1.0);

        assert_relative_eq!(corner.x, 16.0);
        assert_relative_eq!(corner.y, 16.0);
    }
}
