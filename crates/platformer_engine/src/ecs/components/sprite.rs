//! Sprite component

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use crate::render::TextureId;

/// Textured quad drawn at the entity's transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// Texture handle from the renderer
    pub texture: TextureId,

    /// Size in world units (pixels under the default camera)
    pub size: Vec2,

    /// Draw order; lower values are drawn first
    pub z_index: i32,

    /// Mirror horizontally
    pub flip_x: bool,

    /// Mirror vertically
    pub flip_y: bool,
}

impl Component for Sprite {}

impl Sprite {
    /// Create an unflipped sprite at z-index 0
    pub fn new(texture: TextureId, size: Vec2) -> Self {
        Self {
            texture,
            size,
            z_index: 0,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Builder: set z-index
    #[must_use]
    pub const fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}
