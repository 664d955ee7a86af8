//! Transform component for the ECS system
//!
//! Pure data: position and scale in world units, Y up.

use crate::ecs::Component;
use crate::foundation::math::{self, Mat4, Vec2};

/// ECS Transform component
///
/// Written by gameplay from the physics state each frame; renderers only
/// read it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World space position
    pub position: Vec2,

    /// Scale factors
    pub scale: Vec2,
}

impl Component for Transform {}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from position and scale
    pub const fn from_position_scale(position: Vec2, scale: Vec2) -> Self {
        Self { position, scale }
    }

    /// Builder: set scale
    #[must_use]
    pub const fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Model matrix: translate, then scale
    pub fn to_matrix(&self) -> Mat4 {
        math::translate_scale(self.position, self.scale)
    }
}
