//! Collider component for the ECS system
//!
//! Describes the physics body an entity wants. The physics adapter creates
//! the body when the component is attached and destroys it when the
//! component is detached; in between the collider carries the body handle.

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use crate::physics::BodyHandle;

/// How the body moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves, infinite mass, unaffected by gravity
    Static,
    /// Integrated by the solver
    Dynamic,
}

/// Collision geometry centred on the entity position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box given by half-extents
    Rectangle {
        /// Half width and half height
        half_extents: Vec2,
    },
    /// Circle of the given radius
    Circle {
        /// Radius in world units
        radius: f32,
    },
}

/// Physics body description and registration handle
///
/// Not `Clone`: a copy would carry a handle for a body it does not own.
#[derive(Debug, PartialEq)]
pub struct Collider {
    /// Static or dynamic
    pub kind: BodyKind,

    /// Collision shape
    pub shape: ColliderShape,

    /// Linear velocity the body starts with
    pub initial_velocity: Vec2,

    /// Whether world gravity applies (dynamic bodies only)
    pub gravity: bool,

    /// Overlap-only: reports intersections, never pushes back
    pub sensor: bool,

    body: Option<BodyHandle>,
}

impl Component for Collider {}

impl Collider {
    /// Create an unregistered collider with gravity on
    pub fn new(kind: BodyKind, shape: ColliderShape) -> Self {
        Self {
            kind,
            shape,
            initial_velocity: Vec2::zeros(),
            gravity: true,
            sensor: false,
            body: None,
        }
    }

    /// Box from half-extents
    pub fn rectangle(kind: BodyKind, half_width: f32, half_height: f32) -> Self {
        Self::new(
            kind,
            ColliderShape::Rectangle {
                half_extents: Vec2::new(half_width, half_height),
            },
        )
    }

    /// Circle from radius
    pub fn circle(kind: BodyKind, radius: f32) -> Self {
        Self::new(kind, ColliderShape::Circle { radius })
    }

    /// Builder: set gravity flag
    #[must_use]
    pub const fn with_gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: make the collider overlap-only
    #[must_use]
    pub const fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    /// Builder: set initial velocity
    #[must_use]
    pub const fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.initial_velocity = velocity;
        self
    }

    /// Body handle, present only while registered with the physics adapter
    pub const fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Whether a body exists for this collider
    pub const fn is_registered(&self) -> bool {
        self.body.is_some()
    }

    pub(crate) fn set_body(&mut self, body: Option<BodyHandle>) {
        self.body = body;
    }
}
