//! Physics adapter over `rapier2d`
//!
//! [`PhysicsWorld`] owns one rapier simulation and maps every registered
//! [`Collider`] to a rigid body. It lives in the ECS world as a resource so
//! that the collider lifecycle hooks installed by
//! [`register_collider_hooks`] can create and destroy bodies as colliders
//! are attached and detached, whichever code path removes them.

use std::num::NonZeroUsize;

use rapier2d::prelude::*;
use thiserror::Error;

use crate::core::PhysicsConfig;
use crate::ecs::{BodyKind, Collider, ColliderShape, Entity, Transform, World};
use crate::foundation::math::Vec2;

/// Handle to a rigid body owned by the [`PhysicsWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Physics adapter errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// The collider has no body
    #[error("Collider is not registered with the physics world")]
    Unregistered,

    /// The collider already has a body
    #[error("Collider is already registered with the physics world")]
    AlreadyRegistered,

    /// The collider's handle does not name a live body
    #[error("Body {0:?} does not exist in the physics world")]
    MissingBody(BodyHandle),
}

/// Rapier simulation state
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    density: Real,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Create an empty world from configuration
    pub fn new(config: &PhysicsConfig) -> Self {
        let mut integration_params = IntegrationParameters::default();
        if let Some(iterations) = NonZeroUsize::new(config.solver_iterations) {
            integration_params.num_solver_iterations = iterations;
        } else {
            log::warn!("solver_iterations = 0, keeping rapier default");
        }

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![config.gravity[0], config.gravity[1]],
            density: config.density,
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Create a body for `collider` at the transform position and store its
    /// handle in the collider
    pub fn add(&mut self, transform: &Transform, collider: &mut Collider) -> Result<BodyHandle, PhysicsError> {
        if collider.is_registered() {
            return Err(PhysicsError::AlreadyRegistered);
        }

        let translation = vector![transform.position.x, transform.position.y];
        let body = match collider.kind {
            BodyKind::Static => RigidBodyBuilder::fixed().translation(translation).gravity_scale(0.0),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic()
                .translation(translation)
                .linvel(vector![collider.initial_velocity.x, collider.initial_velocity.y])
                .gravity_scale(if collider.gravity { 1.0 } else { 0.0 }),
        }
        .build();
        let body_handle = self.rigid_body_set.insert(body);

        let shape = match collider.shape {
            ColliderShape::Rectangle { half_extents } => SharedShape::cuboid(half_extents.x, half_extents.y),
            ColliderShape::Circle { radius } => SharedShape::ball(radius),
        };
        let rapier_collider = ColliderBuilder::new(shape)
            .density(self.density)
            .sensor(collider.sensor)
            .build();
        self.collider_set
            .insert_with_parent(rapier_collider, body_handle, &mut self.rigid_body_set);

        let handle = BodyHandle(body_handle);
        collider.set_body(Some(handle));
        log::trace!("added {:?} body {handle:?}", collider.kind);
        Ok(handle)
    }

    /// Destroy the body of `collider` and clear its handle
    pub fn remove(&mut self, collider: &mut Collider) -> Result<(), PhysicsError> {
        let handle = collider.body().ok_or(PhysicsError::Unregistered)?;
        collider.set_body(None);

        self.rigid_body_set
            .remove(
                handle.0,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .ok_or(PhysicsError::MissingBody(handle))?;

        log::trace!("removed body {handle:?}");
        Ok(())
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_params.dt = dt;

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Current body position
    pub fn position(&self, collider: &Collider) -> Result<Vec2, PhysicsError> {
        Ok(*self.body(collider)?.translation())
    }

    /// Current linear velocity
    pub fn velocity(&self, collider: &Collider) -> Result<Vec2, PhysicsError> {
        Ok(*self.body(collider)?.linvel())
    }

    /// Overwrite the linear velocity, waking the body
    pub fn set_velocity(&mut self, collider: &Collider, velocity: Vec2) -> Result<(), PhysicsError> {
        let handle = collider.body().ok_or(PhysicsError::Unregistered)?;
        let body = self
            .rigid_body_set
            .get_mut(handle.0)
            .ok_or(PhysicsError::MissingBody(handle))?;
        body.set_linvel(velocity, true);
        Ok(())
    }

    /// Normal of one active contact, pointing from the other body towards
    /// this one
    pub fn contact_normal(&self, collider: &Collider) -> Result<Option<Vec2>, PhysicsError> {
        Ok(self.contact_normals(collider)?.into_iter().next())
    }

    /// Normals of every active contact, each pointing from the other body
    /// towards this one
    ///
    /// Overlap-only intersections have no normal and are not reported.
    pub fn contact_normals(&self, collider: &Collider) -> Result<Vec<Vec2>, PhysicsError> {
        let body = self.body(collider)?;
        let mut normals = Vec::new();

        for &own in body.colliders() {
            for pair in self.narrow_phase.contact_pairs_with(own) {
                if !pair.has_any_active_contact {
                    continue;
                }
                for manifold in pair.manifolds.iter().filter(|m| !m.points.is_empty()) {
                    let normal = manifold.data.normal;
                    // Manifold normals point away from collider1
                    normals.push(if pair.collider1 == own { -normal } else { normal });
                }
            }
        }
        Ok(normals)
    }

    /// Bodies currently touching or overlapping this one
    pub fn contact_others(&self, collider: &Collider) -> Result<Vec<BodyHandle>, PhysicsError> {
        let body = self.body(collider)?;
        let mut others = Vec::new();

        for &own in body.colliders() {
            let touching = self
                .narrow_phase
                .contact_pairs_with(own)
                .filter(|pair| pair.has_any_active_contact)
                .map(|pair| other_collider(own, pair.collider1, pair.collider2));
            let overlapping = self
                .narrow_phase
                .intersection_pairs_with(own)
                .filter(|(_, _, intersecting)| *intersecting)
                .map(|(collider1, collider2, _)| other_collider(own, collider1, collider2));

            for other in touching.chain(overlapping) {
                if let Some(parent) = self.collider_set.get(other).and_then(rapier2d::geometry::Collider::parent) {
                    let handle = BodyHandle(parent);
                    if !others.contains(&handle) {
                        others.push(handle);
                    }
                }
            }
        }
        Ok(others)
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    fn body(&self, collider: &Collider) -> Result<&RigidBody, PhysicsError> {
        let handle = collider.body().ok_or(PhysicsError::Unregistered)?;
        self.rigid_body_set
            .get(handle.0)
            .ok_or(PhysicsError::MissingBody(handle))
    }
}

fn other_collider(own: ColliderHandle, collider1: ColliderHandle, collider2: ColliderHandle) -> ColliderHandle {
    if collider1 == own {
        collider2
    } else {
        collider1
    }
}

/// Install the hooks that keep bodies in step with [`Collider`] lifetimes
///
/// The world must hold a [`PhysicsWorld`] resource when colliders are
/// attached; otherwise the hook logs and leaves the collider unregistered.
pub fn register_collider_hooks(world: &mut World) {
    world.on_attach::<Collider>(attach_collider);
    world.on_detach::<Collider>(detach_collider);
}

fn attach_collider(world: &World, entity: Entity) {
    let Some(mut physics) = world.resource_mut::<PhysicsWorld>() else {
        log::error!("collider attached to {entity:?} without a physics world");
        return;
    };
    let transform = world.get::<Transform>(entity).map(|t| *t).unwrap_or_default();
    let Some(mut collider) = world.get_mut::<Collider>(entity) else {
        return;
    };

    if let Err(err) = physics.add(&transform, &mut collider) {
        log::error!("failed to add body for {entity:?}: {err}");
    }
}

fn detach_collider(world: &World, entity: Entity) {
    let Some(mut physics) = world.resource_mut::<PhysicsWorld>() else {
        return;
    };
    let Some(mut collider) = world.get_mut::<Collider>(entity) else {
        return;
    };

    if let Err(err) = physics.remove(&mut collider) {
        log::error!("failed to remove body for {entity:?}: {err}");
    }
}
