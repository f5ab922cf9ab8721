//! Rigid bodies: dynamics state, motion integration, collision queries.

use glam::Vec3;

use crate::error::PhysicsError;
use crate::scene::Transform;

use super::collider::{Aabb, Collider};
use super::contact::Contact;
use super::PhysicsConfig;

slotmap::new_key_type! {
    /// Stable generational handle into the engine's body table.
    pub struct BodyKey;
}

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidBodyType {
    /// Affected by forces and collisions.
    Dynamic,
    /// Immovable; infinite mass for resolution purposes.
    Static,
}

/// The dynamics state of one scene entity.
///
/// Bodies are non-rotating point-mass volumes: the node may carry a visual
/// rotation, but physics only moves its position. The `node` field is a
/// weak back-reference; a despawned node turns every operation into a
/// silent no-op until the engine prunes the body.
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Owning scene node.
    pub node: hecs::Entity,
    pub body_type: RigidBodyType,
    pub velocity: Vec3,
    mass: f32,
    /// Ground friction coefficient, nominally in [0, 1].
    pub friction: f32,
    /// Coefficient of restitution, nominally in [0, 1].
    pub restitution: f32,
    /// Gravity is opt-in; scenery props and the menu camera rig skip it.
    pub use_gravity: bool,
    /// Set by a qualifying contact each tick, cleared before the pass.
    pub on_ground: bool,
}

impl RigidBody {
    /// Create a dynamic body attached to `node`.
    ///
    /// Mass must be finite and strictly positive; anything else would turn
    /// into a division by zero during impulse resolution.
    pub fn new_dynamic(node: hecs::Entity, mass: f32) -> Result<Self, PhysicsError> {
        Self::validate_mass(mass)?;
        Ok(Self {
            node,
            body_type: RigidBodyType::Dynamic,
            velocity: Vec3::ZERO,
            mass,
            friction: 0.1,
            restitution: 0.0,
            use_gravity: false,
            on_ground: false,
        })
    }

    /// Create a static body (ground, walls) attached to `node`.
    pub fn new_static(node: hecs::Entity) -> Self {
        Self {
            node,
            body_type: RigidBodyType::Static,
            velocity: Vec3::ZERO,
            mass: 0.0,
            friction: 0.1,
            restitution: 0.0,
            use_gravity: false,
            on_ground: false,
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Assign a new mass, rejecting degenerate values.
    pub fn set_mass(&mut self, mass: f32) -> Result<(), PhysicsError> {
        Self::validate_mass(mass)?;
        self.mass = mass;
        Ok(())
    }

    fn validate_mass(mass: f32) -> Result<(), PhysicsError> {
        if mass.is_finite() && mass > 0.0 {
            Ok(())
        } else {
            Err(PhysicsError::InvalidParameter(format!(
                "mass must be finite and positive, got {mass}"
            )))
        }
    }

    /// Inverse mass; zero for static bodies, which therefore never move
    /// during resolution.
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        match self.body_type {
            RigidBodyType::Dynamic => 1.0 / self.mass,
            RigidBodyType::Static => 0.0,
        }
    }

    /// Advance this body by one semi-implicit Euler step.
    ///
    /// Velocity updates from forces first (gravity, air drag, ground
    /// friction), then the owning node's position integrates the updated
    /// velocity. A dead node reference skips the position write.
    pub fn integrate(&mut self, world: &mut hecs::World, config: &PhysicsConfig, dt: f32) {
        if self.body_type != RigidBodyType::Dynamic {
            return;
        }

        if self.use_gravity && !self.on_ground {
            self.velocity += config.gravity * dt;
        }

        // Linear air drag, active both airborne and grounded.
        self.velocity *= (1.0 - config.air_damping * dt).max(0.0);

        if self.on_ground {
            self.apply_ground_friction(config, dt);
        }

        if let Ok(mut transform) = world.get::<&mut Transform>(self.node) {
            transform.position += self.velocity * dt;
        }
    }

    /// Decelerate horizontal velocity toward zero against stationary ground.
    pub fn apply_ground_friction(&mut self, config: &PhysicsConfig, dt: f32) {
        self.apply_ground_friction_against(Vec3::ZERO, config, dt);
    }

    /// Ground friction relative to a moving contact surface.
    ///
    /// Platforms pass their own velocity so the body is dragged along with
    /// them instead of braked against the world. The deceleration rate is
    /// `friction * |gravity|`, clamped so one step never reverses the
    /// relative direction.
    pub fn apply_ground_friction_against(
        &mut self,
        surface_velocity: Vec3,
        config: &PhysicsConfig,
        dt: f32,
    ) {
        let relative = self.velocity - surface_velocity;
        let horizontal = Vec3::new(relative.x, 0.0, relative.z);
        let speed = horizontal.length();
        if speed <= 0.0 {
            return;
        }

        let drop = self.friction * config.gravity.length() * dt;
        let scale = (speed - drop).max(0.0) / speed;
        let braked = horizontal * scale;

        self.velocity.x = braked.x + surface_velocity.x;
        self.velocity.z = braked.z + surface_velocity.z;
    }

    /// Test this body's bounds against another body's.
    ///
    /// Returns the contact with the normal pointing from `other` toward
    /// `self`, or `None` when the boxes are disjoint, either node is dead,
    /// or a node carries no collider.
    pub fn check_collision(&self, other: &RigidBody, world: &hecs::World) -> Option<Contact> {
        let bounds = world_bounds(world, self.node)?;
        let other_bounds = world_bounds(world, other.node)?;
        bounds.contact(&other_bounds)
    }
}

/// World-space bounds of a node, if it is alive and carries a collider.
pub(crate) fn world_bounds(world: &hecs::World, node: hecs::Entity) -> Option<Aabb> {
    let transform = world.get::<&Transform>(node).ok()?;
    let collider = world.get::<&Collider>(node).ok()?;
    Some(collider.world_aabb(&transform.to_matrix()))
}
