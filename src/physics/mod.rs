//! CPU rigid body simulation over scene nodes.
//!
//! # Architecture
//!
//! One tick of [`PhysicsEngine::update`]:
//!
//! 1. Prune bodies whose scene node has been despawned
//! 2. Integrate entity bodies (semi-implicit Euler)
//! 3. Advance the player through the fixed timestep accumulator
//! 4. Clear ground contact flags
//! 5. All-pairs AABB collision detection
//! 6. Resolve each contact in place (position correction + impulse)
//! 7. Synchronize world transforms for the renderer

pub mod body;
pub mod collider;
pub mod contact;
pub mod solver;

use glam::Vec3;
use slotmap::SlotMap;

use crate::scene::{sync_global_transforms, Transform};

use self::body::{BodyKey, RigidBody};
use self::solver::solve_collision;

/// Configuration for the physics simulation.
///
/// One value is passed to [`PhysicsEngine::new`] and never mutated
/// afterwards; there are no process-wide tunables.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81, 0).
    pub gravity: Vec3,
    /// Linear air drag per second, applied to every dynamic body.
    /// Default: 0.05.
    pub air_damping: f32,
    /// Minimum vertical normal component for a contact to count as ground.
    /// Default: 0.7.
    pub ground_normal_threshold: f32,
    /// Fixed timestep for the player accumulator in seconds. Default: 1/120.
    pub player_timestep: f64,
    /// Maximum player sub-steps per frame. Default: 8.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            air_damping: 0.05,
            ground_normal_threshold: 0.7,
            player_timestep: 1.0 / 120.0,
            max_substeps: 8,
        }
    }
}

/// Process-wide owner of every active rigid body.
///
/// Bodies live in a generational table; the [`BodyKey`] handed out at
/// registration stays valid until the body is removed or its node dies.
/// Registration is only safe between ticks: the simulation is single
/// threaded and cooperative with the render loop, and `update` assumes the
/// table does not change underneath it.
pub struct PhysicsEngine {
    config: PhysicsConfig,
    bodies: SlotMap<BodyKey, RigidBody>,
    player: Option<BodyKey>,
    accumulator: f64,
}

impl PhysicsEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            bodies: SlotMap::with_key(),
            player: None,
            accumulator: 0.0,
        }
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Register an entity body for simulation.
    pub fn add_entity(&mut self, body: RigidBody) -> BodyKey {
        tracing::debug!(node = ?body.node, "registering entity body");
        self.bodies.insert(body)
    }

    /// Register the player's body.
    ///
    /// The player integrates on the fixed timestep accumulator but takes
    /// part in the pairwise collision pass like any other body.
    pub fn add_player(&mut self, body: RigidBody) -> BodyKey {
        tracing::debug!(node = ?body.node, "registering player body");
        let key = self.bodies.insert(body);
        self.player = Some(key);
        key
    }

    /// Remove a body, returning it if the key was live.
    pub fn remove_entity(&mut self, key: BodyKey) -> Option<RigidBody> {
        if self.player == Some(key) {
            self.player = None;
        }
        self.bodies.remove(key)
    }

    pub fn body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys.
    pub fn keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// The player body key, if a player has been registered.
    pub fn player_key(&self) -> Option<BodyKey> {
        self.player
    }

    pub fn player(&self) -> Option<&RigidBody> {
        self.player.and_then(|key| self.bodies.get(key))
    }

    pub fn player_mut(&mut self) -> Option<&mut RigidBody> {
        self.player.and_then(|key| self.bodies.get_mut(key))
    }

    /// The player's current world position, for camera follow.
    pub fn player_position(&self, world: &hecs::World) -> Option<Vec3> {
        let body = self.player()?;
        let transform = world.get::<&Transform>(body.node).ok()?;
        Some(transform.position)
    }

    /// Launch the player upward if currently grounded.
    ///
    /// Returns whether the jump happened; airborne players are unaffected.
    pub fn player_jump(&mut self, impulse: f32) -> bool {
        let Some(body) = self.player.and_then(|key| self.bodies.get_mut(key)) else {
            return false;
        };
        if !body.on_ground {
            return false;
        }
        body.velocity.y = impulse;
        body.on_ground = false;
        true
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Called once per rendered frame. `dt <= 0` leaves every body and
    /// node untouched, including overlapping pairs.
    pub fn update(&mut self, world: &mut hecs::World, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        self.prune_dead_bodies(world);

        // Entity bodies integrate on the frame timestep.
        let player = self.player;
        for (key, body) in self.bodies.iter_mut() {
            if Some(key) != player {
                body.integrate(world, &self.config, dt);
            }
        }

        self.advance_player(world, dt);

        // A body stays grounded only while a qualifying contact renews the
        // flag each tick.
        for body in self.bodies.values_mut() {
            body.on_ground = false;
        }

        // All pairs, resolved immediately in key order. Resolution of one
        // pair feeds into the checks of later pairs.
        let keys: Vec<BodyKey> = self.bodies.keys().collect();
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let contact = match (self.bodies.get(keys[i]), self.bodies.get(keys[j])) {
                    (Some(a), Some(b)) => a.check_collision(b, world),
                    _ => None,
                };
                if let Some(contact) = contact {
                    if let Some([a, b]) = self.bodies.get_disjoint_mut([keys[i], keys[j]]) {
                        solve_collision(world, a, b, &contact, &self.config);
                    }
                }
            }
        }

        sync_global_transforms(world);
    }

    /// Drop bodies whose scene node no longer exists.
    fn prune_dead_bodies(&mut self, world: &hecs::World) {
        let before = self.bodies.len();
        self.bodies.retain(|_, body| world.contains(body.node));
        let pruned = before - self.bodies.len();
        if pruned > 0 {
            tracing::trace!(pruned, "pruned bodies with dead nodes");
        }
        if let Some(key) = self.player {
            if !self.bodies.contains_key(key) {
                self.player = None;
            }
        }
    }

    /// Step the player on the fixed timestep accumulator.
    fn advance_player(&mut self, world: &mut hecs::World, dt: f32) {
        if self.player.is_none() {
            return;
        }

        self.accumulator += dt as f64;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.player_timestep
            && substeps < self.config.max_substeps
        {
            if let Some(body) = self.player.and_then(|key| self.bodies.get_mut(key)) {
                body.integrate(world, &self.config, self.config.player_timestep as f32);
            }
            self.accumulator -= self.config.player_timestep;
            substeps += 1;
        }

        // Clamp the accumulator to avoid a spiral of death.
        if self.accumulator > self.config.player_timestep * self.config.max_substeps as f64 {
            self.accumulator = 0.0;
        }
    }
}
