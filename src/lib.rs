//! granite physics
//!
//! Rigid body physics and collision for the granite 3D engine.
//!
//! # Architecture
//!
//! One tick of [`PhysicsEngine::update`] runs the pipeline:
//!
//! 1. Prune bodies whose scene node has been despawned
//! 2. Integrate entity bodies (semi-implicit Euler)
//! 3. Advance the player through the fixed timestep accumulator
//! 4. Clear ground contact flags
//! 5. All-pairs AABB collision detection
//! 6. Resolve each contact in place (position correction + impulse)
//! 7. Synchronize world transforms for the renderer
//!
//! Scene nodes are hecs entities; the renderer reads their
//! [`GlobalTransform`] after the tick and never talks to the physics
//! state directly.

pub mod error;
pub mod physics;
pub mod scene;

pub use error::PhysicsError;

pub use physics::body::{BodyKey, RigidBody, RigidBodyType};
pub use physics::collider::{Aabb, Collider};
pub use physics::contact::Contact;
pub use physics::{PhysicsConfig, PhysicsEngine};

pub use scene::{sync_global_transforms, GlobalTransform, Transform};

// Re-export glam for convenience
pub use glam;
