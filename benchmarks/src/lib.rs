//! Shared setup helpers for granite benchmarks.
//!
//! ## Running
//!
//! All benchmarks (criterion):
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- update
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- contact

use glam::{Mat4, Vec3};
use granite::{Aabb, Collider, GlobalTransform, PhysicsConfig, PhysicsEngine, RigidBody, Transform};

fn spawn_box(world: &mut hecs::World, position: Vec3, half: Vec3) -> hecs::Entity {
    world.spawn((
        Transform::from_position(position),
        GlobalTransform(Mat4::from_translation(position)),
        Collider::new(Aabb::new(-half, half)),
    ))
}

/// `n` dynamic unit boxes in a grid layout so roughly half overlap,
/// falling onto one large static ground slab.
pub fn setup_falling_boxes(n: usize) -> (hecs::World, PhysicsEngine) {
    let mut world = hecs::World::new();
    let mut engine = PhysicsEngine::new(PhysicsConfig::default());

    let ground = spawn_box(
        &mut world,
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(500.0, 0.5, 500.0),
    );
    engine.add_entity(RigidBody::new_static(ground));

    let cols = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        let x = (i % cols) as f32 * 0.75;
        let z = (i / cols) as f32 * 0.75;
        let node = spawn_box(&mut world, Vec3::new(x, 2.0, z), Vec3::splat(0.5));
        let mut body = RigidBody::new_dynamic(node, 1.0).expect("valid mass");
        body.use_gravity = true;
        engine.add_entity(body);
    }

    (world, engine)
}

/// Sparse scene: `n` dynamic boxes far enough apart that no pair collides.
pub fn setup_sparse_boxes(n: usize) -> (hecs::World, PhysicsEngine) {
    let mut world = hecs::World::new();
    let mut engine = PhysicsEngine::new(PhysicsConfig::default());

    let cols = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        let x = (i % cols) as f32 * 10.0;
        let z = (i / cols) as f32 * 10.0;
        let node = spawn_box(&mut world, Vec3::new(x, 0.0, z), Vec3::splat(0.5));
        engine.add_entity(RigidBody::new_dynamic(node, 1.0).expect("valid mass"));
    }

    (world, engine)
}
