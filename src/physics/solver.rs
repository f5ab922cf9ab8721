//! Pairwise impulse resolution.

use crate::scene::Transform;

use super::body::{RigidBody, RigidBodyType};
use super::contact::Contact;
use super::PhysicsConfig;

/// Resolve one contact in place.
///
/// `contact.normal` points from `b` toward `a`. Positions separate along
/// the normal in proportion to inverse mass so the total separation equals
/// the penetration depth, then an impulse cancels the approaching part of
/// the relative velocity. Already-separating pairs receive no impulse.
pub fn solve_collision(
    world: &mut hecs::World,
    a: &mut RigidBody,
    b: &mut RigidBody,
    contact: &Contact,
    config: &PhysicsConfig,
) {
    let inv_a = a.inv_mass();
    let inv_b = b.inv_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    // Positional correction, distributed by inverse mass.
    let correction = contact.normal * (contact.depth / inv_sum);
    if inv_a > 0.0 {
        if let Ok(mut transform) = world.get::<&mut Transform>(a.node) {
            transform.position += correction * inv_a;
        }
    }
    if inv_b > 0.0 {
        if let Ok(mut transform) = world.get::<&mut Transform>(b.node) {
            transform.position -= correction * inv_b;
        }
    }

    // Impulse along the normal, skipped when the pair already separates.
    let approach = (a.velocity - b.velocity).dot(contact.normal);
    if approach < 0.0 {
        // The lower restitution coefficient dominates.
        let restitution = a.restitution.min(b.restitution);
        let j = -(1.0 + restitution) * approach / inv_sum;
        let impulse = contact.normal * j;
        a.velocity += impulse * inv_a;
        b.velocity -= impulse * inv_b;
    }

    // Ground contact: a near-vertical normal against a static or at least
    // as heavy partner grounds the upper body.
    if contact.normal.y > config.ground_normal_threshold && supports(b, a) {
        a.on_ground = true;
    }
    if contact.normal.y < -config.ground_normal_threshold && supports(a, b) {
        b.on_ground = true;
    }
}

/// Whether `lower` is sturdy enough to carry `upper`.
fn supports(lower: &RigidBody, upper: &RigidBody) -> bool {
    lower.body_type == RigidBodyType::Static || lower.mass() >= upper.mass()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::world_bounds;
    use crate::physics::collider::{Aabb, Collider};
    use crate::scene::GlobalTransform;
    use glam::{Mat4, Vec3};

    fn spawn_box(world: &mut hecs::World, position: Vec3, half: Vec3) -> hecs::Entity {
        world.spawn((
            Transform::from_position(position),
            GlobalTransform(Mat4::from_translation(position)),
            Collider::new(Aabb::new(-half, half)),
        ))
    }

    #[test]
    fn test_positional_correction_removes_overlap() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.0, 0.6, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::splat(0.5));

        let mut a = RigidBody::new_dynamic(node_a, 1.0).unwrap();
        let mut b = RigidBody::new_dynamic(node_b, 3.0).unwrap();

        let contact = a.check_collision(&b, &world).unwrap();
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        // Zero overlap along the resolved axis, up to float tolerance.
        let bounds_a = world_bounds(&world, node_a).unwrap();
        let bounds_b = world_bounds(&world, node_b).unwrap();
        let overlap = bounds_a.max.y.min(bounds_b.max.y) - bounds_a.min.y.max(bounds_b.min.y);
        assert!(overlap.abs() < 1e-5, "residual overlap: {overlap}");

        // The lighter body moved further.
        let pos_a = world.get::<&Transform>(node_a).unwrap().position;
        let pos_b = world.get::<&Transform>(node_b).unwrap().position;
        assert!((pos_a.y - 0.6) > (0.0 - pos_b.y));
    }

    #[test]
    fn test_static_partner_does_not_move() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.0, 0.7, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::new(5.0, 0.5, 5.0));

        let mut a = RigidBody::new_dynamic(node_a, 1.0).unwrap();
        let mut b = RigidBody::new_static(node_b);

        let contact = a.check_collision(&b, &world).unwrap();
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        assert_eq!(world.get::<&Transform>(node_b).unwrap().position, Vec3::ZERO);
        let pos_a = world.get::<&Transform>(node_a).unwrap().position;
        assert!((pos_a.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_inelastic_impulse_kills_normal_velocity() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.0, 0.9, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::new(5.0, 0.5, 5.0));

        let mut a = RigidBody::new_dynamic(node_a, 1.0).unwrap();
        let mut b = RigidBody::new_static(node_b);
        a.velocity = Vec3::new(0.0, -5.0, 0.0);
        a.restitution = 0.0;

        let contact = a.check_collision(&b, &world).unwrap();
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        assert!(a.velocity.y.abs() < 1e-5);
        assert!(a.on_ground);
    }

    #[test]
    fn test_elastic_impulse_reflects_normal_velocity() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.0, 0.9, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::new(5.0, 0.5, 5.0));

        let mut a = RigidBody::new_dynamic(node_a, 1.0).unwrap();
        let mut b = RigidBody::new_static(node_b);
        a.velocity = Vec3::new(0.0, -4.0, 0.0);
        a.restitution = 1.0;
        b.restitution = 1.0;

        let contact = a.check_collision(&b, &world).unwrap();
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        assert!((a.velocity.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_minimum_restitution_dominates() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.0, 0.9, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::new(5.0, 0.5, 5.0));

        let mut a = RigidBody::new_dynamic(node_a, 1.0).unwrap();
        let mut b = RigidBody::new_static(node_b);
        a.velocity = Vec3::new(0.0, -5.0, 0.0);
        a.restitution = 0.0;
        b.restitution = 0.9;

        let contact = a.check_collision(&b, &world).unwrap();
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        assert!(a.velocity.y.abs() < 1e-5);
    }

    #[test]
    fn test_separating_pair_receives_no_impulse() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.0, 0.9, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::new(5.0, 0.5, 5.0));

        let mut a = RigidBody::new_dynamic(node_a, 1.0).unwrap();
        let mut b = RigidBody::new_static(node_b);
        a.velocity = Vec3::new(0.0, 2.0, 0.0);
        a.restitution = 1.0;

        let contact = a.check_collision(&b, &world).unwrap();
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        // Still rising at the same speed; only the position separated.
        assert!((a.velocity.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_equal_and_opposite_impulses() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.0, 0.8, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::splat(0.5));

        let mut a = RigidBody::new_dynamic(node_a, 2.0).unwrap();
        let mut b = RigidBody::new_dynamic(node_b, 1.0).unwrap();
        a.velocity = Vec3::new(0.0, -3.0, 0.0);

        let momentum_before = a.velocity * a.mass() + b.velocity * b.mass();

        let contact = a.check_collision(&b, &world).unwrap();
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        let momentum_after = a.velocity * a.mass() + b.velocity * b.mass();
        assert!((momentum_before - momentum_after).length() < 1e-4);
    }

    #[test]
    fn test_ground_flag_requires_heavier_partner() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.0, 0.9, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::splat(0.5));

        // A 10 kg body landing on a 1 kg body is not grounded by it.
        let mut a = RigidBody::new_dynamic(node_a, 10.0).unwrap();
        let mut b = RigidBody::new_dynamic(node_b, 1.0).unwrap();
        a.velocity = Vec3::new(0.0, -1.0, 0.0);

        let contact = a.check_collision(&b, &world).unwrap();
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        assert!(!a.on_ground);
        // The normal points the wrong way to ground the lower body.
        assert!(!b.on_ground);
    }

    #[test]
    fn test_side_contact_does_not_ground() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.9, 0.0, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::splat(0.5));

        let mut a = RigidBody::new_dynamic(node_a, 1.0).unwrap();
        let mut b = RigidBody::new_static(node_b);
        a.velocity = Vec3::new(-1.0, 0.0, 0.0);

        let contact = a.check_collision(&b, &world).unwrap();
        assert_eq!(contact.normal, Vec3::X);
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        assert!(!a.on_ground);
    }

    #[test]
    fn test_two_static_bodies_untouched() {
        let mut world = hecs::World::new();
        let node_a = spawn_box(&mut world, Vec3::new(0.0, 0.5, 0.0), Vec3::splat(0.5));
        let node_b = spawn_box(&mut world, Vec3::ZERO, Vec3::splat(0.5));

        let mut a = RigidBody::new_static(node_a);
        let mut b = RigidBody::new_static(node_b);

        let contact = a.check_collision(&b, &world).unwrap();
        solve_collision(&mut world, &mut a, &mut b, &contact, &PhysicsConfig::default());

        assert_eq!(world.get::<&Transform>(node_a).unwrap().position, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(world.get::<&Transform>(node_b).unwrap().position, Vec3::ZERO);
    }
}
