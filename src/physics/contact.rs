//! Contact data for collision response.

use glam::Vec3;

/// A single contact between two overlapping bodies.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Separation normal: the unit axis of smallest penetration, pointing
    /// from the second body toward the first.
    pub normal: Vec3,
    /// Penetration depth along the normal.
    pub depth: f32,
}
