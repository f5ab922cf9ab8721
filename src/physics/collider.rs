//! Axis-aligned bounding boxes and the model collider component.

use glam::{Mat4, Vec3};

use super::contact::Contact;

/// Axis-aligned bounding box.
///
/// Invariant: `min <= max` component-wise.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two corner points.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Compute the bounding box of a set of points (vertex extents).
    ///
    /// An empty slice degenerates to a point at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-extents along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Test whether two AABBs overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Overlap test that also yields the minimum translation vector.
    ///
    /// Returns the penetration depth and the separation normal pointing
    /// from `other` toward `self`, or `None` when the boxes are disjoint or
    /// merely touching. Of the three per-axis overlaps the smallest wins;
    /// ties go to the first axis in X, Y, Z order.
    pub fn contact(&self, other: &Aabb) -> Option<Contact> {
        let overlap_x = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let overlap_y = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        let overlap_z = self.max.z.min(other.max.z) - self.min.z.max(other.min.z);

        if overlap_x <= 0.0 || overlap_y <= 0.0 || overlap_z <= 0.0 {
            return None;
        }

        let mut depth = overlap_x;
        let mut axis = 0;
        if overlap_y < depth {
            depth = overlap_y;
            axis = 1;
        }
        if overlap_z < depth {
            depth = overlap_z;
            axis = 2;
        }

        // Sign the normal so it points toward this box's center.
        let delta = self.center() - other.center();
        let normal = match axis {
            0 => Vec3::X * delta.x.signum(),
            1 => Vec3::Y * delta.y.signum(),
            _ => Vec3::Z * delta.z.signum(),
        };

        Some(Contact { normal, depth })
    }
}

/// Collision component wrapping the bounds of a renderable model.
///
/// The bounds live in the model's local space and are owned by the model;
/// the collider itself is stateless. [`Collider::world_aabb`] produces the
/// box for the node's current transform.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub bounds: Aabb,
}

impl Collider {
    /// Create a collider from local-space model bounds.
    pub fn new(bounds: Aabb) -> Self {
        Self { bounds }
    }

    /// Compute the world-space AABB for the given node transform.
    #[inline]
    pub fn world_aabb(&self, mat: &Mat4) -> Aabb {
        let center = mat.transform_point3(self.bounds.center());
        let half = self.bounds.half_extents();

        // For each world axis, project the local box axes.
        let abs_col0 = mat.x_axis.truncate().abs();
        let abs_col1 = mat.y_axis.truncate().abs();
        let abs_col2 = mat.z_axis.truncate().abs();

        let extent = abs_col0 * half.x + abs_col1 * half.y + abs_col2 * half.z;

        Aabb {
            min: center - extent,
            max: center + extent,
        }
    }
}
