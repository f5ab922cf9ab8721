//! Scene node components.
//!
//! A scene node is a hecs entity carrying a [`Transform`] (local position,
//! rotation, scale) and a [`GlobalTransform`] (derived world matrix, read by
//! the renderer). Nodes that participate in collision additionally carry a
//! [`Collider`](crate::physics::collider::Collider) with their model bounds.
//!
//! Physics stores entity ids as weak back-references. Despawning a node
//! invalidates the id; every physics operation checks liveness through the
//! world before touching it.

use glam::{Mat4, Quat, Vec3};

/// Local-space transform. Stores position, rotation, and scale separately.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Convert to a 4x4 matrix (translation * rotation * scale).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// World-space transform matrix. Updated at the end of each physics tick.
#[derive(Debug, Clone, Copy)]
pub struct GlobalTransform(pub Mat4);

impl Default for GlobalTransform {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

/// Synchronize `GlobalTransform` from `Transform` on every node.
///
/// Mutating node transforms is the only way physics results become
/// externally visible; the renderer picks up the synchronized matrices on
/// its next draw.
pub fn sync_global_transforms(world: &mut hecs::World) {
    for (_, (transform, global)) in world.query_mut::<(&Transform, &mut GlobalTransform)>() {
        global.0 = transform.to_matrix();
    }
}
