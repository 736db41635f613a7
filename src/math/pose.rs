//! Rigid pose (position + rotation).
//!
//! Trackable poses carry no scale, so a full TRS transform would waste a
//! third of its payload. [`Pose`] composes like a matrix: `parent * local`
//! yields the child's pose in the parent's frame of reference.

use std::ops::Mul;

use glam::{Affine3A, Quat, Vec3};

/// A rigid transform: translation followed by rotation, no scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    /// The identity pose: zero translation, identity rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[must_use]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Returns the inverse pose, so that `pose * pose.inverse()` is the
    /// identity (up to floating-point error).
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: inv_rotation * -self.position,
            rotation: inv_rotation,
        }
    }

    /// Transforms a point from this pose's local space into its parent
    /// space.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.position
    }

    /// Converts to an affine matrix for interop with matrix pipelines.
    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.rotation, self.position)
    }

    /// Builds a pose from an affine matrix, discarding any scale.
    #[must_use]
    pub fn from_affine(affine: &Affine3A) -> Self {
        let (_, rotation, position) = affine.to_scale_rotation_translation();
        Self { position, rotation }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Pose {
    type Output = Pose;

    /// Composes two poses: `self` is the parent frame, `rhs` the local
    /// pose expressed inside it.
    fn mul(self, rhs: Pose) -> Pose {
        Pose {
            position: self.rotation * rhs.position + self.position,
            rotation: self.rotation * rhs.rotation,
        }
    }
}
