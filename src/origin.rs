//! Session origin.
//!
//! Provider poses are session-relative: they say where a trackable sits
//! inside the tracking session, not where it sits in the world. The
//! [`Origin`] pins the session frame to a node in the scene (the
//! "trackables root") and carries the session-to-world transform applied
//! to every ingested pose.
//!
//! When the host moves or replaces the origin it calls
//! [`TrackableSpawner::on_origin_changed`](crate::TrackableSpawner::on_origin_changed)
//! with the new value; the spawner handles re-rooting.

use crate::graph::NodeHandle;
use crate::math::Pose;

#[derive(Debug, Clone, Copy)]
pub struct Origin {
    root: NodeHandle,
    session_to_world: Pose,
}

impl Origin {
    #[must_use]
    pub fn new(root: NodeHandle, session_to_world: Pose) -> Self {
        Self {
            root,
            session_to_world,
        }
    }

    /// The default parent node for unparented trackables.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// The session-to-world transform.
    #[inline]
    #[must_use]
    pub fn session_to_world(&self) -> Pose {
        self.session_to_world
    }

    /// Converts a session-relative pose to world space.
    #[inline]
    #[must_use]
    pub fn to_world(&self, session_pose: &Pose) -> Pose {
        self.session_to_world * *session_pose
    }
}
