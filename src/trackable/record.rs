use crate::math::Pose;
use crate::trackable::TrackableId;

/// The contract a native provider record fulfills to be ingested.
///
/// A batch is a finite ordered sequence of records for one trackable
/// kind. Records may arrive in any order, may mix new and already-seen
/// ids, and may list children before their parents. Poses are
/// session-relative; the spawner converts them to world space through the
/// current origin.
pub trait TrackableRecord {
    /// Native id of the trackable. Must be valid.
    fn trackable_id(&self) -> TrackableId;

    /// Declared parent id, or [`TrackableId::INVALID`] for roots. May
    /// reference a trackable of a different kind than this record's.
    fn parent_id(&self) -> TrackableId;

    /// Session-relative pose.
    fn session_pose(&self) -> Pose;
}

/// Plain-data record for providers without their own record struct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeTrackableData {
    pub id: TrackableId,
    pub parent_id: TrackableId,
    pub pose: Pose,
}

impl NativeTrackableData {
    #[must_use]
    pub fn new(id: TrackableId, parent_id: TrackableId, pose: Pose) -> Self {
        Self {
            id,
            parent_id,
            pose,
        }
    }
}

impl TrackableRecord for NativeTrackableData {
    fn trackable_id(&self) -> TrackableId {
        self.id
    }

    fn parent_id(&self) -> TrackableId {
        self.parent_id
    }

    fn session_pose(&self) -> Pose {
        self.pose
    }
}
