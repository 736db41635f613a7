use slotmap::Key as _;
use smallvec::SmallVec;

use crate::graph::NodeHandle;
use crate::math::Pose;
use crate::pool::Poolable;
use crate::trackable::{TrackableId, TrackableKey, TrackableKind};

/// Pooled bookkeeping record binding one trackable node to its resolved
/// parent and children.
///
/// An entry is "live" while [`node`](Self::node) is a non-null handle.
/// All mutation is performed by the spawner; the entry itself only knows
/// how to derive its key and how to reset for pool reuse.
#[derive(Debug, Clone)]
pub struct TrackableEntry {
    /// Handle to the node this entry tracks. Null while pooled.
    pub node: NodeHandle,
    /// Native id of the trackable.
    pub id: TrackableId,
    /// High-level kind of the trackable.
    pub kind: TrackableKind,
    /// Last ingested session-relative pose, kept so the world pose can be
    /// recomputed when the origin moves.
    pub session_pose: Pose,
    /// Key of the resolved parent entry. `None` for roots and for entries
    /// still waiting on a missing parent.
    pub parent_key: Option<TrackableKey>,
    /// Declared parent id while unresolved; mirrors membership in the
    /// spawner's orphan map. `None` once resolved (or for roots).
    pub awaiting_parent: Option<TrackableId>,
    /// Keys of resolved children, in discovery order.
    pub child_keys: SmallVec<[TrackableKey; 4]>,
}

impl TrackableEntry {
    /// True while the entry is bound to a live node.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.node.is_null()
    }

    /// The composite key this entry is registered under.
    #[inline]
    #[must_use]
    pub fn key(&self) -> TrackableKey {
        TrackableKey::new(self.id, self.kind)
    }

    /// Binds a pooled entry to a freshly created node.
    pub(crate) fn bind(
        &mut self,
        node: NodeHandle,
        id: TrackableId,
        kind: TrackableKind,
        session_pose: Pose,
    ) {
        self.node = node;
        self.id = id;
        self.kind = kind;
        self.session_pose = session_pose;
    }
}

impl Default for TrackableEntry {
    fn default() -> Self {
        Self {
            node: NodeHandle::null(),
            id: TrackableId::INVALID,
            kind: TrackableKind::None,
            session_pose: Pose::IDENTITY,
            parent_key: None,
            awaiting_parent: None,
            child_keys: SmallVec::new(),
        }
    }
}

impl Poolable for TrackableEntry {
    fn reset(&mut self) {
        self.node = NodeHandle::null();
        self.id = TrackableId::INVALID;
        self.kind = TrackableKind::None;
        self.session_pose = Pose::IDENTITY;
        self.parent_key = None;
        self.awaiting_parent = None;
        self.child_keys.clear();
    }
}
