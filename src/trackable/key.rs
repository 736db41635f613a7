use crate::trackable::{TrackableId, TrackableKind};

/// Composite lookup key: a native trackable id plus the high-level kind
/// using it.
///
/// Two keys compare equal iff both fields do; the key is the unit of
/// uniqueness in the spawner's bookkeeping. Constructed transiently
/// wherever an (id, kind) pair needs comparing, never pooled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TrackableKey {
    pub id: TrackableId,
    pub kind: TrackableKind,
}

impl TrackableKey {
    #[must_use]
    pub const fn new(id: TrackableId, kind: TrackableKind) -> Self {
        Self { id, kind }
    }
}
