use std::fmt;

/// Opaque 128-bit trackable identifier as reported by the native tracking
/// layer, stored as two 64-bit halves.
///
/// [`TrackableId::INVALID`] (all zeros) is the sentinel meaning "no
/// parent" in provider records; it never identifies a real trackable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TrackableId {
    sub_id1: u64,
    sub_id2: u64,
}

impl TrackableId {
    /// The all-zero sentinel id.
    pub const INVALID: Self = Self {
        sub_id1: 0,
        sub_id2: 0,
    };

    #[must_use]
    pub const fn new(sub_id1: u64, sub_id2: u64) -> Self {
        Self { sub_id1, sub_id2 }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.sub_id1 != 0 || self.sub_id2 != 0
    }
}

impl fmt::Display for TrackableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}-{:016x}", self.sub_id1, self.sub_id2)
    }
}

impl fmt::Debug for TrackableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrackableId({self})")
    }
}

/// High-level trackable kind.
///
/// Several kinds may share one native id (a plane and its bounding box,
/// for instance), which is why lookups are keyed by ([`TrackableId`],
/// `TrackableKind`) pairs rather than the id alone.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum TrackableKind {
    /// No kind. Used by reset pool entries and synthesized placeholder
    /// parents.
    #[default]
    None,
    Plane,
    Anchor,
    Face,
    Body,
    PointCloud,
    Image,
    Object,
    EnvironmentProbe,
    Participant,
    Mesh,
    BoundingBox,
}
