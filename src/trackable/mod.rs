//! Trackable identity and bookkeeping types.
//!
//! - [`TrackableId`]: opaque 128-bit native identifier
//! - [`TrackableKind`]: high-level trackable kind tag
//! - [`TrackableKey`]: composite (id, kind) map key
//! - [`TrackableEntry`]: pooled record linking a node to its resolved
//!   parent and children
//! - [`TrackableRecord`]: the contract per-frame provider records fulfill

pub mod entry;
pub mod id;
pub mod key;
pub mod record;

pub use entry::TrackableEntry;
pub use id::{TrackableId, TrackableKind};
pub use key::TrackableKey;
pub use record::{NativeTrackableData, TrackableRecord};
