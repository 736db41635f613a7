#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod errors;
pub mod graph;
pub mod math;
pub mod origin;
pub mod pool;
pub mod spawner;
pub mod trackable;

pub use errors::TrackableError;
pub use graph::{NodeGraph, NodeHandle, SceneGraph};
pub use math::Pose;
pub use origin::Origin;
pub use pool::{Pool, Poolable};
pub use spawner::TrackableSpawner;
pub use trackable::{
    NativeTrackableData, TrackableEntry, TrackableId, TrackableKey, TrackableKind, TrackableRecord,
};
