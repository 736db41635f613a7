//! Error Types
//!
//! The error surface of this crate is deliberately small. Invariant
//! violations (self-parenting records, duplicate registration of the same
//! id/kind pair) are bugs in the upstream provider and fail fast via
//! assertions instead of returning an error. Expected absences (a parent
//! that has not arrived yet, a lookup miss, a parent destroyed in the same
//! pass) flow through `Option` returns and orphan bookkeeping.
//!
//! What remains are runtime conditions the engine can cause from outside:
//! a template node or the origin root being destroyed while the spawner
//! still holds its handle.

use thiserror::Error;

use crate::graph::NodeHandle;

/// The error type for trackable ingestion.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackableError {
    /// The template handle passed to batch ingestion no longer refers to a
    /// live node. The engine destroyed it out from under the caller.
    #[error("template node {0:?} is stale or was destroyed")]
    StaleTemplate(NodeHandle),

    /// The origin's trackables root was destroyed. New trackables have
    /// nowhere to attach until a fresh origin is supplied.
    #[error("origin trackables root was destroyed")]
    DeadOriginRoot,
}

/// Alias for `Result<T, TrackableError>`.
pub type Result<T> = std::result::Result<T, TrackableError>;
