//! Engine-side node graph.
//!
//! The spawner never touches a concrete engine type. It talks to the scene
//! through [`NodeGraph`], a small capability set (instantiate, set-parent,
//! world pose get/set, activate), and the engine talks back through
//! explicit notification calls on the spawner. [`SceneGraph`] is the
//! built-in implementation used by the tests and by hosts without their
//! own scene system.

pub mod node;
pub mod scene;

pub use node::Node;
pub use scene::SceneGraph;

use slotmap::new_key_type;

use crate::errors::Result;
use crate::math::Pose;

new_key_type! {
    /// Handle to a node in a [`NodeGraph`]. Stale handles are tolerated by
    /// every operation; they never panic.
    pub struct NodeHandle;
}

/// The scene-graph capabilities the trackable spawner depends on.
///
/// Reparenting via [`set_parent`](NodeGraph::set_parent) preserves the
/// child's **local** pose, as most engines do. Callers that need the world
/// pose preserved must capture and restore it around the call.
pub trait NodeGraph {
    /// Creates a bare node at the graph root with the given debug name.
    fn create_node(&mut self, name: &str) -> NodeHandle;

    /// Deep-clones `template` into a new root-level node named `name`.
    ///
    /// The clone is returned deactivated so the caller can finish setting
    /// it up before any lifecycle observers see it. The template's own
    /// active state is restored after cloning.
    fn instantiate(&mut self, template: NodeHandle, name: &str) -> Result<NodeHandle>;

    /// Returns true when `handle` refers to a live node.
    fn contains(&self, handle: NodeHandle) -> bool;

    /// Reparents `child`, preserving its local pose. `None` detaches the
    /// node to the graph root. A stale child or parent handle is a no-op.
    /// An attach that would make a node an ancestor of itself must be
    /// refused; implementations keep the child at the root instead of
    /// closing a parent cycle.
    fn set_parent(&mut self, child: NodeHandle, parent: Option<NodeHandle>);

    /// Computes the node's world pose by composing the parent chain.
    fn world_pose(&self, handle: NodeHandle) -> Option<Pose>;

    /// Sets the node's world pose by rewriting its local pose against the
    /// current parent chain. Children keep their local poses and therefore
    /// move along with the node.
    fn set_world_pose(&mut self, handle: NodeHandle, pose: Pose);

    /// Sets the node's own active flag.
    fn set_active(&mut self, handle: NodeHandle, active: bool);

    /// Returns the node's own active flag, or false for a stale handle.
    fn is_active(&self, handle: NodeHandle) -> bool;
}
