use crate::graph::NodeHandle;
use crate::math::Pose;

/// A minimal scene node: hierarchy links, a local pose, and an active flag.
///
/// Everything trackable-specific (keys, parent resolution state, orphan
/// bookkeeping) lives in the spawner's entries, not here. The node only
/// carries what a scene graph must traverse.
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node handle (None for root nodes).
    pub(crate) parent: Option<NodeHandle>,
    /// Child node handles, in attach order.
    pub(crate) children: Vec<NodeHandle>,
    /// Pose relative to the parent node.
    pub pose: Pose,
    /// Active flag. Inactive nodes are skipped by lifecycle observers.
    pub active: bool,
    /// Debug/display name.
    pub(crate) name: String,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            pose: Pose::IDENTITY,
            active: true,
            name: name.to_owned(),
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
