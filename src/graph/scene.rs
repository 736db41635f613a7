//! Built-in slotmap-backed scene graph.
//!
//! Hosts embedding the spawner into a real engine implement [`NodeGraph`]
//! over their own scene system; this implementation exists for tests,
//! headless tools, and the simulation driver. Destroyed nodes are recorded
//! so the owner of the update loop can forward destroy notifications to
//! the spawner (the graph itself does not know about trackable keys).

use slotmap::SlotMap;

use crate::errors::{Result, TrackableError};
use crate::graph::node::Node;
use crate::graph::{NodeGraph, NodeHandle};
use crate::math::Pose;

pub struct SceneGraph {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
    /// Handles removed since the last [`take_destroyed`](Self::take_destroyed),
    /// in post-order (children before their parent).
    destroyed: Vec<NodeHandle>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            destroyed: Vec::new(),
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[must_use]
    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(handle)?.parent
    }

    #[must_use]
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(handle).map_or(&[], |n| n.children.as_slice())
    }

    #[must_use]
    pub fn name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(Node::name)
    }

    #[must_use]
    pub fn local_pose(&self, handle: NodeHandle) -> Option<Pose> {
        self.nodes.get(handle).map(|n| n.pose)
    }

    pub fn set_local_pose(&mut self, handle: NodeHandle, pose: Pose) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.pose = pose;
        }
    }

    /// Removes a node and its whole subtree.
    ///
    /// Every removed handle is recorded for [`take_destroyed`](Self::take_destroyed)
    /// so the engine driver can fire per-node destroy notifications.
    pub fn destroy(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };

        // Unlink from the old parent or the root list before tearing down
        // the subtree.
        if let Some(parent) = node.parent {
            if let Some(p) = self.nodes.get_mut(parent) {
                if let Some(i) = p.children.iter().position(|&c| c == handle) {
                    p.children.remove(i);
                }
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&r| r == handle) {
            self.root_nodes.remove(i);
        }

        self.destroy_recursive(handle);
    }

    fn destroy_recursive(&mut self, handle: NodeHandle) {
        let children = match self.nodes.get(handle) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.destroy_recursive(child);
        }
        self.nodes.remove(handle);
        self.destroyed.push(handle);
    }

    /// Drains the destroy-notification buffer.
    pub fn take_destroyed(&mut self) -> Vec<NodeHandle> {
        std::mem::take(&mut self.destroyed)
    }

    fn is_ancestor_of(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    fn clone_subtree(&mut self, source: NodeHandle) -> Option<NodeHandle> {
        let (pose, active, name, children) = {
            let src = self.nodes.get(source)?;
            (src.pose, src.active, src.name.clone(), src.children.clone())
        };

        let clone = self.nodes.insert(Node {
            parent: None,
            children: Vec::new(),
            pose,
            active,
            name,
        });

        for child in children {
            if let Some(child_clone) = self.clone_subtree(child) {
                self.nodes[child_clone].parent = Some(clone);
                self.nodes[clone].children.push(child_clone);
            }
        }

        Some(clone)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeGraph for SceneGraph {
    fn create_node(&mut self, name: &str) -> NodeHandle {
        let handle = self.nodes.insert(Node::new(name));
        self.root_nodes.push(handle);
        handle
    }

    fn instantiate(&mut self, template: NodeHandle, name: &str) -> Result<NodeHandle> {
        let Some(t) = self.nodes.get(template) else {
            return Err(TrackableError::StaleTemplate(template));
        };
        let was_active = t.active;

        // Clone from a deactivated template so the copy comes into
        // existence inactive; lifecycle observers must never see a
        // half-built node. The template's own state is restored below.
        self.nodes[template].active = false;
        let clone = match self.clone_subtree(template) {
            Some(clone) => clone,
            None => return Err(TrackableError::StaleTemplate(template)),
        };
        self.nodes[template].active = was_active;

        self.nodes[clone].name = name.to_owned();
        self.root_nodes.push(clone);
        Ok(clone)
    }

    fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    fn set_parent(&mut self, child: NodeHandle, parent: Option<NodeHandle>) {
        if parent == Some(child) {
            log::warn!("cannot parent a node to itself");
            return;
        }
        if !self.nodes.contains_key(child) {
            return;
        }

        // Detach from the old parent or the root list.
        let old_parent = self.nodes[child].parent;
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p) {
                if let Some(i) = n.children.iter().position(|&c| c == child) {
                    n.children.remove(i);
                }
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&r| r == child) {
            self.root_nodes.remove(i);
        }

        // Attach to the new one. The local pose is left untouched.
        match parent {
            Some(p) => {
                if !self.nodes.contains_key(p) {
                    log::error!("parent node not found during attach, keeping child at the root");
                    self.root_nodes.push(child);
                    self.nodes[child].parent = None;
                } else if self.is_ancestor_of(child, p) {
                    // Attaching under a descendant would close a parent
                    // cycle and every chain walk would stop terminating.
                    log::error!("attach would create a cycle, keeping child at the root");
                    self.root_nodes.push(child);
                    self.nodes[child].parent = None;
                } else {
                    self.nodes[p].children.push(child);
                    self.nodes[child].parent = Some(p);
                }
            }
            None => {
                self.root_nodes.push(child);
                self.nodes[child].parent = None;
            }
        }
    }

    fn world_pose(&self, handle: NodeHandle) -> Option<Pose> {
        let node = self.nodes.get(handle)?;
        let mut pose = node.pose;
        let mut current = node.parent;
        while let Some(parent) = current {
            let parent_node = self.nodes.get(parent)?;
            pose = parent_node.pose * pose;
            current = parent_node.parent;
        }
        Some(pose)
    }

    fn set_world_pose(&mut self, handle: NodeHandle, pose: Pose) {
        let Some(parent) = self.nodes.get(handle).map(|n| n.parent) else {
            return;
        };
        let parent_world = parent
            .and_then(|p| self.world_pose(p))
            .unwrap_or(Pose::IDENTITY);
        self.nodes[handle].pose = parent_world.inverse() * pose;
    }

    fn set_active(&mut self, handle: NodeHandle, active: bool) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.active = active;
        }
    }

    fn is_active(&self, handle: NodeHandle) -> bool {
        self.nodes.get(handle).is_some_and(|n| n.active)
    }
}
