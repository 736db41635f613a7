//! SceneGraph integration tests
//!
//! Tests for:
//! - Node creation, naming, root list maintenance
//! - attach/detach hierarchy and local-pose semantics
//! - World pose computation and assignment
//! - Template instantiation (deep clone, active-state discipline)
//! - Subtree destruction and the destroy-notification buffer

use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

use trackgraph::{NodeGraph, Pose, SceneGraph};

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

fn pose_approx(a: Pose, b: Pose) -> bool {
    (a.position - b.position).length() < EPSILON && a.rotation.dot(b.rotation).abs() > 1.0 - EPSILON
}

// ============================================================================
// Creation & naming
// ============================================================================

#[test]
fn create_node_is_a_root() {
    let mut graph = SceneGraph::new();
    let node = graph.create_node("test");
    assert!(graph.contains(node));
    assert!(graph.roots().contains(&node));
    assert_eq!(graph.name(node), Some("test"));
}

#[test]
fn new_nodes_start_active_at_identity() {
    let mut graph = SceneGraph::new();
    let node = graph.create_node("n");
    assert!(graph.is_active(node));
    assert_eq!(graph.local_pose(node), Some(Pose::IDENTITY));
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn set_parent_links_both_directions() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");

    graph.set_parent(child, Some(parent));

    assert_eq!(graph.parent(child), Some(parent));
    assert!(graph.children(parent).contains(&child));
    assert!(!graph.roots().contains(&child));
}

#[test]
fn set_parent_none_detaches_to_root() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("parent");
    let child = graph.create_node("child");
    graph.set_parent(child, Some(parent));

    graph.set_parent(child, None);

    assert_eq!(graph.parent(child), None);
    assert!(graph.roots().contains(&child));
    assert!(graph.children(parent).is_empty());
}

#[test]
fn set_parent_removes_from_old_parent() {
    let mut graph = SceneGraph::new();
    let parent1 = graph.create_node("p1");
    let parent2 = graph.create_node("p2");
    let child = graph.create_node("c");

    graph.set_parent(child, Some(parent1));
    graph.set_parent(child, Some(parent2));

    assert!(!graph.children(parent1).contains(&child));
    assert!(graph.children(parent2).contains(&child));
}

#[test]
fn set_parent_to_self_is_noop() {
    let mut graph = SceneGraph::new();
    let node = graph.create_node("n");
    graph.set_parent(node, Some(node));
    assert_eq!(graph.parent(node), None);
}

#[test]
fn set_parent_refuses_cycles() {
    let mut graph = SceneGraph::new();
    let a = graph.create_node("a");
    let b = graph.create_node("b");
    let c = graph.create_node("c");
    graph.set_parent(b, Some(a));
    graph.set_parent(c, Some(b));

    // Attaching a node under its own descendant must not close a parent
    // cycle; the child is kept at the root instead.
    graph.set_parent(a, Some(c));

    assert_eq!(graph.parent(a), None);
    assert!(graph.roots().contains(&a));
    assert!(!graph.children(c).contains(&a));
    assert!(graph.world_pose(c).is_some(), "chain walk must terminate");
}

#[test]
fn reparenting_preserves_local_pose() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("p");
    let child = graph.create_node("c");
    graph.set_local_pose(parent, Pose::from_position(Vec3::new(5.0, 0.0, 0.0)));
    graph.set_local_pose(child, Pose::from_position(Vec3::new(0.0, 1.0, 0.0)));

    graph.set_parent(child, Some(parent));

    // Local pose untouched, so the world pose shifts by the parent offset.
    assert_eq!(
        graph.local_pose(child),
        Some(Pose::from_position(Vec3::new(0.0, 1.0, 0.0)))
    );
    let world = graph.world_pose(child).unwrap();
    assert!(pose_approx(world, Pose::from_position(Vec3::new(5.0, 1.0, 0.0))));
}

// ============================================================================
// World poses
// ============================================================================

#[test]
fn world_pose_composes_parent_chain() {
    let mut graph = SceneGraph::new();
    let a = graph.create_node("a");
    let b = graph.create_node("b");
    let c = graph.create_node("c");
    graph.set_parent(b, Some(a));
    graph.set_parent(c, Some(b));

    graph.set_local_pose(a, Pose::new(Vec3::ZERO, Quat::from_rotation_z(FRAC_PI_2)));
    graph.set_local_pose(b, Pose::from_position(Vec3::new(1.0, 0.0, 0.0)));
    graph.set_local_pose(c, Pose::from_position(Vec3::new(1.0, 0.0, 0.0)));

    // a rotates the whole chain by 90 degrees around Z.
    let world = graph.world_pose(c).unwrap();
    assert!((world.position - Vec3::new(0.0, 2.0, 0.0)).length() < EPSILON);
}

#[test]
fn set_world_pose_rewrites_local_against_parent() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("p");
    let child = graph.create_node("c");
    graph.set_local_pose(parent, Pose::from_position(Vec3::new(10.0, 0.0, 0.0)));
    graph.set_parent(child, Some(parent));

    let target = Pose::from_position(Vec3::new(10.0, 5.0, 0.0));
    graph.set_world_pose(child, target);

    assert!(pose_approx(graph.world_pose(child).unwrap(), target));
    assert!(pose_approx(
        graph.local_pose(child).unwrap(),
        Pose::from_position(Vec3::new(0.0, 5.0, 0.0))
    ));
}

#[test]
fn moving_a_parent_moves_children_implicitly() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("p");
    let child = graph.create_node("c");
    graph.set_parent(child, Some(parent));
    graph.set_local_pose(child, Pose::from_position(Vec3::new(0.0, 1.0, 0.0)));

    graph.set_world_pose(parent, Pose::from_position(Vec3::new(3.0, 0.0, 0.0)));

    let world = graph.world_pose(child).unwrap();
    assert!((world.position - Vec3::new(3.0, 1.0, 0.0)).length() < EPSILON);
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn instantiate_deep_clones_the_template() {
    let mut graph = SceneGraph::new();
    let template = graph.create_node("template");
    let visual = graph.create_node("visual");
    graph.set_parent(visual, Some(template));
    graph.set_local_pose(visual, Pose::from_position(Vec3::new(0.0, 0.5, 0.0)));

    let clone = graph.instantiate(template, "clone").unwrap();

    assert_ne!(clone, template);
    assert_eq!(graph.name(clone), Some("clone"));
    assert_eq!(graph.children(clone).len(), 1);
    let cloned_visual = graph.children(clone)[0];
    assert_ne!(cloned_visual, visual);
    assert_eq!(
        graph.local_pose(cloned_visual),
        Some(Pose::from_position(Vec3::new(0.0, 0.5, 0.0)))
    );
}

#[test]
fn instantiate_returns_inactive_clone_and_restores_template() {
    let mut graph = SceneGraph::new();
    let template = graph.create_node("template");
    assert!(graph.is_active(template));

    let clone = graph.instantiate(template, "clone").unwrap();

    assert!(!graph.is_active(clone), "clone must come up inactive");
    assert!(graph.is_active(template), "template state must be restored");
}

#[test]
fn instantiate_stale_template_errors() {
    let mut graph = SceneGraph::new();
    let template = graph.create_node("template");
    graph.destroy(template);
    assert!(graph.instantiate(template, "clone").is_err());
}

// ============================================================================
// Destruction
// ============================================================================

#[test]
fn destroy_removes_whole_subtree() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("p");
    let child = graph.create_node("c");
    let grandchild = graph.create_node("g");
    graph.set_parent(child, Some(parent));
    graph.set_parent(grandchild, Some(child));

    graph.destroy(parent);

    assert!(!graph.contains(parent));
    assert!(!graph.contains(child));
    assert!(!graph.contains(grandchild));
    assert_eq!(graph.node_count(), 0);
}

#[test]
fn destroy_unlinks_from_surviving_parent() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("p");
    let child = graph.create_node("c");
    graph.set_parent(child, Some(parent));

    graph.destroy(child);

    assert!(graph.contains(parent));
    assert!(graph.children(parent).is_empty());
}

#[test]
fn take_destroyed_reports_every_removed_node_once() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("p");
    let child = graph.create_node("c");
    graph.set_parent(child, Some(parent));

    graph.destroy(parent);

    let destroyed = graph.take_destroyed();
    assert_eq!(destroyed.len(), 2);
    assert!(destroyed.contains(&parent));
    assert!(destroyed.contains(&child));

    assert!(graph.take_destroyed().is_empty(), "buffer drains on take");
}
