//! Trackable spawning and hierarchy resolution.
//!
//! A native tracking provider hands the spawner per-frame batches of
//! trackable records. Batches are messy: parents and children may change
//! in the same frame, children may be listed before their parents, and a
//! declared parent may never show up at all. The spawner reconciles this
//! into a consistent node hierarchy:
//!
//! - records for already-known (id, kind) pairs update the node's pose in
//!   place, preserving the world poses of its trackable children;
//! - new records instantiate a node (deactivated during setup), resolve
//!   the parent link, and adopt any orphans that were waiting on them;
//! - children whose parent has not arrived yet are parked in an orphan
//!   map until the end of the batch, so a parent appearing later in the
//!   same batch adopts them without any placeholder churn;
//! - orphans still unresolved after the batch get a synthesized
//!   placeholder parent.
//!
//! A synthesized placeholder is never upgraded when a real trackable with
//! the same id arrives in a later batch: the real trackable registers
//! alongside it (under its own kind) and the placeholder stays as the
//! stand-in parent for the children already attached to it. This is a
//! known limitation, preserved deliberately.
//!
//! The spawner owns bookkeeping only. Nodes belong to the engine's scene
//! graph; the engine must report externally destroyed nodes through
//! [`TrackableSpawner::on_trackable_destroyed`], and origin moves through
//! [`TrackableSpawner::on_origin_changed`]. All operations run
//! synchronously on the update-loop thread.

use rustc_hash::FxHashMap;

use crate::errors::{Result, TrackableError};
use crate::graph::{NodeGraph, NodeHandle};
use crate::math::Pose;
use crate::origin::Origin;
use crate::pool::Pool;
use crate::trackable::{TrackableEntry, TrackableId, TrackableKey, TrackableKind, TrackableRecord};

/// Default pre-reserved capacity of each bookkeeping pool.
const POOL_DEFAULT_CAPACITY: usize = 8;
/// Ceiling on retained pooled objects; overflow is dropped.
const POOL_MAX_SIZE: usize = 64;

pub struct TrackableSpawner {
    /// One entry list per native id: several kinds may share an id. A list
    /// is removed (and released) the moment it empties.
    entries_by_id: FxHashMap<TrackableId, Vec<TrackableEntry>>,
    /// Children waiting on a parent id that has not been seen yet.
    orphans_by_missing_parent: FxHashMap<TrackableId, Vec<TrackableKey>>,

    entry_pool: Pool<TrackableEntry>,
    entry_list_pool: Pool<Vec<TrackableEntry>>,
    orphan_list_pool: Pool<Vec<TrackableKey>>,

    origin: Origin,

    /// Scratch buffer for the two-phase child park/reattach move.
    scratch_nodes: Vec<NodeHandle>,
}

impl TrackableSpawner {
    #[must_use]
    pub fn new(origin: Origin) -> Self {
        Self {
            entries_by_id: FxHashMap::default(),
            orphans_by_missing_parent: FxHashMap::default(),
            entry_pool: Pool::new(POOL_DEFAULT_CAPACITY, POOL_MAX_SIZE),
            entry_list_pool: Pool::new(POOL_DEFAULT_CAPACITY, POOL_MAX_SIZE),
            orphan_list_pool: Pool::new(POOL_DEFAULT_CAPACITY, POOL_MAX_SIZE),
            origin,
            scratch_nodes: Vec::new(),
        }
    }

    /// The current origin.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Full teardown: drops all bookkeeping and every pooled object.
    ///
    /// Call once per runtime reload so no stale hierarchy survives into a
    /// new session. The spawner is reusable afterwards.
    pub fn reset(&mut self) {
        self.entries_by_id.clear();
        self.orphans_by_missing_parent.clear();
        self.entry_pool.clear();
        self.entry_list_pool.clear();
        self.orphan_list_pool.clear();
        self.scratch_nodes.clear();
        log::debug!("trackable spawner reset");
    }

    // ========================================================================
    // Batch ingestion
    // ========================================================================

    /// Ingests a batch of records for one trackable kind.
    ///
    /// Per-record processing defers placeholder creation: a parent listed
    /// later in the same batch must adopt its children directly. Only
    /// after the whole batch is processed do still-unresolved orphans get
    /// a synthesized placeholder parent.
    ///
    /// Returns the created or updated node for each record, in order. A
    /// failing record aborts the batch, but orphans from the records
    /// already ingested still get their placeholder parents before the
    /// error propagates.
    pub fn create_or_update_trackables<G, R>(
        &mut self,
        graph: &mut G,
        kind: TrackableKind,
        records: &[R],
        template: Option<NodeHandle>,
        name_prefix: &str,
    ) -> Result<Vec<NodeHandle>>
    where
        G: NodeGraph,
        R: TrackableRecord,
    {
        let mut nodes = Vec::with_capacity(records.len());
        let mut failure = None;
        for record in records {
            match self.create_or_update_trackable(graph, kind, record, template, name_prefix) {
                Ok(node) => nodes.push(node),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        self.synthesize_placeholder_parents(graph, name_prefix);
        match failure {
            Some(err) => Err(err),
            None => Ok(nodes),
        }
    }

    /// Processes a single record: updates the pose of an existing
    /// trackable, or creates and links a new one.
    ///
    /// # Panics
    ///
    /// A record declaring itself as its own parent, or carrying the
    /// invalid id, is a bug in the upstream provider and asserts.
    pub fn create_or_update_trackable<G, R>(
        &mut self,
        graph: &mut G,
        kind: TrackableKind,
        record: &R,
        template: Option<NodeHandle>,
        name_prefix: &str,
    ) -> Result<NodeHandle>
    where
        G: NodeGraph,
        R: TrackableRecord,
    {
        let id = record.trackable_id();
        let parent_id = record.parent_id();
        assert!(id.is_valid(), "record carries the invalid trackable id");
        assert_ne!(
            id, parent_id,
            "trackable {id} declares itself as its own parent"
        );

        let key = TrackableKey::new(id, kind);

        // Update path: pose and payload only, no structural change.
        if let Some(entry) = self.entry_mut_by_key(key) {
            entry.session_pose = record.session_pose();
            let node = entry.node;
            self.apply_trackable_pose(graph, key);
            return Ok(node);
        }

        // Create path.
        if !graph.contains(self.origin.root()) {
            return Err(TrackableError::DeadOriginRoot);
        }

        let name = format!("{name_prefix} {id}");
        let node = match template {
            Some(template) => graph.instantiate(template, &name)?,
            None => graph.create_node(&name),
        };

        // Kept inactive until fully set up and linked.
        graph.set_active(node, false);
        graph.set_parent(node, Some(self.origin.root()));
        graph.set_world_pose(node, self.origin.to_world(&record.session_pose()));

        let mut entry = self.entry_pool.acquire();
        entry.bind(node, id, kind, record.session_pose());
        self.register_entry(entry);

        self.resolve_parent(graph, key, node, parent_id);
        self.resolve_orphans_waiting_on(graph, key, node);

        graph.set_active(node, true);
        log::trace!("created trackable {key:?}");
        Ok(node)
    }

    // ========================================================================
    // Registration & lookup
    // ========================================================================

    /// Adds the entry to its per-id list, creating the list from the pool
    /// when this is the first entry for the id.
    ///
    /// # Panics
    ///
    /// Duplicate registration of the same (id, kind) pair is a logic
    /// error and asserts.
    fn register_entry(&mut self, entry: TrackableEntry) {
        let list = self
            .entries_by_id
            .entry(entry.id)
            .or_insert_with(|| self.entry_list_pool.acquire());
        assert!(
            list.iter().all(|e| e.kind != entry.kind),
            "duplicate registration for {:?}",
            entry.key()
        );
        list.push(entry);
    }

    /// O(1) average lookup of the node registered under an exact
    /// (id, kind) key.
    #[must_use]
    pub fn trackable_by_key(&self, key: TrackableKey) -> Option<NodeHandle> {
        self.entry_by_key(key).map(|e| e.node)
    }

    /// Read access to the bookkeeping entry for a key.
    #[must_use]
    pub fn entry_by_key(&self, key: TrackableKey) -> Option<&TrackableEntry> {
        self.entries_by_id
            .get(&key.id)?
            .iter()
            .find(|e| e.kind == key.kind)
    }

    fn entry_mut_by_key(&mut self, key: TrackableKey) -> Option<&mut TrackableEntry> {
        self.entries_by_id
            .get_mut(&key.id)?
            .iter_mut()
            .find(|e| e.kind == key.kind)
    }

    /// Reverse lookup used when the engine reports a destroyed node by
    /// handle rather than by key. Linear in the number of entries.
    #[must_use]
    pub fn find_key_by_node(&self, node: NodeHandle) -> Option<TrackableKey> {
        self.entries_by_id
            .values()
            .flat_map(|list| list.iter())
            .find(|e| e.node == node)
            .map(TrackableEntry::key)
    }

    /// Total number of live entries across all ids.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries_by_id.values().map(Vec::len).sum()
    }

    /// True while some child is still waiting on a parent id. The batch
    /// entry point clears this via placeholder synthesis at batch end;
    /// single-record ingestion leaves orphans pending across calls until
    /// the parent arrives or a batch ends.
    #[must_use]
    pub fn has_pending_orphans(&self) -> bool {
        !self.orphans_by_missing_parent.is_empty()
    }

    // ========================================================================
    // Parent & orphan resolution
    // ========================================================================

    /// Finds the closest matching entry for a parent id: an exact
    /// (id, kind) match wins, otherwise any entry sharing the id. The
    /// fallback exists because a record's parent id may reference a
    /// trackable of a different kind than the child.
    fn closest_entry(
        &self,
        id: TrackableId,
        kind: TrackableKind,
    ) -> Option<(TrackableKey, NodeHandle)> {
        let list = self.entries_by_id.get(&id)?;
        let entry = list.iter().find(|e| e.kind == kind).or_else(|| list.first())?;
        Some((entry.key(), entry.node))
    }

    /// Links a newly registered entry to its parent, or parks it in the
    /// orphan map when the parent id has not been seen yet.
    fn resolve_parent<G: NodeGraph>(
        &mut self,
        graph: &mut G,
        child_key: TrackableKey,
        child_node: NodeHandle,
        parent_id: TrackableId,
    ) {
        if !parent_id.is_valid() {
            return; // root trackable
        }

        if let Some((parent_key, parent_node)) = self.closest_entry(parent_id, child_key.kind) {
            attach_preserving_world(graph, child_node, parent_node);
            if let Some(child) = self.entry_mut_by_key(child_key) {
                child.parent_key = Some(parent_key);
                child.awaiting_parent = None;
            }
            if let Some(parent) = self.entry_mut_by_key(parent_key) {
                parent.child_keys.push(child_key);
            }
        } else {
            if let Some(child) = self.entry_mut_by_key(child_key) {
                child.awaiting_parent = Some(parent_id);
            }
            self.orphans_by_missing_parent
                .entry(parent_id)
                .or_insert_with(|| self.orphan_list_pool.acquire())
                .push(child_key);
            log::trace!("trackable {child_key:?} orphaned, waiting on parent {parent_id}");
        }
    }

    /// Adopts every orphan waiting on the id of a newly created entry and
    /// releases the drained orphan list back to its pool.
    fn resolve_orphans_waiting_on<G: NodeGraph>(
        &mut self,
        graph: &mut G,
        parent_key: TrackableKey,
        parent_node: NodeHandle,
    ) {
        let Some(mut waiting) = self.orphans_by_missing_parent.remove(&parent_key.id) else {
            return;
        };

        for child_key in waiting.drain(..) {
            let Some(child) = self.entry_mut_by_key(child_key) else {
                continue; // orphan destroyed before its parent arrived
            };
            let child_node = child.node;
            child.parent_key = Some(parent_key);
            child.awaiting_parent = None;

            attach_preserving_world(graph, child_node, parent_node);

            if let Some(parent) = self.entry_mut_by_key(parent_key) {
                parent.child_keys.push(child_key);
            }
        }

        self.orphan_list_pool.release(waiting);
    }

    /// Synthesizes a minimal placeholder node for every parent id still
    /// missing after a batch, and attaches its waiting orphans.
    ///
    /// Placeholders register under [`TrackableKind::None`] with an
    /// identity session pose; they persist until the engine destroys them
    /// and are never upgraded into real trackables.
    fn synthesize_placeholder_parents<G: NodeGraph>(&mut self, graph: &mut G, name_prefix: &str) {
        if self.orphans_by_missing_parent.is_empty() {
            return;
        }

        // Collect first: resolving mutates the orphan map.
        let missing: Vec<TrackableId> = self.orphans_by_missing_parent.keys().copied().collect();

        for id in missing {
            log::debug!("synthesizing placeholder parent for {id}");

            let node = graph.create_node(&format!("{name_prefix} placeholder {id}"));
            graph.set_active(node, false);
            graph.set_parent(node, Some(self.origin.root()));
            graph.set_world_pose(node, self.origin.to_world(&Pose::IDENTITY));

            let key = TrackableKey::new(id, TrackableKind::None);
            let mut entry = self.entry_pool.acquire();
            entry.bind(node, id, TrackableKind::None, Pose::IDENTITY);
            self.register_entry(entry);

            self.resolve_orphans_waiting_on(graph, key, node);
            graph.set_active(node, true);
        }
    }

    // ========================================================================
    // Pose propagation
    // ========================================================================

    /// Applies the entry's stored session pose to its node in world space.
    ///
    /// Children of the node store poses relative to it, but their logical
    /// (session-relative) poses did not change, so moving the node must
    /// not visually move them. Reparenting preserves local poses, hence
    /// the two-phase move: park every trackable child at the trackables
    /// root (world pose restored), move the node, reattach the children
    /// (world pose restored again). Child handles are collected up front
    /// so no list is mutated while it is being walked.
    fn apply_trackable_pose<G: NodeGraph>(&mut self, graph: &mut G, key: TrackableKey) {
        let (node, session_pose, child_keys) = {
            let Some(entry) = self.entry_by_key(key) else {
                return;
            };
            (entry.node, entry.session_pose, entry.child_keys.clone())
        };

        let world = self.origin.to_world(&session_pose);

        if child_keys.is_empty() {
            graph.set_world_pose(node, world);
            return;
        }

        let mut parked = std::mem::take(&mut self.scratch_nodes);
        parked.extend(child_keys.iter().filter_map(|k| self.trackable_by_key(*k)));

        let root = self.origin.root();
        for &child in &parked {
            attach_preserving_world(graph, child, root);
        }
        graph.set_world_pose(node, world);
        for &child in &parked {
            attach_preserving_world(graph, child, node);
        }

        parked.clear();
        self.scratch_nodes = parked;
    }

    /// Adopts a new origin: parentless entries are re-rooted under the new
    /// trackables root and re-posed from their stored session poses.
    /// Entries with a resolved parent stay attached; their world poses
    /// move implicitly with their ancestors.
    pub fn on_origin_changed<G: NodeGraph>(&mut self, graph: &mut G, origin: Origin) {
        self.origin = origin;

        // Collect, then apply: never reparent while walking the entry map.
        let mut unparented: Vec<(NodeHandle, Pose)> = Vec::new();
        for list in self.entries_by_id.values() {
            for entry in list {
                if entry.parent_key.is_none() {
                    unparented.push((entry.node, entry.session_pose));
                }
            }
        }

        for (node, session_pose) in unparented {
            graph.set_parent(node, Some(origin.root()));
            graph.set_world_pose(node, origin.to_world(&session_pose));
        }
    }

    // ========================================================================
    // Destruction
    // ========================================================================

    /// Removes all bookkeeping for a destroyed trackable.
    ///
    /// The engine owns node destruction and guarantees this notification
    /// fires for every destroyed trackable node. A parent entry that was
    /// destroyed in the same pass may already be gone when its child's
    /// notification arrives; that is expected and tolerated. Children of
    /// the destroyed node are not rescued: the engine destroys the whole
    /// subtree and each child reports its own destruction.
    pub fn on_trackable_destroyed(&mut self, key: TrackableKey) {
        let Some(list) = self.entries_by_id.get_mut(&key.id) else {
            log::warn!("destroy notification for unknown trackable {key:?}");
            return;
        };
        let Some(index) = list.iter().position(|e| e.kind == key.kind) else {
            log::warn!("destroy notification for unknown trackable {key:?}");
            return;
        };

        let entry = list.remove(index);
        if list.is_empty() {
            // Invariant: no empty list stays in the map.
            if let Some(list) = self.entries_by_id.remove(&key.id) {
                self.entry_list_pool.release(list);
            }
        }

        // Detach from the parent's child list, tolerating a parent that
        // was destroyed first.
        if let Some(parent_key) = entry.parent_key {
            if let Some(parent) = self.entry_mut_by_key(parent_key) {
                if let Some(i) = parent.child_keys.iter().position(|&k| k == key) {
                    parent.child_keys.remove(i);
                }
            }
        }

        // An orphan destroyed before its parent ever arrived must leave
        // the orphan map too.
        if let Some(parent_id) = entry.awaiting_parent {
            if let Some(bucket) = self.orphans_by_missing_parent.get_mut(&parent_id) {
                if let Some(i) = bucket.iter().position(|&k| k == key) {
                    bucket.remove(i);
                }
                if bucket.is_empty() {
                    if let Some(bucket) = self.orphans_by_missing_parent.remove(&parent_id) {
                        self.orphan_list_pool.release(bucket);
                    }
                }
            }
        }

        self.entry_pool.release(entry);
    }
}

/// Reparents `child` under `parent` while keeping its world pose fixed.
///
/// `set_parent` preserves the local pose, so the world pose is captured
/// before the move and restored after it.
fn attach_preserving_world<G: NodeGraph>(graph: &mut G, child: NodeHandle, parent: NodeHandle) {
    let world = graph.world_pose(child);
    graph.set_parent(child, Some(parent));
    if let Some(world) = world {
        graph.set_world_pose(child, world);
    }
}
