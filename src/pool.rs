//! Bounded free-list object pool.
//!
//! The spawner churns through three kinds of bookkeeping objects every
//! frame (entries, per-id entry lists, orphan lists). Pooling them keeps
//! steady-state allocation flat: `acquire` reuses a freed object when one
//! is available, `release` resets the object and retains it up to
//! `max_size`. Overflow is simply dropped instead of erroring.
//!
//! Pools are not thread-safe and must stay on the update-loop thread.

/// A type that can be recycled through a [`Pool`].
pub trait Poolable: Default {
    /// Restores the object to a state indistinguishable from a freshly
    /// constructed one. Must be idempotent.
    fn reset(&mut self);
}

impl<T> Poolable for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

pub struct Pool<T: Poolable> {
    free: Vec<T>,
    max_size: usize,
}

impl<T: Poolable> Pool<T> {
    /// Creates a pool that pre-reserves `default_capacity` slots and
    /// retains at most `max_size` freed objects.
    #[must_use]
    pub fn new(default_capacity: usize, max_size: usize) -> Self {
        Self {
            free: Vec::with_capacity(default_capacity),
            max_size,
        }
    }

    /// Takes an object from the free list, or constructs a fresh one when
    /// the pool is empty.
    pub fn acquire(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    /// Resets the object and returns it to the free list. Once the pool
    /// holds `max_size` objects, further releases are dropped.
    pub fn release(&mut self, mut object: T) {
        object.reset();
        if self.free.len() < self.max_size {
            self.free.push(object);
        }
    }

    /// Drops every retained object. Part of full lifecycle teardown.
    pub fn clear(&mut self) {
        self.free.clear();
    }

    /// Number of objects currently waiting for reuse.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}
