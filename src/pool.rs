//! The pool itself: idle storage, lock discipline, and the borrow,
//! create, and sweep operations.
//!
//! The idle list holds plain resource values, not handles. Dropping the
//! list (pool teardown, `clear`, the invalid half of a `sweep`) therefore
//! just drops resources and can never re-enter the reclamation path.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::handle::Handle;
use crate::manage::Manage;

/// A pool of resting, reusable resources.
///
/// Pools are only handed out behind [`Arc`]: the operations that mint
/// handles take `self: &Arc<Self>`, which is where each checked-out handle
/// gets its weak back-reference from. Outstanding handles never extend the
/// pool's lifetime; once the last `Arc` is gone, releasing a handle simply
/// destroys its resource.
///
/// The mutex guarding the idle list is held only for the list manipulation
/// itself, never across `construct`, the validity hook on the borrow and
/// release paths, or resource destruction. A slow hook in one thread costs
/// other threads no more than the O(1) pop or push.
pub struct Pool<M: Manage> {
    manager: M,
    idle: Mutex<Vec<M::Resource>>,
}

impl<M: Manage> Pool<M> {
    /// Create an empty pool around the given hooks.
    pub fn new(manager: M) -> Arc<Self> {
        Arc::new(Self {
            manager,
            idle: Mutex::new(Vec::new()),
        })
    }

    /// The hooks this pool was built with.
    #[must_use]
    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Construct a fresh resource and return it as an attached handle.
    ///
    /// Never touches the idle list: the result is guaranteed not to be a
    /// reused instance. A construction failure propagates to the caller
    /// with no pool state mutated.
    pub fn create(self: &Arc<Self>) -> Result<Handle<M>, M::Error> {
        let resource = self.manager.construct()?;
        trace!("constructed a fresh resource");
        Ok(Handle::attached(resource, self))
    }

    /// Borrow a resource, reusing a resting one when possible.
    ///
    /// Candidates are popped most-recently-released first and validated
    /// outside the lock; invalid ones are dropped and the next is tried.
    /// When the idle list runs out, falls through to [`Pool::create`].
    pub fn borrow(self: &Arc<Self>) -> Result<Handle<M>, M::Error> {
        while let Some(resource) = self.pop_idle() {
            if self.manager.is_valid(&resource) {
                trace!("reusing a resting resource");
                return Ok(Handle::attached(resource, self));
            }
            trace!("dropping an invalid resting resource");
            drop(resource);
        }
        self.create()
    }

    fn pop_idle(&self) -> Option<M::Resource> {
        self.idle.lock().pop()
    }

    /// Take back a released resource. Reachable only from a handle's drop
    /// path, which has armed an abort guard: nothing here may unwind.
    pub(crate) fn reclaim(&self, resource: M::Resource) {
        if self.manager.is_valid(&resource) {
            trace!("returning a released resource to the idle list");
            self.idle.lock().push(resource);
        } else {
            trace!("dropping an invalid released resource");
            drop(resource);
        }
    }

    /// Drop every resting resource that no longer validates.
    ///
    /// The idle list is partitioned under the lock, preserving the order of
    /// the surviving entries; the invalid ones are destroyed only after the
    /// lock is released, so an expensive destructor never stalls other
    /// threads' pool operations.
    ///
    /// The pool never schedules this itself. If resources can go stale
    /// while resting, call it periodically; otherwise there is no need.
    pub fn sweep(&self) {
        let swept = {
            let mut idle = self.idle.lock();
            let resting = std::mem::take(&mut *idle);
            let (valid, invalid): (Vec<_>, Vec<_>) = resting
                .into_iter()
                .partition(|resource| self.manager.is_valid(resource));
            *idle = valid;
            invalid
        };
        if !swept.is_empty() {
            trace!(count = swept.len(), "swept invalid resting resources");
        }
        drop(swept);
    }

    /// Drop every resting resource, valid or not.
    ///
    /// Outstanding handles are unaffected. Destruction happens after the
    /// lock is released, like [`Pool::sweep`].
    pub fn clear(&self) {
        let drained = std::mem::take(&mut *self.idle.lock());
        drop(drained);
    }

    /// Number of resources currently resting in the pool.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }
}
