//! Checked-out resource handles and their reclamation drop path.

use std::ops::Deref;
use std::process;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::trace;

use crate::manage::Manage;
use crate::pool::Pool;

/// Shared-ownership reference to one pooled resource.
///
/// Cloning a handle aliases the same resource; the resource is reclaimed
/// exactly once, when the last clone is dropped. At that point it is handed
/// back to the pool the handle is attached to, or destroyed in place when
/// that pool no longer exists, the handle was detached, or the resource
/// fails the validity hook.
///
/// A handle only gives shared access to the resource (`Deref`). Resources
/// that need mutation between uses should carry their own interior
/// mutability.
pub struct Handle<M: Manage> {
    core: Arc<HandleCore<M>>,
}

struct HandleCore<M: Manage> {
    /// `Some` until the core's own drop takes it.
    resource: Option<M::Resource>,
    /// Reclamation binding: which pool, if any, the resource returns to.
    binding: Mutex<Weak<Pool<M>>>,
}

impl<M: Manage> Handle<M> {
    pub(crate) fn attached(resource: M::Resource, pool: &Arc<Pool<M>>) -> Self {
        Self {
            core: Arc::new(HandleCore {
                resource: Some(resource),
                binding: Mutex::new(Arc::downgrade(pool)),
            }),
        }
    }

    /// Rebind this handle, and every clone of it, to `pool`.
    ///
    /// Rarely needed; the use case is moving a checked-out resource between
    /// pools of the same manager type.
    pub fn attach(&self, pool: &Arc<Pool<M>>) {
        *self.core.binding.lock() = Arc::downgrade(pool);
    }

    /// Unbind this handle, and every clone of it, from its pool.
    ///
    /// The resource is then destroyed, not returned, when the last clone
    /// drops.
    pub fn detach(&self) {
        *self.core.binding.lock() = Weak::new();
    }

    /// The pool this handle is attached to, if it still exists.
    #[must_use]
    pub fn pool(&self) -> Option<Arc<Pool<M>>> {
        self.core.binding.lock().upgrade()
    }
}

impl<M: Manage> Clone for Handle<M> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<M: Manage> Deref for Handle<M> {
    type Target = M::Resource;

    fn deref(&self) -> &M::Resource {
        // present for as long as any clone is alive
        self.core.resource.as_ref().unwrap()
    }
}

impl<M: Manage> AsRef<M::Resource> for Handle<M> {
    fn as_ref(&self) -> &M::Resource {
        self
    }
}

impl<M: Manage> Drop for HandleCore<M> {
    fn drop(&mut self) {
        // Move the resource into a local owner first: every exit path below
        // destroys it exactly once.
        let Some(resource) = self.resource.take() else {
            return;
        };
        if let Some(pool) = self.binding.get_mut().upgrade() {
            // No caller exists to observe a failure here. A panic out of the
            // validity hook or the idle-list push would otherwise unwind
            // through this destructor; abort instead.
            let guard = AbortOnUnwind;
            pool.reclaim(resource);
            std::mem::forget(guard);
        } else {
            trace!("pool gone, destroying released resource");
            drop(resource);
        }
    }
}

struct AbortOnUnwind;

impl Drop for AbortOnUnwind {
    fn drop(&mut self) {
        process::abort();
    }
}
