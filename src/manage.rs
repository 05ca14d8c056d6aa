//! Extension points supplied by the integrator.

/// Factory and validity hooks for a concrete pool.
///
/// The pool treats the resource as opaque: it only ever constructs one,
/// asks whether one may still be reused, and drops one. Anything else
/// (resetting state between uses, closing connections on drop) belongs in
/// the resource type itself.
pub trait Manage: Send + Sync + 'static {
    /// The pooled resource.
    type Resource: Send + 'static;

    /// Error returned when construction fails. Propagated verbatim by
    /// [`Pool::create`](crate::Pool::create) and
    /// [`Pool::borrow`](crate::Pool::borrow).
    type Error;

    /// Construct a fresh resource.
    fn construct(&self) -> Result<Self::Resource, Self::Error>;

    /// Whether a resting or returning resource may still be reused.
    ///
    /// Called when a candidate is popped during a borrow, when a released
    /// resource attempts to re-enter the idle list, and during a sweep.
    /// A `false` result silently discards the resource; it is never an
    /// error. The default accepts everything.
    fn is_valid(&self, _resource: &Self::Resource) -> bool {
        true
    }
}
