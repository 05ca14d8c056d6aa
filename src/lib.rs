//! # repool
//!
//! A thread-safe pool of reusable resource instances.
//!
//! Callers borrow an instance and release it by dropping the handle. The drop
//! path returns the instance to the pool when the pool is still alive and the
//! instance still passes the validity hook, and destroys it otherwise.
//! Construction is always the fallback for an empty pool, so no operation
//! ever blocks waiting for an instance to become available.
//!
//! The most recently released instance is the first one offered to the next
//! borrow, which favors whatever warmth (caches, open connections) the
//! instance accumulated during its last use.
//!
//! ```
//! use std::convert::Infallible;
//! use repool::{Manage, Pool};
//!
//! struct Buffers;
//!
//! impl Manage for Buffers {
//!     type Resource = Vec<u8>;
//!     type Error = Infallible;
//!
//!     fn construct(&self) -> Result<Vec<u8>, Infallible> {
//!         Ok(Vec::with_capacity(4096))
//!     }
//! }
//!
//! let pool = Pool::new(Buffers);
//! let buf = pool.borrow().unwrap();
//! assert!(buf.capacity() >= 4096);
//! drop(buf); // back onto the idle list
//! assert_eq!(pool.idle_count(), 1);
//! ```

pub mod handle;
pub mod manage;
pub mod pool;

// Re-exports
pub use handle::Handle;
pub use manage::Manage;
pub use pool::Pool;
