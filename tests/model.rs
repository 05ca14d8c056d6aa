//! Randomized op sequences checked against a plain-Vec model of the
//! idle stack.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;

use repool::{Handle, Manage, Pool};

struct Serial {
    built: AtomicUsize,
    stale_below: AtomicUsize,
}

impl Manage for Serial {
    type Resource = usize;
    type Error = Infallible;

    fn construct(&self) -> Result<usize, Infallible> {
        Ok(self.built.fetch_add(1, Ordering::SeqCst))
    }

    fn is_valid(&self, serial: &usize) -> bool {
        *serial >= self.stale_below.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
enum Op {
    /// Borrow a handle and keep it outstanding.
    Borrow,
    /// Release one of the outstanding handles (index modulo their count).
    Release(usize),
    /// Invalidate every instance constructed so far.
    MarkStale,
    /// Evict invalid resting instances.
    Sweep,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Borrow),
        3 => any::<usize>().prop_map(Op::Release),
        1 => Just(Op::MarkStale),
        1 => Just(Op::Sweep),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The idle list's content and LIFO order always match a
    /// straightforward single-threaded model.
    #[test]
    fn idle_list_matches_model(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let pool = Pool::new(Serial {
            built: AtomicUsize::new(0),
            stale_below: AtomicUsize::new(0),
        });
        let mut outstanding: Vec<Handle<Serial>> = Vec::new();
        let mut model_idle: Vec<usize> = Vec::new();
        let mut model_next = 0usize;
        let mut stale_below = 0usize;

        for op in ops {
            match op {
                Op::Borrow => {
                    let expected = loop {
                        match model_idle.pop() {
                            Some(serial) if serial >= stale_below => break serial,
                            Some(_stale) => {}
                            None => {
                                let serial = model_next;
                                model_next += 1;
                                break serial;
                            }
                        }
                    };
                    let handle = pool.borrow().unwrap();
                    prop_assert_eq!(*handle, expected);
                    outstanding.push(handle);
                }
                Op::Release(raw) => {
                    if outstanding.is_empty() {
                        continue;
                    }
                    let handle = outstanding.remove(raw % outstanding.len());
                    let serial = *handle;
                    drop(handle);
                    if serial >= stale_below {
                        model_idle.push(serial);
                    }
                }
                Op::MarkStale => {
                    stale_below = model_next;
                    pool.manager().stale_below.store(stale_below, Ordering::SeqCst);
                }
                Op::Sweep => {
                    pool.sweep();
                    model_idle.retain(|serial| *serial >= stale_below);
                }
            }
            prop_assert_eq!(pool.idle_count(), model_idle.len());
        }

        // drain what rests and compare against the model stack, top first
        pool.sweep();
        model_idle.retain(|serial| *serial >= stale_below);
        prop_assert_eq!(pool.idle_count(), model_idle.len());
        while let Some(expected) = model_idle.pop() {
            let handle = pool.borrow().unwrap();
            prop_assert_eq!(*handle, expected);
            handle.detach(); // destroyed on drop, not pushed back
        }
        prop_assert_eq!(pool.idle_count(), 0);
    }
}
