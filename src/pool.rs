//! Formatter reuse.
//!
//! Every public entry point borrows a [`Formatter`](crate::state::Formatter)
//! from a [`Pool`] and returns it when done, so steady-state formatting does
//! not allocate a fresh buffer per call. The pool is an explicit object
//! rather than a bare free list; the crate keeps one default instance and
//! tests may construct their own.

use crate::state::Formatter;
use std::sync::Mutex;

/// Buffers that grew past this many bytes are not returned to the free list,
/// so a single huge render cannot pin memory for the rest of the process.
const MAX_RETAINED_BUF: usize = 64 * 1024;

/// Idle instances kept beyond this count are dropped.
const MAX_IDLE: usize = 32;

/// A thread-safe free list of formatter states.
pub(crate) struct Pool {
    free: Mutex<Vec<Formatter>>,
}

pub(crate) static DEFAULT_POOL: Pool = Pool::new();

impl Pool {
    pub(crate) const fn new() -> Self {
        Pool {
            free: Mutex::new(Vec::new()),
        }
    }

    fn list(&self) -> std::sync::MutexGuard<'_, Vec<Formatter>> {
        match self.free.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Hands out a cleared formatter, reusing a pooled instance when one is
    /// available.
    pub(crate) fn acquire(&self) -> Formatter {
        match self.list().pop() {
            Some(mut f) => {
                f.reset();
                f
            }
            None => Formatter::default(),
        }
    }

    /// Returns a formatter to the free list, subject to the retention caps.
    pub(crate) fn release(&self, f: Formatter) {
        if f.buf.capacity() > MAX_RETAINED_BUF {
            return;
        }
        let mut free = self.list();
        if free.len() < MAX_IDLE {
            free.push(f);
        }
    }
}
