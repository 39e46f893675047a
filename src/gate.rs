//! A counting signal that parks threads until a permit is available.
//!
//! `Gate` is the building block for the entrance and exit phases of [`Barrier`]. It keeps a
//! number of permits, and a queue of thread handles that are waiting for one.
//!
//! [`Barrier`]: crate::Barrier

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_queue::SegQueue;

/// A counting signal: `release(n)` hands out `n` permits, and each `acquire` consumes one,
/// blocking until there's one to take.
pub struct Gate {
    permits: AtomicUsize,
    waiting: SegQueue<thread::Thread>,
}

impl Gate {
    /// Creates a new `Gate` with no permits, so that every `acquire` blocks until a `release`.
    pub fn new() -> Gate {
        Gate {
            permits: AtomicUsize::new(0),
            waiting: SegQueue::new(),
        }
    }

    /// Returns the number of permits that haven't been taken yet.
    pub fn permits(&self) -> usize {
        self.permits.load(Ordering::SeqCst)
    }

    /// Adds `count` permits to the gate, and wakes up every thread currently waiting on it.
    ///
    /// Handles in the queue may be stale (from threads that took a permit without parking), so
    /// there's no telling which waiters will actually get a permit. Any thread that loses the race
    /// for one just parks again.
    pub fn release(&self, count: usize) {
        if count == 0 {
            return;
        }

        self.permits.fetch_add(count, Ordering::SeqCst);

        while let Some(thread) = self.waiting.pop() {
            thread.unpark();
        }
    }

    /// Takes one permit if one is available, returning whether it did. Never blocks.
    pub fn try_acquire(&self) -> bool {
        let mut current = self.permits();

        while current > 0 {
            match self.permits.compare_exchange_weak(current,
                                                     current - 1,
                                                     Ordering::SeqCst,
                                                     Ordering::SeqCst) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }

        false
    }

    /// Blocks the current thread until it can take a permit from the gate.
    pub fn acquire(&self) {
        loop {
            // queue the handle before every check: if `release` drains the queue between a check
            // and a push, we'd park with nobody left to wake us. with the handle already queued,
            // the worst case is an unpark token that makes the `park` below return right away.
            self.waiting.push(thread::current());

            if self.try_acquire() {
                return;
            }

            thread::park();
        }
    }
}
