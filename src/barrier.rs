//! Support module for `Barrier` and its error type.
//!
//! See the documentation of the [`Barrier`] struct for more information.
//!
//! [`Barrier`]: struct.Barrier.html

use std::error::Error;
use std::fmt;
use std::sync::Mutex;

use log::{debug, trace};

use crate::gate::Gate;
use crate::util;

/// A reusable rendezvous point for a fixed group of threads.
///
/// A `Barrier` is created for a given number of threads, its *capacity*. Each call to `wait`
/// blocks until `capacity` threads have called it, at which point all of them are released
/// together. Once released, the same threads can immediately call `wait` again to meet at the
/// next rendezvous, without resetting anything.
///
/// Passing a barrier happens in two phases. A thread first goes through the *entrance* phase,
/// which opens once every thread has arrived. It then goes through the *exit* phase, which opens
/// once every thread has passed the entrance and started to leave. The exit phase is what makes
/// reuse safe: a fast thread that loops around to `wait` again can't get into the next cycle
/// while a slow thread is still counted as inside the current one.
///
/// # Preconditions
///
/// Exactly `capacity` threads must call `wait` in each cycle. If fewer threads call it, all of
/// them block forever. If more threads call it, the behavior of the barrier is unspecified: it
/// won't corrupt memory, but extra threads may be released in the wrong cycle or hang.
///
/// # Example
///
/// ```
/// use lockstep::Barrier;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::thread;
///
/// let thread_count = 4;
/// let barrier = Arc::new(Barrier::new(thread_count));
/// let phase_one = Arc::new(AtomicUsize::new(0));
///
/// let handles: Vec<_> = (0..thread_count).map(|_| {
///     let barrier = barrier.clone();
///     let phase_one = phase_one.clone();
///     thread::spawn(move || {
///         phase_one.fetch_add(1, Ordering::SeqCst);
///         barrier.wait();
///         // nobody gets here before everyone has finished phase one
///         assert_eq!(phase_one.load(Ordering::SeqCst), thread_count);
///         barrier.wait();
///     })
/// }).collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// ```
pub struct Barrier {
    capacity: usize,
    arrived: Mutex<usize>,
    entrance: Gate,
    exit: Gate,
}

/// The collection of errors that can be returned when creating a [`Barrier`].
///
/// [`Barrier`]: struct.Barrier.html
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BarrierError {
    /// Returned when asking for a barrier for zero threads, which could never be passed.
    ZeroCapacity,
}

impl fmt::Display for BarrierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BarrierError::ZeroCapacity => f.write_str("a barrier needs room for at least one thread"),
        }
    }
}

impl Error for BarrierError {}

impl Barrier {
    /// Creates a new `Barrier` that releases threads in groups of `capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`] for a non-panicking version.
    ///
    /// [`try_new`]: #method.try_new
    pub fn new(capacity: usize) -> Barrier {
        match Barrier::try_new(capacity) {
            Ok(barrier) => barrier,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a new `Barrier` that releases threads in groups of `capacity`.
    ///
    /// # Errors
    ///
    /// If `capacity` is zero, this function will return `BarrierError::ZeroCapacity`.
    ///
    /// ```
    /// use lockstep::{Barrier, BarrierError};
    ///
    /// assert_eq!(Barrier::try_new(0).unwrap_err(), BarrierError::ZeroCapacity);
    /// assert_eq!(Barrier::try_new(3).unwrap().capacity(), 3);
    /// ```
    pub fn try_new(capacity: usize) -> Result<Barrier, BarrierError> {
        if capacity == 0 {
            return Err(BarrierError::ZeroCapacity);
        }

        debug!("creating barrier for {} threads", capacity);

        Ok(Barrier {
            capacity: capacity,
            arrived: Mutex::new(0),
            entrance: Gate::new(),
            exit: Gate::new(),
        })
    }

    /// Returns the number of threads this barrier releases at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of threads currently inside the barrier: the ones that have called
    /// `wait` in this cycle and haven't yet reached the exit phase.
    ///
    /// Between cycles, this is zero.
    pub fn waiting(&self) -> usize {
        *util::guts(self.arrived.lock())
    }

    /// Blocks the current thread until `capacity` threads have called `wait`.
    ///
    /// After this returns, the barrier is ready for the next cycle. See the type-level docs for
    /// the preconditions on how many threads may call this.
    pub fn wait(&self) {
        self.enter();
        self.exit();
    }

    fn enter(&self) {
        {
            let mut arrived = util::guts(self.arrived.lock());
            *arrived += 1;

            if *arrived == self.capacity {
                trace!("all {} threads arrived, opening the entrance", self.capacity);
                self.entrance.release(self.capacity);
            }
        }

        self.entrance.acquire();
    }

    fn exit(&self) {
        {
            let mut arrived = util::guts(self.arrived.lock());
            *arrived -= 1;

            if *arrived == 0 {
                trace!("all {} threads passed the entrance, opening the exit", self.capacity);
                self.exit.release(self.capacity);
            }
        }

        self.exit.acquire();
    }
}

impl fmt::Debug for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Barrier")
         .field("capacity", &self.capacity)
         .field("waiting", &self.waiting())
         .finish()
    }
}
