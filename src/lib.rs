//! Blocking synchronization building blocks for multi-threaded programs.
//!
//! This library contains the following primitives:
//!
//! * [`Barrier`], a rendezvous point that holds a fixed number of threads until all of them have
//!   arrived, and which the same threads can go through again and again.
//! * [`OrderedList`], a sorted set of unique values backed by a linked list with a lock on every
//!   node, so that threads working on different parts of the list don't wait on each other.
//!   Changes to an `OrderedList` can be watched with a [`ListObserver`].
//!
//! Both primitives block the calling thread rather than spin, and neither can fail at runtime:
//! the only error this crate reports is asking for a barrier with room for zero threads.
//!
//! Both emit `trace!`-level messages through the [`log`] facade when their state changes. The
//! crate never installs a logger itself.
//!
//! [`Barrier`]: struct.Barrier.html
//! [`OrderedList`]: struct.OrderedList.html
//! [`ListObserver`]: trait.ListObserver.html
//! [`log`]: https://docs.rs/log

#![deny(warnings, missing_docs)]

mod util;
mod gate;

pub mod barrier;
pub mod list;
pub mod observer;

pub use barrier::{Barrier, BarrierError};
pub use list::OrderedList;
pub use observer::ListObserver;
