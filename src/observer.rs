//! Instrumentation hooks for `OrderedList`.
//!
//! See the documentation of the [`ListObserver`] trait for more information.
//!
//! [`ListObserver`]: trait.ListObserver.html

/// Callbacks that an [`OrderedList`] invokes right after it changes.
///
/// Both methods are called while the list still holds the node locks around the change, which
/// makes an observer a convenient place to widen race windows in tests (by yielding or sleeping)
/// or to record the order in which concurrent mutations actually happened.
///
/// Since those locks are held, an observer must not call back into the list it's attached to:
/// any operation that walks past the changed position will wait on the locks the list is holding,
/// and never wake up. Observers also shouldn't block for long, as every traversal that needs to
/// pass that part of the list will be stuck behind them.
///
/// Both methods default to doing nothing, so an observer only needs to implement the hooks it
/// cares about.
///
/// # Example
///
/// ```
/// use lockstep::{ListObserver, OrderedList};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct CountInserts(Arc<AtomicUsize>);
///
/// impl ListObserver<u32> for CountInserts {
///     fn inserted(&self, _value: &u32) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let inserts = Arc::new(AtomicUsize::new(0));
/// let list = OrderedList::with_observer(CountInserts(inserts.clone()));
///
/// list.insert(3);
/// list.insert(3);
/// list.remove(&3);
///
/// // the duplicate insert didn't change anything, so it wasn't reported
/// assert_eq!(inserts.load(Ordering::SeqCst), 1);
/// ```
///
/// [`OrderedList`]: crate::OrderedList
pub trait ListObserver<T>: Send + Sync {
    /// Called after `value` has been linked into the list and the size has been updated.
    fn inserted(&self, _value: &T) {}

    /// Called after the node holding `value` has been unlinked from the list and the size has
    /// been updated.
    fn removed(&self, _value: &T) {}
}
