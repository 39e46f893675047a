//! Support module for `OrderedList`.
//!
//! See the documentation of the [`OrderedList`] struct for more information.
//!
//! [`OrderedList`]: struct.OrderedList.html

use std::fmt;
use std::mem;
use std::sync::Arc;
use std::sync::Mutex as CounterLock;

use log::trace;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};

use crate::observer::ListObserver;
use crate::util;

type Node<T> = Arc<Mutex<Entry<T>>>;
type Guard<T> = ArcMutexGuard<RawMutex, Entry<T>>;

// The contents of one node, behind that node's lock. The sentinel at the head of the chain is
// the only entry with a `None` value, which also sorts it below every real value.
struct Entry<T> {
    value: Option<T>,
    next: Option<Node<T>>,
}

/// A thread-safe sorted set, stored as a singly linked list with one lock per node.
///
/// `OrderedList` keeps its elements in ascending order, and never holds two equal elements. It
/// can be shared between threads (for example with an `Arc`), and all its operations take
/// `&self`.
///
/// Instead of putting the whole list behind one lock, every node has its own lock, and
/// operations walk the list with *lock coupling* (also called hand-over-hand locking): a thread
/// holds the locks of two neighboring nodes at a time, and only lets go of the one behind it
/// after it has locked the one ahead. A node can only be linked in or unlinked while both it and
/// its predecessor are locked, so a walking thread never steps onto a node that is being taken
/// out, nor skips over one that is being put in. Threads working on different parts of the list
/// don't block each other, and since every thread takes locks in the same head-to-tail order,
/// they can't deadlock.
///
/// The element count is kept behind a separate lock that is never held during a walk. Reading
/// it with `size` never waits on the node locks, but may not yet reflect an insertion or removal
/// that is still in progress on another thread.
///
/// # Example
///
/// ```
/// use lockstep::OrderedList;
/// use std::sync::Arc;
/// use std::thread;
///
/// let list = Arc::new(OrderedList::new());
///
/// let handles: Vec<_> = (0..4u32).map(|t| {
///     let list = list.clone();
///     thread::spawn(move || {
///         for i in 0..25 {
///             assert!(list.insert(i * 4 + t));
///         }
///     })
/// }).collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(list.size(), 100);
/// assert_eq!(list.to_vec(), (0..100).collect::<Vec<_>>());
/// ```
pub struct OrderedList<T> {
    head: Node<T>,
    size: CounterLock<usize>,
    observer: Option<Box<dyn ListObserver<T>>>,
}

fn lock_next<T>(entry: &Guard<T>) -> Option<Guard<T>> {
    entry.next.as_ref().map(|node| node.lock_arc())
}

impl<T> OrderedList<T> {
    /// Creates a new, empty `OrderedList`.
    pub fn new() -> OrderedList<T> {
        OrderedList::with_boxed_observer(None)
    }

    fn with_boxed_observer(observer: Option<Box<dyn ListObserver<T>>>) -> OrderedList<T> {
        OrderedList {
            head: Arc::new(Mutex::new(Entry {
                value: None,
                next: None,
            })),
            size: CounterLock::new(0),
            observer: observer,
        }
    }

    /// Creates a new, empty `OrderedList` that reports its changes to the given observer.
    ///
    /// See [`ListObserver`] for details on when the observer is called.
    ///
    /// [`ListObserver`]: crate::ListObserver
    pub fn with_observer<O>(observer: O) -> OrderedList<T>
        where O: ListObserver<T> + 'static
    {
        OrderedList::with_boxed_observer(Some(Box::new(observer)))
    }

    /// Returns the number of elements in the list.
    ///
    /// The count was accurate at some point during the call. If other threads are inserting or
    /// removing at the same time, it may already be out of date when this returns.
    pub fn size(&self) -> usize {
        *util::guts(self.size.lock())
    }

    /// Returns whether the list has no elements. The same caveats as `size` apply.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn increment_size(&self) -> usize {
        let mut size = util::guts(self.size.lock());
        *size += 1;
        *size
    }

    fn decrement_size(&self) -> usize {
        let mut size = util::guts(self.size.lock());
        *size -= 1;
        *size
    }

    /// Walks the whole list hand over hand, calling `f` on every element in ascending order.
    ///
    /// `f` runs while the node holding its argument is locked, so it must not touch this list.
    fn for_each<F>(&self, mut f: F)
        where F: FnMut(&T)
    {
        let mut pred = self.head.lock_arc();

        while let Some(current) = lock_next(&pred) {
            if let Some(ref value) = current.value {
                f(value);
            }
            pred = current;
        }
    }

    /// Returns a copy of every element in the list, in ascending order.
    ///
    /// The walk only locks two nodes at a time, so while it's a consistent view of each position
    /// it passes, it isn't a snapshot of the whole list at one instant if other threads are
    /// modifying it concurrently.
    pub fn to_vec(&self) -> Vec<T>
        where T: Clone
    {
        let mut values = Vec::with_capacity(self.size());
        self.for_each(|value| values.push(value.clone()));
        values
    }
}

impl<T: Ord> OrderedList<T> {
    // Walks from the sentinel until the first element that isn't less than `value`, returning
    // that node (or `None` at the end of the list) and its predecessor, both still locked.
    fn find(&self, value: &T) -> (Guard<T>, Option<Guard<T>>) {
        let mut pred = self.head.lock_arc();
        let mut current = lock_next(&pred);

        while let Some(entry) = current.take() {
            if entry.value.as_ref() >= Some(value) {
                current = Some(entry);
                break;
            }

            // lock the next node before the assignment to `pred` unlocks the old one
            let next = lock_next(&entry);
            pred = entry;
            current = next;
        }

        (pred, current)
    }

    /// Adds `value` to the list, keeping the list in ascending order.
    ///
    /// Returns `true` if the value was added. If the list already holds an equal value, nothing
    /// is changed and this returns `false`.
    ///
    /// ```
    /// use lockstep::OrderedList;
    ///
    /// let list = OrderedList::new();
    /// assert!(list.insert(5));
    /// assert!(list.insert(1));
    /// assert!(list.insert(3));
    /// assert!(!list.insert(3));
    ///
    /// assert_eq!(list.to_vec(), vec![1, 3, 5]);
    /// assert_eq!(list.size(), 3);
    /// ```
    pub fn insert(&self, value: T) -> bool {
        let (mut pred, current) = self.find(&value);

        if let Some(ref entry) = current {
            if entry.value.as_ref() == Some(&value) {
                return false;
            }
        }

        let node = Arc::new(Mutex::new(Entry {
            value: Some(value),
            next: pred.next.take(),
        }));
        let inserted = node.lock_arc();
        pred.next = Some(node);

        let size = self.increment_size();
        trace!("linked a new node, list size is now {}", size);

        if let (Some(observer), Some(value)) = (self.observer.as_ref(), inserted.value.as_ref()) {
            observer.inserted(value);
        }

        true
    }

    /// Removes the element equal to `value` from the list.
    ///
    /// Returns `true` if an element was removed, or `false` if the list didn't hold one.
    ///
    /// ```
    /// use lockstep::OrderedList;
    ///
    /// let list = OrderedList::new();
    /// assert!(!list.remove(&7));
    ///
    /// list.insert(7);
    /// assert!(list.remove(&7));
    /// assert!(list.is_empty());
    /// ```
    pub fn remove(&self, value: &T) -> bool {
        let (mut pred, current) = self.find(value);

        let mut removed = match current {
            Some(entry) if entry.value.as_ref() == Some(value) => entry,
            _ => return false,
        };

        let unlinked = mem::replace(&mut pred.next, removed.next.take());

        let size = self.decrement_size();
        trace!("unlinked a node, list size is now {}", size);

        if let Some(observer) = self.observer.as_ref() {
            observer.removed(value);
        }

        // unlock both neighbors before freeing the node
        drop(removed);
        drop(pred);
        drop(unlinked);

        true
    }

    /// Returns whether the list holds an element equal to `value`.
    ///
    /// ```
    /// use lockstep::OrderedList;
    ///
    /// let list = OrderedList::new();
    /// list.insert("b");
    ///
    /// assert!(list.contains(&"b"));
    /// assert!(!list.contains(&"a"));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        let (_pred, current) = self.find(value);

        match current {
            Some(entry) => entry.value.as_ref() == Some(value),
            None => false,
        }
    }
}

impl<T> Default for OrderedList<T> {
    fn default() -> OrderedList<T> {
        OrderedList::new()
    }
}

// Unlinks the chain one node at a time, so that dropping a long list doesn't recurse through
// every `next` link.
impl<T> Drop for OrderedList<T> {
    fn drop(&mut self) {
        let mut next = self.head.lock().next.take();

        while let Some(node) = next {
            next = match Arc::try_unwrap(node) {
                Ok(entry) => entry.into_inner().next,
                // someone else still owns this node and everything after it
                Err(_) => None,
            };
        }
    }
}

/// Prints the elements in ascending order.
///
/// A single element is printed as-is. When there are more, each one is right-aligned in a field
/// three characters wide and followed by a space. An empty list prints nothing.
///
/// ```
/// use lockstep::OrderedList;
///
/// let list = OrderedList::new();
/// assert_eq!(list.to_string(), "");
///
/// list.insert(12);
/// assert_eq!(list.to_string(), "12");
///
/// list.insert(5);
/// list.insert(100);
/// assert_eq!(list.to_string(), "  5  12 100 ");
/// ```
impl<T: fmt::Display> fmt::Display for OrderedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut rendered = Vec::new();
        self.for_each(|value| rendered.push(value.to_string()));

        if rendered.len() == 1 {
            return f.write_str(&rendered[0]);
        }

        for value in rendered {
            write!(f, "{:>3} ", value)?;
        }

        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut set = f.debug_set();
        self.for_each(|value| {
            set.entry(value);
        });
        set.finish()
    }
}
