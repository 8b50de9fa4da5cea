#![forbid(unsafe_code)]

//! Observable value wrapper with synchronous change notification.
//!
//! # Design
//!
//! [`ObservableValue<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Every [`set`](ObservableValue::set) replaces
//! the value and notifies all registered listeners in registration order
//! before returning. There is no equality short-circuit: setting an equal
//! value notifies again.
//!
//! Listeners are owned strongly by the observable and tagged with a
//! [`ListenerId`]. They are released by [`remove_listener`],
//! [`dispose_all`], a dropped [`Subscription`], or when the last handle drops.
//!
//! [`remove_listener`]: ObservableValue::remove_listener
//! [`dispose_all`]: ObservableValue::dispose_all
//!
//! # Notification snapshot
//!
//! A notification pass clones the listener list before the first call and
//! releases every interior borrow while listeners run. Consequently:
//!
//! - a listener registered during a pass is first called on the next `set`;
//! - a listener removed during a pass still receives the value of that pass
//!   if it was already in the snapshot;
//! - a listener may call back into the same observable, including `set`.
//!   A nested `set` completes its own pass before the outer pass resumes,
//!   and the outer pass keeps delivering the value it started with.
//!   Listeners after the one that called `set` therefore receive the nested
//!   value first and the outer value last, so the last value they saw can
//!   differ from `get()`. Read `get()` inside the listener when the latest
//!   value matters.
//!
//! # Performance
//!
//! | Operation           | Complexity                  |
//! |---------------------|-----------------------------|
//! | `get()`             | O(1) + `T::clone`           |
//! | `set()`             | O(L) where L = listeners    |
//! | `add_listener()`    | O(1) amortized              |
//! | `remove_listener()` | O(L)                        |
//! | `dispose_all()`     | O(L)                        |
//!
//! # Failure Modes
//!
//! - **Mutation inside `with`**: the closure passed to
//!   [`with`](ObservableValue::with) runs under a shared borrow; calling
//!   `set`, `update` or a registration method on the same observable from
//!   inside it panics (`RefCell` borrow rules).
//! - **Threads**: the type is `!Send` and `!Sync`; cross-thread use does not
//!   compile.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::subscription::{ListenerId, ListenerSource, Subscription};

/// A registered listener. Shared so a notification pass can snapshot the
/// list without holding a borrow across calls.
type Listener<T> = Rc<dyn Fn(&T)>;

/// Shared interior for [`ObservableValue<T>`].
struct ObservableInner<T> {
    value: T,
    version: u64,
    /// Registration order is preserved; ids are strictly increasing.
    listeners: Vec<(ListenerId, Listener<T>)>,
}

/// A shared value with synchronous change notification.
///
/// Cloning an `ObservableValue` creates a new handle to the **same** inner
/// state: both handles see the same value and share listeners.
///
/// # Invariants
///
/// 1. The value is always present; it is only ever replaced.
/// 2. Listeners are notified in registration order, exactly once per `set`.
/// 3. `version` increments by exactly 1 on each `set` or `update`.
/// 4. [`ListenerId`]s are unique across all observables in the process.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use tether_core::reactive::ObservableValue;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let obs = ObservableValue::new(0);
///
/// let sink = Rc::clone(&seen);
/// obs.bind_and_replay(move |v| sink.borrow_mut().push(*v));
/// obs.set(1);
///
/// assert_eq!(*seen.borrow(), vec![0, 1]);
/// ```
pub struct ObservableValue<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

// Manual Clone: shares the same Rc and does not require `T: Clone`.
impl<T> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableValue")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("listener_count", &inner.listeners.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for ObservableValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> ObservableValue<T> {
    /// Create a new observable with the given initial value.
    ///
    /// The initial version is 0 and no listeners are registered.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if `f` mutates this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value and notify every registered listener with it.
    ///
    /// Listeners run synchronously, in registration order, before this call
    /// returns. Equal values are not filtered out.
    pub fn set(&self, value: T) {
        let version = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
            inner.version
        };
        self.notify(version);
    }

    /// Modify the value in place via a closure, then notify listeners.
    ///
    /// Behaves like [`set`](Self::set): the version is bumped and listeners
    /// are notified even if `f` leaves the value unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `f` accesses this observable.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let version = {
            let mut inner = self.inner.borrow_mut();
            f(&mut inner.value);
            inner.version += 1;
            inner.version
        };
        self.notify(version);
    }

    /// Register a listener and immediately call it once with the current
    /// value.
    ///
    /// The listener is registered before the replay, so no value set after
    /// this call can be missed.
    pub fn bind_and_replay(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        let listener: Listener<T> = Rc::new(listener);
        let id = self.push(Rc::clone(&listener));
        let value = self.get();
        listener(&value);
        id
    }

    /// Register a listener without calling it. It is first called on the
    /// next [`set`](Self::set).
    pub fn add_listener(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        self.push(Rc::new(listener))
    }

    /// Remove a single listener.
    ///
    /// Returns `false` if `id` is unknown or was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        // Bind the removed entry so the closure is dropped after the borrow ends.
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let index = inner.listeners.iter().position(|(lid, _)| *lid == id);
            index.map(|i| inner.listeners.remove(i))
        };
        if removed.is_none() {
            trace!(?id, "remove_listener: unknown listener");
        }
        removed.is_some()
    }

    /// Remove every registered listener.
    ///
    /// The value is untouched and the observable stays usable: listeners
    /// registered afterwards are notified normally.
    pub fn dispose_all(&self) {
        let released = std::mem::take(&mut self.inner.borrow_mut().listeners);
        debug!(released = released.len(), "dispose_all");
        drop(released);
    }

    /// Wrap an existing registration in an RAII [`Subscription`].
    ///
    /// Dropping the guard removes the listener. The guard only holds a weak
    /// reference, so it never keeps the observable alive.
    pub fn guard(&self, id: ListenerId) -> Subscription {
        Subscription::new(id, Rc::downgrade(&self.inner))
    }

    /// Whether `id` is currently registered.
    #[must_use]
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow().listeners.iter().any(|(lid, _)| *lid == id)
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of `set`/`update` calls so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    fn push(&self, listener: Listener<T>) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId::next();
        inner.listeners.push((id, listener));
        id
    }

    /// Notify a snapshot of the listeners.
    fn notify(&self, version: u64) {
        // Snapshot value and listeners so no borrow is held during the calls.
        let (value, snapshot) = {
            let inner = self.inner.borrow();
            let snapshot: Vec<Listener<T>> = inner
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            (inner.value.clone(), snapshot)
        };

        trace!(version, listeners = snapshot.len(), "notify");
        for listener in &snapshot {
            listener(&value);
        }
    }
}

impl<T: Clone + 'static> ListenerSource for Weak<RefCell<ObservableInner<T>>> {
    fn remove(&self, id: ListenerId) -> bool {
        self.upgrade()
            .is_some_and(|inner| ObservableValue { inner }.remove_listener(id))
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.upgrade()
            .is_some_and(|inner| ObservableValue { inner }.has_listener(id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
