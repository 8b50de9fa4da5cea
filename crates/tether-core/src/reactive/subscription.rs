#![forbid(unsafe_code)]

//! Listener identities and scoped subscriptions.
//!
//! Every registration on an [`ObservableValue`](super::ObservableValue)
//! yields a [`ListenerId`]. An id can be turned into a [`Subscription`], an
//! RAII guard that removes the listener on drop, and guards can be collected
//! in a [`DisposeBag`] whose lifetime bounds all of them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of listener ids for every observable in the process.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of one listener registration.
///
/// Ids are unique across all observables in the process and never reused,
/// so a stale id or an id issued by another observable cannot remove an
/// unrelated listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Type-erased access to the observable that issued a [`ListenerId`].
pub(crate) trait ListenerSource {
    /// Remove `id`; `false` if the source is gone or the id is unknown.
    fn remove(&self, id: ListenerId) -> bool;
    fn contains(&self, id: ListenerId) -> bool;
}

/// RAII guard for a single listener registration.
///
/// Dropping the guard removes the listener. The guard holds only a weak
/// reference to its observable; once the observable is gone, dropping the
/// guard does nothing.
#[must_use = "dropping a Subscription immediately removes its listener"]
pub struct Subscription {
    id: ListenerId,
    source: Option<Box<dyn ListenerSource>>,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, source: impl ListenerSource + 'static) -> Self {
        Self {
            id,
            source: Some(Box::new(source)),
        }
    }

    /// The guarded listener.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the observable is alive and still holds the listener.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|source| source.contains(self.id))
    }

    /// Remove the listener now. Returns whether it was still registered.
    pub fn unsubscribe(mut self) -> bool {
        self.source
            .take()
            .is_some_and(|source| source.remove(self.id))
    }

    /// Give up the guard and keep the listener registered.
    ///
    /// The listener then lives until it is removed by id, by
    /// `dispose_all`, or with the observable itself.
    pub fn detach(mut self) -> ListenerId {
        self.source = None;
        self.id
    }

    /// Hand the guard over to `bag`.
    pub fn disposed_by(self, bag: &mut DisposeBag) {
        bag.insert(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(source) = self.source.take() {
            source.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.source.is_some())
            .finish_non_exhaustive()
    }
}

/// A collection of [`Subscription`]s released together.
///
/// Owning a bag ties every listener in it to the owner's lifetime: dropping
/// the bag removes them all.
#[derive(Debug, Default)]
pub struct DisposeBag {
    subscriptions: Vec<Subscription>,
}

impl DisposeBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `subscription`.
    pub fn insert(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the bag holds no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Remove every held listener. The bag stays usable.
    ///
    /// Returns how many listeners were still registered.
    pub fn dispose(&mut self) -> usize {
        self.subscriptions
            .drain(..)
            .map(Subscription::unsubscribe)
            .filter(|removed| *removed)
            .count()
    }
}

impl Extend<Subscription> for DisposeBag {
    fn extend<I: IntoIterator<Item = Subscription>>(&mut self, iter: I) {
        self.subscriptions.extend(iter);
    }
}
