#![forbid(unsafe_code)]

//! Observable values for UI-bound state.
//!
//! This module provides a minimal synchronous change-notification primitive:
//!
//! - [`ObservableValue`]: a shared value wrapper that notifies listeners on
//!   every `set`, with optional replay of the current value on subscribe.
//! - [`ListenerId`]: identity of one registration, for targeted removal.
//! - [`Subscription`]: RAII guard that removes a listener on drop.
//! - [`DisposeBag`]: owns many guards and releases them together.
//!
//! # Architecture
//!
//! `ObservableValue<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Listeners are owned strongly by the observable; guards hold a
//! `Weak` back-reference.
//!
//! # Invariants
//!
//! 1. Listeners are notified in registration order, once per `set`.
//! 2. Every `set` notifies, including one that stores an equal value.
//! 3. A notification pass delivers to the listener snapshot taken when it
//!    started.
//! 4. After `dispose_all`, no previously registered listener is called;
//!    later registrations work normally.

pub mod observable;
pub mod subscription;

pub use observable::ObservableValue;
pub use subscription::{DisposeBag, ListenerId, Subscription};
