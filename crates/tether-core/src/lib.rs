#![forbid(unsafe_code)]

//! Core: synchronous observable values for UI-bound state.
//!
//! # Role in Tether
//! `tether-core` holds a single piece of state behind a change-notification
//! list. UI-facing components own an [`ObservableValue`], call `set` whenever
//! the platform reports a change, and hand out `bind_and_replay` /
//! `add_listener` to interested observers.
//!
//! # Primary responsibilities
//! - **ObservableValue**: value + ordered listeners, synchronous delivery,
//!   replay-on-subscribe, bulk and targeted removal.
//! - **Subscription / DisposeBag**: listener lifetimes tied to owners.
//! - **ContentSize**: content-size publishing by composition.
//! - **LogConfig**: explicit logging configuration for `tracing`.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tether_core::ObservableValue;
//!
//! let total = Rc::new(Cell::new(0));
//! let obs = ObservableValue::new(1);
//!
//! let sink = Rc::clone(&total);
//! let sub = obs.guard(obs.bind_and_replay(move |v| sink.set(sink.get() + *v)));
//! obs.set(2);
//! drop(sub);
//! obs.set(100);
//!
//! assert_eq!(total.get(), 3);
//! ```

pub mod content_size;
pub mod logging;
pub mod reactive;

pub use content_size::{ContentSize, Size};
pub use logging::{LogConfig, LogConfigError, LogFormat};
pub use reactive::{DisposeBag, ListenerId, ObservableValue, Subscription};
