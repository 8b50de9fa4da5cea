#![forbid(unsafe_code)]

//! Content-size change notification by composition.
//!
//! A view that wants to publish its content size holds a [`ContentSize`]
//! and forwards every size the platform reports through
//! [`ContentSize::report`]. Observers (typically layout code) subscribe with
//! [`ContentSize::observe`] or [`ContentSize::on_change`].

use tracing::debug;

use crate::reactive::{ListenerId, ObservableValue};

/// A width/height pair in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Publishes a component's content size to interested observers.
///
/// Dropping the component releases every listener registered through it,
/// unless another handle from [`value`](Self::value) is still alive.
#[derive(Debug, Default)]
pub struct ContentSize {
    size: ObservableValue<Size>,
}

impl ContentSize {
    /// Create a publisher starting at `initial`.
    #[must_use]
    pub fn new(initial: Size) -> Self {
        Self {
            size: ObservableValue::new(initial),
        }
    }

    /// Feed a size reported by the platform.
    ///
    /// Observers are notified only if `size` differs from the current one.
    /// Returns whether a notification happened.
    pub fn report(&self, size: Size) -> bool {
        let current = self.size.get();
        if current == size {
            return false;
        }
        debug!(
            width = size.width,
            height = size.height,
            "content size changed"
        );
        self.size.set(size);
        true
    }

    /// The current content size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size.get()
    }

    /// Observe the size, starting with the current one.
    pub fn observe(&self, listener: impl Fn(&Size) + 'static) -> ListenerId {
        self.size.bind_and_replay(listener)
    }

    /// Observe future size changes only.
    pub fn on_change(&self, listener: impl Fn(&Size) + 'static) -> ListenerId {
        self.size.add_listener(listener)
    }

    /// The underlying observable, for guards and targeted removal.
    #[must_use]
    pub fn value(&self) -> &ObservableValue<Size> {
        &self.size
    }
}
