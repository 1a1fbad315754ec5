//! Bounded FIFO history of raw observations
//!
//! The building block of every delta-updated aggregate: pushing into a full
//! history hands back the evicted element so running sums can subtract it.

use core::num::NonZeroUsize;

#[cfg(feature = "std")]
use std::collections::VecDeque;

#[cfg(not(feature = "std"))]
use alloc::collections::VecDeque;

/// Length of a trailing window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Window {
    /// The `n` most recent observations
    Bounded(NonZeroUsize),
    /// Every observation since the last reset
    #[default]
    Unbounded,
}

impl Window {
    /// Window of the `n` most recent observations
    ///
    /// A zero-length window is not representable and degrades to
    /// [`Window::Unbounded`].
    pub fn new(n: usize) -> Self {
        match NonZeroUsize::new(n) {
            Some(n) => Window::Bounded(n),
            None => {
                tracing::warn!(n, "zero window length, falling back to unbounded window");
                Window::Unbounded
            }
        }
    }

    /// Window from a floating point length
    ///
    /// Infinite, NaN, sub-unit or oversized lengths degrade to
    /// [`Window::Unbounded`]; fractional lengths are truncated.
    pub fn from_f64(n: f64) -> Self {
        if n.is_finite() && n >= 1.0 && n < usize::MAX as f64 {
            Window::new(n as usize)
        } else {
            if !(n.is_infinite() && n > 0.0) {
                tracing::warn!(n, "unrepresentable window length, falling back to unbounded window");
            }
            Window::Unbounded
        }
    }

    /// Window length, `None` if unbounded
    pub fn len(&self) -> Option<usize> {
        match self {
            Window::Bounded(n) => Some(n.get()),
            Window::Unbounded => None,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, Window::Bounded(_))
    }
}

impl From<Option<usize>> for Window {
    fn from(n: Option<usize>) -> Self {
        n.map_or(Window::Unbounded, Window::new)
    }
}

/// FIFO buffer holding at most a window's worth of values
///
/// # Example
///
/// ```
/// use flowmovers::window::History;
///
/// let mut history = History::with_len(2);
///
/// assert_eq!(history.push(1), None);
/// assert_eq!(history.push(2), None);
/// assert!(history.is_full());
///
/// // Full: the oldest value falls out
/// assert_eq!(history.push(3), Some(1));
/// assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct History<T> {
    /// Retained values, oldest first
    values: VecDeque<T>,
    window: Window,
}

impl<T> History<T> {
    /// Create an empty history over the given window
    pub fn new(window: Window) -> Self {
        Self {
            values: VecDeque::new(),
            window,
        }
    }

    /// Create an empty history holding at most `n` values
    pub fn with_len(n: usize) -> Self {
        Self::new(Window::new(n))
    }

    /// Create an empty history that never evicts
    pub fn unbounded() -> Self {
        Self::new(Window::Unbounded)
    }

    /// Append a value, returning the evicted oldest value if the history
    /// was already full
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.is_full() {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    /// Push for running aggregates that only need evictions
    ///
    /// An unbounded history never evicts, so it keeps nothing and memory
    /// stays constant; a bounded one behaves like [`History::push`].
    pub fn slide(&mut self, value: T) -> Option<T> {
        if self.window.is_bounded() {
            self.push(value)
        } else {
            None
        }
    }

    /// Whether the history holds a full window
    ///
    /// Always `false` for an unbounded history.
    pub fn is_full(&self) -> bool {
        self.window.len() == Some(self.values.len())
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Oldest retained value
    pub fn front(&self) -> Option<&T> {
        self.values.front()
    }

    /// Retained values, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_when_full() {
        let mut history = History::with_len(3);

        assert_eq!(history.push(1.0), None);
        assert_eq!(history.push(2.0), None);
        assert!(!history.is_full());
        assert_eq!(history.push(3.0), None);
        assert!(history.is_full());

        assert_eq!(history.push(4.0), Some(1.0));
        assert_eq!(history.push(5.0), Some(2.0));
        assert_eq!(history.len(), 3);
        assert_eq!(history.front(), Some(&3.0));
    }

    #[test]
    fn test_eviction_distinct_from_data() {
        // Evicted values may be any real, including NaN
        let mut history = History::with_len(1);
        history.push(f64::NAN);

        let evicted = history.push(0.0);
        assert!(evicted.is_some_and(|v| v.is_nan()));
    }

    #[test]
    fn test_unbounded_never_full() {
        let mut history = History::unbounded();
        for i in 0..10_000 {
            assert_eq!(history.push(i), None);
        }

        assert!(!history.is_full());
        assert_eq!(history.len(), 10_000);
    }

    #[test]
    fn test_zero_len_falls_back_to_unbounded() {
        let history = History::<f64>::with_len(0);
        assert_eq!(history.window(), Window::Unbounded);
    }

    #[test]
    fn test_window_from_f64() {
        assert_eq!(Window::from_f64(3.0).len(), Some(3));
        assert_eq!(Window::from_f64(3.7).len(), Some(3));
        assert_eq!(Window::from_f64(f64::INFINITY), Window::Unbounded);
        assert_eq!(Window::from_f64(f64::NAN), Window::Unbounded);
        assert_eq!(Window::from_f64(0.5), Window::Unbounded);
        assert_eq!(Window::from_f64(-2.0), Window::Unbounded);
        assert_eq!(Window::from_f64(1e300), Window::Unbounded);
    }

    #[test]
    fn test_window_from_option() {
        assert_eq!(Window::from(Some(4)).len(), Some(4));
        assert_eq!(Window::from(None), Window::Unbounded);
        assert!(!Window::default().is_bounded());
    }

    #[test]
    fn test_slide() {
        let mut bounded = History::with_len(2);
        assert_eq!(bounded.slide(1), None);
        assert_eq!(bounded.slide(2), None);
        assert_eq!(bounded.slide(3), Some(1));

        let mut unbounded = History::unbounded();
        for i in 0..100 {
            assert_eq!(unbounded.slide(i), None);
        }
        assert!(unbounded.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut history = History::with_len(2);
        history.push(1);
        history.push(2);

        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.push(3), None);
    }
}
