//! Monotonic extremum queue for sliding-window max/min
//!
//! Keeps (value, index) pairs monotonic from head to tail so the head is
//! always the extremum of the last `n` pushes. Each value is pushed and
//! popped at most once, giving amortized O(1) per push regardless of `n`.

use core::fmt::Debug;
use core::marker::PhantomData;

#[cfg(feature = "std")]
use std::collections::VecDeque;

#[cfg(not(feature = "std"))]
use alloc::collections::VecDeque;

use super::Window;
use crate::traits::MoverError;

/// Which extremum a [`MonotonicQueue`] tracks
pub trait Direction: Clone + Copy + Debug + Default {
    /// Whether a held value stays ahead of a newer incoming value
    ///
    /// Held values that do not strictly dominate the incoming one can never
    /// be the extremum again and are dropped.
    fn dominates<T: PartialOrd>(held: &T, incoming: &T) -> bool;
}

/// Track the window maximum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Max;

/// Track the window minimum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Min;

impl Direction for Max {
    #[inline]
    fn dominates<T: PartialOrd>(held: &T, incoming: &T) -> bool {
        held > incoming
    }
}

impl Direction for Min {
    #[inline]
    fn dominates<T: PartialOrd>(held: &T, incoming: &T) -> bool {
        held < incoming
    }
}

/// Sliding-window maximum queue
pub type MaxQueue<T = f64> = MonotonicQueue<T, Max>;

/// Sliding-window minimum queue
pub type MinQueue<T = f64> = MonotonicQueue<T, Min>;

/// Index-aware monotonic deque
///
/// # Example
///
/// ```
/// use flowmovers::window::MaxQueue;
///
/// let mut queue = MaxQueue::with_len(3);
///
/// for value in [6.0, 9.0, 7.0, 6.0] {
///     queue.push(value);
/// }
/// assert_eq!(queue.head().unwrap(), 9.0);
///
/// // 9.0 ages out of the window
/// queue.push(6.0);
/// assert_eq!(queue.head().unwrap(), 7.0);
/// ```
#[derive(Clone, Debug)]
pub struct MonotonicQueue<T, D: Direction> {
    /// (value, insertion index), monotonic in value
    entries: VecDeque<(T, u64)>,
    window: Window,
    /// Index of the next push
    index: u64,
    _direction: PhantomData<D>,
}

impl<T: PartialOrd + Clone, D: Direction> MonotonicQueue<T, D> {
    /// Create an empty queue over the given window
    pub fn new(window: Window) -> Self {
        Self {
            entries: VecDeque::new(),
            window,
            index: 0,
            _direction: PhantomData,
        }
    }

    /// Create an empty queue over the `n` most recent pushes
    pub fn with_len(n: usize) -> Self {
        Self::new(Window::new(n))
    }

    /// Create an empty queue over every push
    pub fn unbounded() -> Self {
        Self::new(Window::Unbounded)
    }

    /// Push a value into the window
    pub fn push(&mut self, value: T) {
        while let Some((tail, _)) = self.entries.back() {
            if D::dominates(tail, &value) {
                break;
            }
            self.entries.pop_back();
        }
        self.entries.push_back((value, self.index));

        if let Some(n) = self.window.len() {
            // Age eviction; the entry just pushed has age 0 and always stays
            while let Some(&(_, head_index)) = self.entries.front() {
                if self.index - head_index < n as u64 {
                    break;
                }
                self.entries.pop_front();
            }
        }

        self.index += 1;
    }

    /// Current window extremum
    pub fn head(&self) -> Result<T, MoverError> {
        self.entries
            .front()
            .map(|(value, _)| value.clone())
            .ok_or(MoverError::Empty)
    }

    /// Most recently pushed value
    pub fn tail(&self) -> Result<T, MoverError> {
        self.entries
            .back()
            .map(|(value, _)| value.clone())
            .ok_or(MoverError::Empty)
    }

    /// Logical window length: number of pushes still inside the window
    pub fn len(&self) -> usize {
        let pushed = usize::try_from(self.index).unwrap_or(usize::MAX);
        match self.window.len() {
            Some(n) => pushed.min(n),
            None => pushed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries physically held
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}
