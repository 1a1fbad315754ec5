//! Movers comparing the present with the past: lag and ratio

#[cfg(feature = "std")]
use std::boxed::Box;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::traits::{BoxedMover, Mover, MoverError, Patience};
use crate::window::{History, Window};

/// Emits the value observed `n` ticks earlier
///
/// Before `n` earlier values exist it emits the oldest value seen, and only
/// triggers once a value actually falls out of the window. `Delay::new(0)`
/// is the identity and triggers on its first value. An unbounded delay keeps
/// only the first value and repeats it.
///
/// # Example
///
/// ```
/// use flowmovers::compose::Delay;
/// use flowmovers::compose::MoverExt;
///
/// let mut delay = Delay::new(2);
/// let outputs = delay.run([1, 2, 3, 4]).unwrap();
/// assert_eq!(outputs, vec![Some(1), Some(1), Some(1), Some(2)]);
/// ```
#[derive(Clone, Debug)]
pub struct Delay<T> {
    history: History<T>,
    /// Observations since the last reset
    seen: u64,
    /// Zero lag, nothing is retained
    identity: bool,
    patience: Patience,
}

impl<T: Clone> Delay<T> {
    /// Delay by `n` ticks
    pub fn new(n: usize) -> Self {
        if n == 0 {
            return Self {
                identity: true,
                ..Self::with_window(Window::Unbounded)
            };
        }
        Self::with_window(Window::new(n))
    }

    pub fn with_window(window: Window) -> Self {
        Self {
            history: History::new(window),
            seen: 0,
            identity: false,
            patience: Patience::default(),
        }
    }

    /// Lag in ticks, `None` when unbounded
    pub fn lag(&self) -> Option<usize> {
        if self.identity {
            Some(0)
        } else {
            self.history.window().len()
        }
    }

    /// Number of retained values
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl<T: Clone + 'static> Mover for Delay<T> {
    type Input = T;
    type Output = T;

    fn eat(&mut self, input: T) -> Result<Option<T>, MoverError> {
        self.seen += 1;
        if self.identity {
            return Ok(Some(input));
        }
        if !self.history.window().is_bounded() {
            if self.history.is_empty() {
                self.history.push(input);
            }
            return Ok(self.history.front().cloned());
        }
        match self.history.push(input) {
            Some(evicted) => Ok(Some(evicted)),
            None => Ok(self.history.front().cloned()),
        }
    }

    fn zero(&mut self) {
        self.history.clear();
        self.seen = 0;
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn triggered(&self) -> bool {
        self.lag().is_some_and(|n| self.seen > n as u64)
    }

    fn copy(&self) -> Result<BoxedMover<T, T>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}

/// Ratio of each value to the value `n` ticks earlier
///
/// Emits 1.0 until `n` earlier values exist, and always when `n` is zero
/// or the window is unbounded.
///
/// # Example
///
/// ```
/// use flowmovers::compose::MovingRatio;
/// use flowmovers::compose::MoverExt;
///
/// let mut ratio = MovingRatio::default();
/// let outputs = ratio.run([2.0, 4.0, 1.0]).unwrap();
/// assert_eq!(outputs, vec![Some(1.0), Some(2.0), Some(0.25)]);
/// ```
#[derive(Clone, Debug)]
pub struct MovingRatio {
    history: History<f64>,
    patience: Patience,
}

impl Default for MovingRatio {
    fn default() -> Self {
        Self::new(1)
    }
}

impl MovingRatio {
    /// Ratio against the value `n` ticks earlier
    pub fn new(n: usize) -> Self {
        Self::with_window(Window::new(n))
    }

    pub fn with_window(window: Window) -> Self {
        Self {
            history: History::new(window),
            patience: Patience::default(),
        }
    }
}

impl Mover for MovingRatio {
    type Input = f64;
    type Output = f64;

    fn eat(&mut self, input: f64) -> Result<Option<f64>, MoverError> {
        let ratio = match self.history.slide(input) {
            Some(earlier) => input / earlier,
            None => 1.0,
        };
        Ok(Some(ratio))
    }

    fn zero(&mut self) {
        self.history.clear();
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn copy(&self) -> Result<BoxedMover<f64, f64>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}
