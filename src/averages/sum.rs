//! Running sum over a trailing window

#[cfg(feature = "std")]
use std::boxed::Box;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::traits::{BoxedMover, Mover, MoverError, Patience};
use crate::window::{History, Window};

/// Sum of the last `n` values (or of every value when unbounded)
///
/// O(1) per observation: the new value is added and the evicted one
/// subtracted. An unbounded sum keeps no history at all.
///
/// # Example
///
/// ```
/// use flowmovers::averages::MovingSum;
/// use flowmovers::compose::MoverExt;
///
/// let mut sum = MovingSum::new(3);
/// let outputs = sum.run((0..6).map(f64::from)).unwrap();
///
/// assert_eq!(
///     outputs,
///     vec![Some(0.0), Some(1.0), Some(3.0), Some(6.0), Some(9.0), Some(12.0)]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct MovingSum {
    history: History<f64>,
    sum: f64,
    patience: Patience,
}

impl Default for MovingSum {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl MovingSum {
    /// Sum over the `n` most recent values
    pub fn new(n: usize) -> Self {
        Self::with_window(Window::new(n))
    }

    /// Sum over every value since the last reset
    pub fn unbounded() -> Self {
        Self::with_window(Window::Unbounded)
    }

    pub fn with_window(window: Window) -> Self {
        Self {
            history: History::new(window),
            sum: 0.0,
            patience: Patience::default(),
        }
    }

    pub fn window(&self) -> Window {
        self.history.window()
    }

    /// Current sum
    pub fn sum(&self) -> f64 {
        self.sum
    }
}

impl Mover for MovingSum {
    type Input = f64;
    type Output = f64;

    fn eat(&mut self, input: f64) -> Result<Option<f64>, MoverError> {
        match self.history.slide(input) {
            Some(evicted) => self.sum += input - evicted,
            None => self.sum += input,
        }
        Ok(Some(self.sum))
    }

    fn zero(&mut self) {
        self.history.clear();
        self.sum = 0.0;
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
