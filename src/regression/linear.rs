//! Moving linear regression over window positions
//!
//! The independent variable is the position within the window (0 for the
//! oldest retained value), not wall-clock time. When a value is evicted
//! every remaining position shifts down by one, which lets `Σxy` be
//! updated in O(1): `Σxy ← Σxy − Σy + evicted + (N−1)·new`, while `Σx` and
//! `Σxx` stay fixed once the window is full.

#[cfg(feature = "std")]
use std::boxed::Box;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::traits::{BoxedMover, Mover, MoverError, Patience};
use crate::window::{History, Window};

/// Least-squares line through the window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineFit {
    pub slope: f64,
    /// Value of the line at the oldest window position
    pub intercept: f64,
}

/// Position/value sums over a window
#[derive(Clone, Debug)]
struct RegressionWindow {
    history: History<f64>,
    /// Number of values in the window
    len: usize,
    /// Σx over positions
    x: f64,
    /// Σy over values
    y: f64,
    /// Σx·y
    xy: f64,
    /// Σx²
    xx: f64,
}

impl RegressionWindow {
    fn new(window: Window) -> Self {
        Self {
            history: History::new(window),
            len: 0,
            x: 0.0,
            y: 0.0,
            xy: 0.0,
            xx: 0.0,
        }
    }

    /// Add a value; `None` until two values are in the window
    fn push(&mut self, value: f64) -> Option<LineFit> {
        match self.history.slide(value) {
            Some(evicted) => {
                self.xy += -self.y + evicted + (self.len as f64 - 1.0) * value;
                self.y += value - evicted;
            }
            None => {
                let position = self.len as f64;
                self.x += position;
                self.y += value;
                self.xy += position * value;
                self.xx += position * position;
                self.len += 1;
            }
        }

        self.fit()
    }

    fn fit(&self) -> Option<LineFit> {
        if self.len < 2 {
            return None;
        }

        let n = self.len as f64;
        let slope = (n * self.xy - self.x * self.y) / (n * self.xx - self.x * self.x);
        let intercept = (self.y - slope * self.x) / n;
        Some(LineFit { slope, intercept })
    }

    fn is_warm(&self) -> bool {
        self.len >= 2 && (self.history.is_full() || !self.history.window().is_bounded())
    }

    fn clear(&mut self) {
        *self = Self::new(self.history.window());
    }
}

/// Slope of the moving linear regression
///
/// # Example
///
/// ```
/// use flowmovers::compose::MoverExt;
/// use flowmovers::regression::MovingSlope;
///
/// let mut slope = MovingSlope::new(3);
/// let outputs = slope.run([3.0, 6.0, 9.0, 6.0, 3.0]).unwrap();
///
/// assert_eq!(outputs, vec![None, Some(3.0), Some(3.0), Some(0.0), Some(-3.0)]);
/// ```
#[derive(Clone, Debug)]
pub struct MovingSlope {
    window: RegressionWindow,
    patience: Patience,
}

impl Default for MovingSlope {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl MovingSlope {
    /// Regression over the `n` most recent values
    pub fn new(n: usize) -> Self {
        Self::with_window(Window::new(n))
    }

    /// Regression over every value since the last reset
    pub fn unbounded() -> Self {
        Self::with_window(Window::Unbounded)
    }

    pub fn with_window(window: Window) -> Self {
        Self {
            window: RegressionWindow::new(window),
            patience: Patience::default(),
        }
    }

    pub fn window(&self) -> Window {
        self.window.history.window()
    }
}

impl Mover for MovingSlope {
    type Input = f64;
    type Output = f64;

    fn eat(&mut self, input: f64) -> Result<Option<f64>, MoverError> {
        Ok(self.window.push(input).map(|fit| fit.slope))
    }

    fn zero(&mut self) {
        self.window.clear();
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn triggered(&self) -> bool {
        self.window.is_warm()
    }

    fn copy(&self) -> Result<BoxedMover<f64, f64>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}

/// Slope and intercept of the moving linear regression
///
/// # Example
///
/// ```
/// use flowmovers::regression::{LineFit, MovingRegression};
/// use flowmovers::traits::Mover;
///
/// let mut regression = MovingRegression::new(3);
/// assert_eq!(regression.push(3.0).unwrap(), None);
/// assert_eq!(
///     regression.push(6.0).unwrap(),
///     Some(LineFit { slope: 3.0, intercept: 3.0 })
/// );
/// ```
#[derive(Clone, Debug)]
pub struct MovingRegression {
    window: RegressionWindow,
    patience: Patience,
}

impl Default for MovingRegression {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl MovingRegression {
    pub fn new(n: usize) -> Self {
        Self::with_window(Window::new(n))
    }

    pub fn unbounded() -> Self {
        Self::with_window(Window::Unbounded)
    }

    pub fn with_window(window: Window) -> Self {
        Self {
            window: RegressionWindow::new(window),
            patience: Patience::default(),
        }
    }

    pub fn window(&self) -> Window {
        self.window.history.window()
    }

    /// Fit over the current window, `None` with fewer than two values
    pub fn fit(&self) -> Option<LineFit> {
        self.window.fit()
    }
}

impl Mover for MovingRegression {
    type Input = f64;
    type Output = LineFit;

    fn eat(&mut self, input: f64) -> Result<Option<LineFit>, MoverError> {
        Ok(self.window.push(input))
    }

    fn zero(&mut self) {
        self.window.clear();
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn triggered(&self) -> bool {
        self.window.is_warm()
    }

    fn copy(&self) -> Result<BoxedMover<f64, LineFit>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}
