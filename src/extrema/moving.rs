//! Moving maximum and minimum

#[cfg(feature = "std")]
use std::boxed::Box;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::traits::{BoxedMover, Mover, MoverError, Patience};
use crate::window::{Direction, Max, Min, MonotonicQueue, Window};

/// Maximum of the last `n` values
pub type MovingMax = MovingExtremum<Max>;

/// Minimum of the last `n` values
pub type MovingMin = MovingExtremum<Min>;

/// Extremum of a trailing window, backed by a [`MonotonicQueue`]
///
/// The extremum is defined from the first observation, so these movers are
/// never patient.
///
/// # Example
///
/// ```
/// use flowmovers::compose::MoverExt;
/// use flowmovers::extrema::MovingMax;
///
/// let mut mmax = MovingMax::new(3);
/// let outputs = mmax.run([6.0, 9.0, 7.0, 6.0, 6.0, 3.0]).unwrap();
///
/// assert_eq!(
///     outputs,
///     vec![Some(6.0), Some(9.0), Some(9.0), Some(9.0), Some(7.0), Some(6.0)]
/// );
/// assert_eq!(mmax.max(), Some(6.0));
/// ```
#[derive(Clone, Debug)]
pub struct MovingExtremum<D: Direction> {
    queue: MonotonicQueue<f64, D>,
    patience: Patience,
}

impl<D: Direction> MovingExtremum<D> {
    /// Extremum of the `n` most recent values
    pub fn new(n: usize) -> Self {
        Self::with_window(Window::new(n))
    }

    /// Extremum of every value since the last reset
    pub fn unbounded() -> Self {
        Self::with_window(Window::Unbounded)
    }

    pub fn with_window(window: Window) -> Self {
        Self {
            queue: MonotonicQueue::new(window),
            patience: Patience::default(),
        }
    }

    pub fn window(&self) -> Window {
        self.queue.window()
    }

    /// Current extremum, `None` before the first observation
    pub fn current(&self) -> Option<f64> {
        self.queue.head().ok()
    }
}

impl MovingExtremum<Max> {
    /// Current maximum, `None` before the first observation
    pub fn max(&self) -> Option<f64> {
        self.current()
    }
}

impl MovingExtremum<Min> {
    /// Current minimum, `None` before the first observation
    pub fn min(&self) -> Option<f64> {
        self.current()
    }
}

impl<D: Direction + 'static> Mover for MovingExtremum<D> {
    type Input = f64;
    type Output = f64;

    fn eat(&mut self, input: f64) -> Result<Option<f64>, MoverError> {
        self.queue.push(input);
        self.queue.head().map(Some)
    }

    fn zero(&mut self) {
        self.queue.clear();
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn is_patient(&self) -> bool {
        false
    }

    fn set_patient(&mut self, patient: bool) {
        if patient {
            tracing::debug!(
                mover = core::any::type_name::<Self>(),
                "moving extrema are never patient, ignoring"
            );
        }
    }

    fn copy(&self) -> Result<BoxedMover<f64, f64>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::MoverExt;
    use crate::traits::Signal;

    const DATA: [f64; 10] = [6.0, 9.0, 7.0, 6.0, 6.0, 3.0, 4.0, 4.0, 6.0, 2.0];

    #[test]
    fn test_moving_max() {
        let mut mmax = MovingMax::new(3);
        let outputs = mmax.run(DATA).unwrap();

        let expected: Vec<_> = [6.0, 9.0, 9.0, 9.0, 7.0, 6.0, 6.0, 4.0, 6.0, 6.0]
            .into_iter()
            .map(Some)
            .collect();
        assert_eq!(outputs, expected);
    }

    #[test]
    fn test_moving_min() {
        let mut mmin = MovingMin::new(3);
        let outputs = mmin.run(DATA).unwrap();

        let expected: Vec<_> = [6.0, 6.0, 6.0, 6.0, 6.0, 3.0, 3.0, 3.0, 4.0, 2.0]
            .into_iter()
            .map(Some)
            .collect();
        assert_eq!(outputs, expected);
        assert_eq!(mmin.min(), Some(2.0));
    }

    #[test]
    fn test_unbounded_extrema() {
        let mut mmax = MovingMax::unbounded();
        let mut mmin = MovingMin::unbounded();
        mmax.run(DATA).unwrap();
        mmin.run(DATA).unwrap();

        assert_eq!(mmax.max(), Some(9.0));
        assert_eq!(mmin.min(), Some(2.0));
    }

    #[test]
    fn test_never_patient() {
        let mut mmax = MovingMax::new(3).patient();

        assert!(!mmax.is_patient());
        assert_eq!(mmax.push(1.0).unwrap(), Some(1.0));
    }

    #[test]
    fn test_reset_empties_queue() {
        let mut mmax = MovingMax::new(3);
        mmax.run(DATA).unwrap();

        assert_eq!(mmax.feed(Signal::Reset).unwrap(), None);
        assert_eq!(mmax.max(), None);
        assert_eq!(mmax.push(-5.0).unwrap(), Some(-5.0));
    }

    #[test]
    fn test_copy() {
        let mut mmin = MovingMin::new(2);
        mmin.run([1.0, 5.0]).unwrap();

        let mut copy = mmin.copy().unwrap();
        assert_eq!(copy.push(7.0).unwrap(), Some(5.0));
        assert_eq!(mmin.push(0.0).unwrap(), Some(0.0));
    }
}
