//! Exponential moving averages
//!
//! Tick-indexed ([`Ema`], [`EmaStd`]) with smoothing `α = 2/(n+1)`, and
//! time-indexed ([`TimeEma`]) for irregularly sampled series, where the
//! smoothing of each update decays with the elapsed time.

#[cfg(feature = "std")]
use std::boxed::Box;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use super::MeanStd;
use crate::math;
use crate::traits::{BoxedMover, Mover, MoverError, Patience};

/// Exponentially weighted mean and variance recurrences
#[derive(Clone, Debug)]
struct ExpMoments {
    /// Typical period
    span: usize,
    alpha: f64,
    /// Updates since the last reset
    count: u64,
    mean: Option<f64>,
    variance: f64,
}

impl ExpMoments {
    fn new(span: usize) -> Self {
        assert!(span > 0, "span must be positive");

        Self {
            span,
            alpha: 2.0 / (span as f64 + 1.0),
            count: 0,
            mean: None,
            variance: 0.0,
        }
    }

    fn push(&mut self, value: f64) -> MeanStd {
        self.count += 1;

        let mean = match self.mean {
            Some(previous) => {
                let mean = self.alpha * value + (1.0 - self.alpha) * previous;
                self.variance = self.alpha * (value - mean) * (value - previous)
                    + (1.0 - self.alpha) * self.variance;
                mean
            }
            None => {
                self.variance = 0.0;
                value
            }
        };
        self.mean = Some(mean);

        MeanStd {
            mean,
            std: math::sqrt(self.variance),
        }
    }

    /// Effectively filled once more than `span` updates were seen
    fn is_warm(&self) -> bool {
        self.count > self.span as u64
    }

    fn clear(&mut self) {
        self.count = 0;
        self.mean = None;
        self.variance = 0.0;
    }
}

/// Exponential moving average with typical period `n`
///
/// O(1) per observation regardless of `n`. A patient average stays silent
/// for the first `n` observations.
///
/// # Example
///
/// ```
/// use flowmovers::averages::Ema;
/// use flowmovers::compose::MoverExt;
///
/// let mut ema = Ema::new(3);
/// let outputs = ema.run([1.0, 2.0, 3.0, 3.0, 3.0]).unwrap();
///
/// assert_eq!(
///     outputs,
///     vec![Some(1.0), Some(1.5), Some(2.25), Some(2.625), Some(2.8125)]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    moments: ExpMoments,
    patience: Patience,
}

impl Ema {
    /// Create an average with typical period `n`
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn new(n: usize) -> Self {
        Self {
            moments: ExpMoments::new(n),
            patience: Patience::default(),
        }
    }

    pub fn span(&self) -> usize {
        self.moments.span
    }

    /// Smoothing factor `2/(n+1)`
    pub fn alpha(&self) -> f64 {
        self.moments.alpha
    }

    /// Current mean, `None` before the first observation
    pub fn mean(&self) -> Option<f64> {
        self.moments.mean
    }
}

impl Mover for Ema {
    type Input = f64;
    type Output = f64;

    fn eat(&mut self, input: f64) -> Result<Option<f64>, MoverError> {
        Ok(Some(self.moments.push(input).mean))
    }

    fn zero(&mut self) {
        self.moments.clear();
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn triggered(&self) -> bool {
        self.moments.is_warm()
    }

    fn copy(&self) -> Result<BoxedMover<f64, f64>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}

/// Exponential moving average with exponential moving standard deviation
///
/// # Example
///
/// ```
/// use flowmovers::averages::EmaStd;
/// use flowmovers::traits::Mover;
///
/// let mut ema = EmaStd::new(3);
/// ema.push(1.0).unwrap();
/// let out = ema.push(3.0).unwrap().unwrap();
///
/// assert_eq!(out.mean, 2.0);
/// assert_eq!(out.std, 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct EmaStd {
    moments: ExpMoments,
    patience: Patience,
}

impl EmaStd {
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn new(n: usize) -> Self {
        Self {
            moments: ExpMoments::new(n),
            patience: Patience::default(),
        }
    }

    pub fn span(&self) -> usize {
        self.moments.span
    }

    /// Current exponentially weighted variance
    pub fn variance(&self) -> f64 {
        self.moments.variance
    }
}

impl Mover for EmaStd {
    type Input = f64;
    type Output = MeanStd;

    fn eat(&mut self, input: f64) -> Result<Option<MeanStd>, MoverError> {
        Ok(Some(self.moments.push(input)))
    }

    fn zero(&mut self) {
        self.moments.clear();
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn triggered(&self) -> bool {
        self.moments.is_warm()
    }

    fn copy(&self) -> Result<BoxedMover<f64, MeanStd>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}

/// Timestamped observation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timed {
    /// Observation time, in the unit of the time constant
    pub time: f64,
    pub value: f64,
}

impl From<(f64, f64)> for Timed {
    fn from((time, value): (f64, f64)) -> Self {
        Self { time, value }
    }
}

/// Exponential moving average over irregularly sampled observations
///
/// Each update decays the previous mean by `μ = exp(−Δt/τ)`:
/// `mean = μ·previous + (1−μ)·value`. Observations must arrive in
/// non-decreasing time order.
///
/// # Example
///
/// ```
/// use flowmovers::averages::{Timed, TimeEma};
/// use flowmovers::traits::Mover;
///
/// let mut ema = TimeEma::new(1.0);
/// assert_eq!(ema.push(Timed { time: 0.0, value: 10.0 }).unwrap(), Some(10.0));
///
/// // A long gap forgets almost everything
/// let mean = ema.push(Timed { time: 50.0, value: 0.0 }).unwrap().unwrap();
/// assert!(mean < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct TimeEma {
    /// Time constant
    tau: f64,
    /// Time and mean of the latest observation
    last: Option<(f64, f64)>,
    patience: Patience,
}

impl TimeEma {
    /// Create an average with time constant `tau`
    ///
    /// # Panics
    ///
    /// Panics if `tau` is not finite and positive.
    pub fn new(tau: f64) -> Self {
        assert!(
            tau.is_finite() && tau > 0.0,
            "time constant must be finite and positive"
        );

        Self {
            tau,
            last: None,
            patience: Patience::default(),
        }
    }

    /// Time constant for which sampling every `interval` reproduces
    /// [`Ema::new(n)`](Ema::new)
    ///
    /// # Panics
    ///
    /// Panics if `n < 2` or `interval` is not finite and positive.
    pub fn matching(n: usize, interval: f64) -> Self {
        assert!(n > 1, "matching span must be at least 2");

        let n = n as f64;
        Self::new(interval / math::ln((n + 1.0) / (n - 1.0)))
    }

    /// Variance tracking is not available for time-indexed averages
    pub fn with_std(_tau: f64) -> Result<Self, MoverError> {
        Err(MoverError::Unsupported {
            mover: "TimeEma",
            feature: "standard deviation",
        })
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Current mean, `None` before the first observation
    pub fn mean(&self) -> Option<f64> {
        self.last.map(|(_, mean)| mean)
    }
}

impl Mover for TimeEma {
    type Input = Timed;
    type Output = f64;

    fn eat(&mut self, input: Timed) -> Result<Option<f64>, MoverError> {
        let Timed { time, value } = input;

        let mean = match self.last {
            Some((previous, _)) if time < previous => {
                return Err(MoverError::OutOfOrder {
                    previous,
                    current: time,
                });
            }
            Some((previous, mean)) => {
                let mu = math::exp(-(time - previous) / self.tau);
                mu * mean + (1.0 - mu) * value
            }
            None => value,
        };

        self.last = Some((time, mean));
        Ok(Some(mean))
    }

    fn zero(&mut self) {
        self.last = None;
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn copy(&self) -> Result<BoxedMover<Timed, f64>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::MoverExt;
    use crate::traits::Signal;

    const DATA: [f64; 5] = [1.0, 2.0, 3.0, 3.0, 3.0];

    #[test]
    fn test_ema_span_one_tracks_input() {
        let mut ema = Ema::new(1);
        assert_eq!(ema.alpha(), 1.0);

        let outputs = ema.run(DATA).unwrap();
        assert_eq!(outputs, vec![Some(1.0), Some(2.0), Some(3.0), Some(3.0), Some(3.0)]);
    }

    #[test]
    fn test_ema_span_three() {
        let mut ema = Ema::new(3);
        let outputs = ema.run(DATA).unwrap();

        assert_eq!(
            outputs,
            vec![Some(1.0), Some(1.5), Some(2.25), Some(2.625), Some(2.8125)]
        );
    }

    #[test]
    fn test_patient_ema_waits_for_span() {
        let mut ema = Ema::new(3).patient();
        let outputs = ema.run(DATA).unwrap();

        assert_eq!(outputs, vec![None, None, None, Some(2.625), Some(2.8125)]);

        ema.feed(Signal::Reset).unwrap();
        assert!(!ema.triggered());
        assert_eq!(ema.mean(), None);
        assert_eq!(ema.push(7.0).unwrap(), None);
    }

    #[test]
    fn test_ema_std_decays_on_constant_input() {
        let mut ema = EmaStd::new(3);
        let mut last = None;
        for value in DATA.into_iter().chain(core::iter::repeat(3.0).take(999)) {
            last = ema.push(value).unwrap();
        }

        let out = last.unwrap();
        assert!((out.mean - 3.0).abs() < 1e-12);
        assert!(out.std >= 0.0 && out.std < 1e-12, "std={}", out.std);
    }

    #[test]
    fn test_ema_std_first_observation() {
        let mut ema = EmaStd::new(5);
        let out = ema.push(42.0).unwrap().unwrap();

        assert_eq!(out, MeanStd { mean: 42.0, std: 0.0 });
        assert_eq!(ema.variance(), 0.0);
    }

    #[test]
    #[should_panic(expected = "span must be positive")]
    fn test_zero_span_panics() {
        Ema::new(0);
    }

    #[test]
    fn test_time_ema_decay() {
        let mut ema = TimeEma::new(2.0);
        ema.push(Timed::from((0.0, 0.0))).unwrap();

        let mean = ema.push(Timed::from((2.0, 1.0))).unwrap().unwrap();
        let expected = 1.0 - (-1.0f64).exp();
        assert!((mean - expected).abs() < 1e-12);
    }

    #[test]
    fn test_time_ema_matches_tick_ema() {
        let data = [4.0, 8.0, 1.0, 7.0, 3.0, 3.0, 9.0];
        let mut tick = Ema::new(4);
        let mut timed = TimeEma::matching(4, 0.5);

        for (i, &value) in data.iter().enumerate() {
            let expected = tick.push(value).unwrap().unwrap();
            let actual = timed
                .push(Timed {
                    time: i as f64 * 0.5,
                    value,
                })
                .unwrap()
                .unwrap();
            assert!((expected - actual).abs() < 1e-12, "tick {}", i);
        }
    }

    #[test]
    fn test_time_ema_rejects_out_of_order() {
        let mut ema = TimeEma::new(1.0);
        ema.push(Timed::from((5.0, 1.0))).unwrap();

        let err = ema.push(Timed::from((4.0, 2.0))).err().unwrap();
        assert_eq!(
            err,
            MoverError::OutOfOrder {
                previous: 5.0,
                current: 4.0
            }
        );
        assert_eq!(ema.mean(), Some(1.0));
    }

    #[test]
    fn test_time_ema_std_unsupported() {
        let err = TimeEma::with_std(1.0).err().unwrap();
        assert!(matches!(
            err,
            MoverError::Unsupported {
                feature: "standard deviation",
                ..
            }
        ));
    }

    #[test]
    fn test_time_ema_reset_and_copy() {
        let mut ema = TimeEma::new(1.0);
        ema.push(Timed::from((0.0, 3.0))).unwrap();

        let mut copy = ema.copy().unwrap();
        assert_eq!(copy.push(Timed::from((0.0, 5.0))).unwrap(), Some(3.0));

        ema.reset();
        assert_eq!(ema.push(Timed::from((-10.0, 5.0))).unwrap(), Some(5.0));
    }
}
