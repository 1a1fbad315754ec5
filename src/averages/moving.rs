//! Weighted moving mean, variance and geometric mean over a trailing window
//!
//! All variants keep the weighted sums `Σw·x`, `Σw` and `Σw·x²` for the
//! values currently in the window by adding each new value and subtracting
//! each evicted one. A window left with only zero-weight entries has no mean.

use core::fmt::Debug;
use core::marker::PhantomData;

#[cfg(feature = "std")]
use std::boxed::Box;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::math;
use crate::traits::{BoxedMover, Mover, MoverError, Patience};
use crate::window::{History, Window};

/// Observation for weighted movers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sample {
    /// A value with weight 1
    Scalar(f64),
    /// A value with an explicit weight
    Weighted { value: f64, weight: f64 },
}

impl Sample {
    pub fn value(self) -> f64 {
        match self {
            Sample::Scalar(value) | Sample::Weighted { value, .. } => value,
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Sample::Scalar(_) => 1.0,
            Sample::Weighted { weight, .. } => weight,
        }
    }
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample::Scalar(value)
    }
}

impl From<(f64, f64)> for Sample {
    fn from((value, weight): (f64, f64)) -> Self {
        Sample::Weighted { value, weight }
    }
}

/// Mean and (population) standard deviation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
}

/// Weighted sufficient statistics over a window
#[derive(Clone, Debug)]
struct WeightedWindow {
    /// (value, weight) pairs
    history: History<(f64, f64)>,
    /// Observations since the last reset
    count: u64,
    /// Retained entries with a non-zero weight
    live: usize,
    /// Σw·x
    sum: f64,
    /// Σw
    weights: f64,
    /// Σw·x²
    squares: f64,
}

impl WeightedWindow {
    fn new(window: Window) -> Self {
        Self {
            history: History::new(window),
            count: 0,
            live: 0,
            sum: 0.0,
            weights: 0.0,
            squares: 0.0,
        }
    }

    fn push(&mut self, value: f64, weight: f64) {
        self.count += 1;
        if weight != 0.0 {
            self.live += 1;
            self.sum += value * weight;
            self.weights += weight;
            self.squares += weight * value * value;
        }

        if let Some((old, old_weight)) = self.history.slide((value, weight)) {
            if old_weight != 0.0 {
                self.live -= 1;
                self.sum -= old * old_weight;
                self.weights -= old_weight;
                self.squares -= old_weight * old * old;
            }
        }

        // Drop rounding residue once no weighted entry is left
        if self.live == 0 {
            self.sum = 0.0;
            self.weights = 0.0;
            self.squares = 0.0;
        }
    }

    fn has_weight(&self) -> bool {
        self.live > 0 && self.weights != 0.0
    }

    /// Weighted mean, `None` while no weighted entry is retained
    fn mean(&self) -> Option<f64> {
        self.has_weight().then(|| self.sum / self.weights)
    }

    /// Weighted population variance, clamped at zero against rounding
    fn variance(&self) -> Option<f64> {
        if !self.has_weight() {
            return None;
        }
        let variance =
            (self.squares * self.weights - self.sum * self.sum) / (self.weights * self.weights);
        Some(variance.max(0.0))
    }

    fn mean_std(&self) -> Option<MeanStd> {
        Some(MeanStd {
            mean: self.mean()?,
            std: math::sqrt(self.variance()?),
        })
    }

    /// A bounded window is warm once full, an unbounded one after any value
    fn is_warm(&self) -> bool {
        if self.history.window().is_bounded() {
            self.history.is_full()
        } else {
            self.count > 0
        }
    }

    fn clear(&mut self) {
        *self = Self::new(self.history.window());
    }
}

/// What a [`WeightedMean`] averages and emits
///
/// Implemented by the marker types [`Arithmetic`], [`ArithmeticStd`],
/// [`Geometric`] and [`GeometricStd`].
pub trait MeanKind: Clone + Copy + Debug + Default {
    type Output: 'static;

    /// Mover name reported in domain errors
    const NAME: &'static str;

    /// Whether [`MeanKind::finish`] reads the standard deviation
    const SPREAD: bool;

    /// Map an observation to the (value, weight) pair that is averaged
    fn prepare(sample: Sample) -> Result<(f64, f64), MoverError>;

    /// Build the output from the moments of the prepared values
    fn finish(moments: MeanStd) -> Self::Output;
}

/// Plain weighted mean
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Arithmetic;

/// Weighted mean and standard deviation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArithmeticStd;

/// Weighted mean of logs, mapped back through `exp`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometric;

/// Geometric mean and geometric standard deviation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometricStd;

impl MeanKind for Arithmetic {
    type Output = f64;
    const NAME: &'static str = "MovingAverage";
    const SPREAD: bool = false;

    fn prepare(sample: Sample) -> Result<(f64, f64), MoverError> {
        Ok((sample.value(), sample.weight()))
    }

    fn finish(moments: MeanStd) -> f64 {
        moments.mean
    }
}

impl MeanKind for ArithmeticStd {
    type Output = MeanStd;
    const NAME: &'static str = "MovingMeanStd";
    const SPREAD: bool = true;

    fn prepare(sample: Sample) -> Result<(f64, f64), MoverError> {
        Ok((sample.value(), sample.weight()))
    }

    fn finish(moments: MeanStd) -> MeanStd {
        moments
    }
}

impl MeanKind for Geometric {
    type Output = f64;
    const NAME: &'static str = "GeometricAverage";
    const SPREAD: bool = false;

    fn prepare(sample: Sample) -> Result<(f64, f64), MoverError> {
        log_sample(Self::NAME, sample)
    }

    fn finish(moments: MeanStd) -> f64 {
        math::exp(moments.mean)
    }
}

impl MeanKind for GeometricStd {
    type Output = MeanStd;
    const NAME: &'static str = "GeometricMeanStd";
    const SPREAD: bool = true;

    fn prepare(sample: Sample) -> Result<(f64, f64), MoverError> {
        log_sample(Self::NAME, sample)
    }

    fn finish(MeanStd { mean, std }: MeanStd) -> MeanStd {
        MeanStd {
            mean: math::exp(mean),
            std: math::exp(std),
        }
    }
}

/// Log of a strictly positive sample, the domain of geometric means
fn log_sample(mover: &'static str, sample: Sample) -> Result<(f64, f64), MoverError> {
    let value = sample.value();
    if value > 0.0 {
        Ok((math::ln(value), sample.weight()))
    } else {
        Err(MoverError::Domain {
            mover,
            value,
            reason: "geometric mean requires strictly positive values",
        })
    }
}

/// Weighted moving average over the last `n` values
///
/// `MovingAverage::new` takes plain `f64` observations; `MovingAverage::weighted`
/// takes [`Sample`]s carrying an explicit weight. A patient average stays
/// silent until its window is full.
///
/// # Example
///
/// ```
/// use flowmovers::averages::{MovingAverage, Sample};
/// use flowmovers::compose::MoverExt;
/// use flowmovers::traits::Mover;
///
/// let mut ma = MovingAverage::new(3);
/// let outputs = ma.run([1.0, 2.0, 3.0, 3.0, 3.0]).unwrap();
/// assert_eq!(outputs[3], Some(8.0 / 3.0));
///
/// let mut weighted = MovingAverage::weighted(3);
/// assert_eq!(weighted.push(Sample::from((1.0, 1.0))).unwrap(), Some(1.0));
/// assert_eq!(weighted.push(Sample::from((2.0, 0.0))).unwrap(), Some(1.0));
/// assert_eq!(weighted.push(Sample::from(4.0)).unwrap(), Some(2.5));
/// ```
pub type MovingAverage<I = f64> = WeightedMean<Arithmetic, I>;

/// Weighted moving average with standard deviation
///
/// # Example
///
/// ```
/// use flowmovers::averages::MovingMeanStd;
/// use flowmovers::traits::Mover;
///
/// let mut ms = MovingMeanStd::new(3);
/// ms.push(1.0).unwrap();
/// let out = ms.push(2.0).unwrap().unwrap();
///
/// assert_eq!(out.mean, 1.5);
/// assert_eq!(out.std, 0.5);
/// ```
pub type MovingMeanStd<I = f64> = WeightedMean<ArithmeticStd, I>;

/// Weighted geometric moving average
///
/// Averages `ln(x)` and maps the result back through `exp`. Non-positive
/// inputs are rejected with [`MoverError::Domain`] and leave the window
/// untouched.
///
/// # Example
///
/// ```
/// use flowmovers::averages::GeometricAverage;
/// use flowmovers::traits::Mover;
///
/// let mut gma = GeometricAverage::new(2);
/// gma.push(2.0).unwrap();
/// let mean = gma.push(8.0).unwrap().unwrap();
/// assert!((mean - 4.0).abs() < 1e-12);
///
/// assert!(gma.push(0.0).is_err());
/// ```
pub type GeometricAverage<I = f64> = WeightedMean<Geometric, I>;

/// Geometric moving average with geometric standard deviation
///
/// Both fields are `exp` of the mean and standard deviation of `ln(x)`.
pub type GeometricMeanStd<I = f64> = WeightedMean<GeometricStd, I>;

/// Windowed weighted mean, parameterized by what is averaged and emitted
///
/// Usually named through its aliases [`MovingAverage`], [`MovingMeanStd`],
/// [`GeometricAverage`] and [`GeometricMeanStd`]. `I` is `f64` for unit
/// weights or [`Sample`] for explicit weights.
#[derive(Clone, Debug)]
pub struct WeightedMean<K: MeanKind, I = f64> {
    window: WeightedWindow,
    patience: Patience,
    _kind: PhantomData<(K, fn(I))>,
}

impl<K: MeanKind> WeightedMean<K, f64> {
    /// Mean of the `n` most recent values
    pub fn new(n: usize) -> Self {
        Self::with_window(Window::new(n))
    }

    /// Mean of every value since the last reset
    pub fn unbounded() -> Self {
        Self::with_window(Window::Unbounded)
    }
}

impl<K: MeanKind> WeightedMean<K, Sample> {
    /// Weighted mean of the `n` most recent samples
    pub fn weighted(n: usize) -> Self {
        Self::with_window(Window::new(n))
    }
}

impl<K: MeanKind, I> WeightedMean<K, I> {
    pub fn with_window(window: Window) -> Self {
        Self {
            window: WeightedWindow::new(window),
            patience: Patience::default(),
            _kind: PhantomData,
        }
    }

    pub fn window(&self) -> Window {
        self.window.history.window()
    }
}

impl<I> WeightedMean<Arithmetic, I> {
    /// Current mean, `None` while no weighted entry is retained
    pub fn mean(&self) -> Option<f64> {
        self.window.mean()
    }
}

impl<I> WeightedMean<ArithmeticStd, I> {
    /// Current weighted population variance
    pub fn variance(&self) -> Option<f64> {
        self.window.variance()
    }
}

impl<K, I> Mover for WeightedMean<K, I>
where
    K: MeanKind + 'static,
    I: Into<Sample> + Clone + 'static,
{
    type Input = I;
    type Output = K::Output;

    fn eat(&mut self, input: I) -> Result<Option<K::Output>, MoverError> {
        let (value, weight) = K::prepare(input.into())?;
        self.window.push(value, weight);

        let moments = if K::SPREAD {
            self.window.mean_std()
        } else {
            self.window.mean().map(|mean| MeanStd { mean, std: 0.0 })
        };
        Ok(moments.map(K::finish))
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

    fn copy(&self) -> Result<BoxedMover<I, K::Output>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::MoverExt;
    use crate::traits::Signal;

    const DATA: [f64; 5] = [1.0, 2.0, 3.0, 3.0, 3.0];

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {} got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_moving_average() {
        let mut ma = MovingAverage::new(3);
        let outputs = ma.run(DATA).unwrap();

        for (actual, expected) in outputs.into_iter().zip([1.0, 1.5, 2.0, 2.6666666666666665, 3.0]) {
            assert_close(actual, expected);
        }
    }

    #[test]
    fn test_moving_std() {
        let mut ms = MovingMeanStd::new(3);
        let outputs = ms.run(DATA).unwrap();

        let stds = [0.0, 0.5, 0.816496580927726, 0.4714045207910318, 0.0];
        for (actual, expected) in outputs.into_iter().zip(stds) {
            assert_close(actual.map(|out| out.std), expected);
        }
    }

    #[test]
    fn test_weighted_average() {
        let weights = [1.0, 0.0, 1.0, 0.0, 1.0];
        let mut ma = MovingAverage::weighted(3);

        let outputs = ma
            .run(DATA.into_iter().zip(weights).map(Sample::from))
            .unwrap();

        assert_eq!(outputs, vec![Some(1.0), Some(1.0), Some(2.0), Some(3.0), Some(3.0)]);
    }

    #[test]
    fn test_zero_weight_is_insufficient_data() {
        let mut ma = MovingAverage::weighted(2);
        assert_eq!(ma.push(Sample::Weighted { value: 5.0, weight: 0.0 }).unwrap(), None);
        assert_eq!(ma.push(Sample::Scalar(3.0)).unwrap(), Some(3.0));
    }

    #[test]
    fn test_window_of_zero_weights_has_no_mean() {
        // 0.1 + 0.2 - 0.1 - 0.2 leaves a residue in Σw without the live count
        let samples = [(3.0, 0.1), (3.0, 0.2), (5.0, 0.0), (7.0, 0.0)].map(Sample::from);

        let mut ma = MovingAverage::weighted(2);
        let outputs = ma.run(samples).unwrap();
        for actual in &outputs[..3] {
            assert_close(*actual, 3.0);
        }
        assert_eq!(outputs[3], None);
        assert_eq!(ma.mean(), None);

        let mut ms = MovingMeanStd::weighted(2);
        let outputs = ms.run(samples).unwrap();
        assert_close(outputs[2].map(|out| out.mean), 3.0);
        assert_eq!(outputs[3], None);
        assert_eq!(ms.variance(), None);

        // Weight re-entering the window restores the mean
        assert_eq!(ma.push(Sample::from((4.0, 0.5))).unwrap(), Some(4.0));
    }

    #[test]
    fn test_shared_kind_across_aliases() {
        let mut generic: WeightedMean<Geometric> = WeightedMean::new(2);
        let mut alias = GeometricAverage::new(2);
        for x in [1.0, 4.0, 16.0] {
            assert_eq!(generic.push(x).unwrap(), alias.push(x).unwrap());
        }
        assert_eq!(Geometric::NAME, "GeometricAverage");
    }

    #[test]
    fn test_variance_never_negative() {
        let mut ms = MovingMeanStd::new(4);
        for _ in 0..1000 {
            let out = ms.push(0.1).unwrap().unwrap();
            assert!(out.std >= 0.0);
            assert!(!out.std.is_nan());
        }
    }

    #[test]
    fn test_patient_average_waits_for_full_window() {
        let mut ma = MovingAverage::new(3).patient();
        let outputs = ma.run(DATA).unwrap();

        assert_eq!(outputs[0], None);
        assert_eq!(outputs[1], None);
        assert_eq!(outputs[2], Some(2.0));

        ma.feed(Signal::Reset).unwrap();
        assert_eq!(ma.push(1.0).unwrap(), None);
    }

    #[test]
    fn test_unbounded_patient_average() {
        let mut ma = MovingAverage::unbounded().patient();
        assert_eq!(ma.push(4.0).unwrap(), Some(4.0));
        assert_eq!(ma.push(2.0).unwrap(), Some(3.0));
    }

    #[test]
    fn test_geometric_average() {
        let mut gma = GeometricAverage::new(3);
        let outputs = gma.run([1.0, 4.0, 16.0, 1.0]).unwrap();

        assert_close(outputs[0], 1.0);
        assert_close(outputs[1], 2.0);
        assert_close(outputs[2], 4.0);
        assert_close(outputs[3], 4.0);
    }

    #[test]
    fn test_geometric_rejects_non_positive() {
        let mut gma = GeometricAverage::new(3);
        gma.push(2.0).unwrap();

        let err = gma.push(-1.0).err().unwrap();
        assert!(matches!(err, MoverError::Domain { value, .. } if value == -1.0));
        assert!(gma.push(f64::NAN).is_err());

        // Rejected values never entered the window
        assert_close(gma.push(8.0).unwrap(), 4.0);
    }

    #[test]
    fn test_geometric_std() {
        let mut gms = GeometricMeanStd::new(2);
        gms.push(1.0).unwrap();
        let out = gms.push(core::f64::consts::E * core::f64::consts::E).unwrap().unwrap();

        // ln values 0 and 2: mean 1, std 1
        assert!((out.mean - core::f64::consts::E).abs() < 1e-9);
        assert!((out.std - core::f64::consts::E).abs() < 1e-9);
    }

    #[test]
    fn test_copy_keeps_window() {
        let mut ma = MovingAverage::new(2);
        ma.run([2.0, 4.0]).unwrap();

        let mut copy = ma.copy().unwrap();
        assert_eq!(copy.push(6.0).unwrap(), Some(5.0));
        assert_eq!(ma.push(0.0).unwrap(), Some(2.0));
    }
}
