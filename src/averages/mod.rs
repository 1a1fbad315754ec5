//! Windowed aggregates: sums, means, variances
//!
//! Every mover here updates a small set of running sums by adding the new
//! observation and subtracting the one that fell out of the window, so the
//! cost per observation does not depend on the window length.
//!
//! # Algorithms
//!
//! - [`MovingSum`]: running sum
//! - [`MovingAverage`] / [`MovingMeanStd`]: weighted moving mean (and std)
//! - [`GeometricAverage`] / [`GeometricMeanStd`]: moving mean of logs
//! - [`Ema`] / [`EmaStd`]: exponential moving mean (and std), tick-indexed
//! - [`TimeEma`]: exponential moving mean over irregular timestamps
//!
//! The four windowed means share one generic mover, [`WeightedMean`], and
//! differ only in their [`MeanKind`] marker.
//!
//! # Example
//!
//! ```
//! use flowmovers::averages::{Ema, MovingAverage};
//! use flowmovers::traits::Mover;
//!
//! let mut ma = MovingAverage::new(3);
//! let mut ema = Ema::new(3);
//!
//! for price in [10.0, 11.0, 12.0, 11.5] {
//!     let slow = ma.push(price).unwrap();
//!     let fast = ema.push(price).unwrap();
//!     println!("ma={:?} ema={:?}", slow, fast);
//! }
//! ```

mod exponential;
mod moving;
mod sum;

pub use exponential::{Ema, EmaStd, TimeEma, Timed};
pub use moving::{
    Arithmetic, ArithmeticStd, Geometric, GeometricAverage, GeometricMeanStd, GeometricStd, MeanKind,
    MeanStd, MovingAverage, MovingMeanStd, Sample, WeightedMean,
};
pub use sum::MovingSum;
