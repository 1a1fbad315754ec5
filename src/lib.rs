//! # Flowmovers
//!
//! Incremental sliding-window statistics for Rust.
//!
//! A *mover* consumes one observation at a time and emits an updated
//! statistic in O(1) amortized time per observation, regardless of the
//! window length. Movers compose: outputs chain into other movers, and
//! movers fed the same input combine arithmetically.
//!
//! ## Features
//!
//! - **Moving Aggregates**: sums, weighted means and standard deviations
//! - **Geometric Means**: moving mean and spread of logarithms
//! - **Exponential Averages**: tick-indexed and time-indexed EMAs
//! - **Moving Extrema**: windowed max/min with monotonic queues
//! - **Moving Regression**: slope and intercept over window positions
//! - **Composition**: chains, lags, ratios, arithmetic and comparisons
//!
//! ## Quick Start
//!
//! ```rust
//! use flowmovers::prelude::*;
//!
//! let mut ma = MovingAverage::new(3);
//! let outputs: Vec<_> = [1.0, 2.0, 3.0, 4.0]
//!     .into_iter()
//!     .map(|x| ma.push(x).unwrap())
//!     .collect();
//!
//! assert_eq!(outputs, vec![Some(1.0), Some(1.5), Some(2.0), Some(3.0)]);
//! ```
//!
//! ## Patience and Reset
//!
//! A patient mover stays silent until its window has warmed up, and a
//! [`Signal::Reset`](traits::Signal::Reset) tick returns any mover to its
//! zero state:
//!
//! ```rust
//! use flowmovers::prelude::*;
//!
//! let mut ma = MovingAverage::new(3).patient();
//! assert_eq!(ma.push(1.0).unwrap(), None);
//! assert_eq!(ma.push(2.0).unwrap(), None);
//! assert_eq!(ma.push(3.0).unwrap(), Some(2.0));
//!
//! assert_eq!(ma.feed(Signal::Reset).unwrap(), None);
//! assert_eq!(ma.push(4.0).unwrap(), None);
//! ```
//!
//! ## Feature Flags
//!
//! Mover families (pick what you need):
//! - `averages` (default): sums, moving/geometric/exponential averages
//! - `extrema` (default): moving max and min
//! - `regression` (default): moving slope and linear fit
//! - `full`: Enable all mover families
//!
//! Platform features:
//! - `std` (default): Standard library support
//! - `serde`: Enable serialization of value types

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core traits and window primitives always available
pub mod compose;
mod math;
pub mod traits;
pub mod window;

#[cfg(feature = "averages")]
#[cfg_attr(docsrs, doc(cfg(feature = "averages")))]
pub mod averages;

#[cfg(feature = "extrema")]
#[cfg_attr(docsrs, doc(cfg(feature = "extrema")))]
pub mod extrema;

#[cfg(feature = "regression")]
#[cfg_attr(docsrs, doc(cfg(feature = "regression")))]
pub mod regression;

pub mod prelude {
    pub use crate::compose::MoverExt;
    pub use crate::traits::*;
    pub use crate::window::Window;

    #[cfg(feature = "averages")]
    pub use crate::averages::{
        Ema, EmaStd, GeometricAverage, GeometricMeanStd, MovingAverage, MovingMeanStd, MovingSum,
        Sample, TimeEma, Timed,
    };

    #[cfg(feature = "extrema")]
    pub use crate::extrema::{MovingMax, MovingMin};

    #[cfg(feature = "regression")]
    pub use crate::regression::{LineFit, MovingRegression, MovingSlope};
}

pub use traits::{Mover, MoverError, Signal};

#[cfg(feature = "averages")]
pub use averages::{Ema, MovingAverage, MovingSum};

#[cfg(feature = "extrema")]
pub use extrema::{MovingMax, MovingMin};

#[cfg(feature = "regression")]
pub use regression::MovingSlope;
