//! Sliding-window extrema
//!
//! [`MovingMax`] and [`MovingMin`] report the extremum of a trailing window
//! in amortized O(1) per observation, using a monotonic queue whose physical
//! size is usually far below the window length.
//!
//! # Example
//!
//! ```
//! use flowmovers::extrema::{MovingMax, MovingMin};
//! use flowmovers::traits::Mover;
//!
//! let mut high = MovingMax::new(20);
//! let mut low = MovingMin::new(20);
//!
//! for price in [100.0, 101.5, 99.0, 102.0] {
//!     high.push(price).unwrap();
//!     low.push(price).unwrap();
//! }
//!
//! assert_eq!(high.max(), Some(102.0));
//! assert_eq!(low.min(), Some(99.0));
//! ```

mod moving;

pub use moving::{MovingExtremum, MovingMax, MovingMin};
