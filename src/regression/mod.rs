//! Moving linear regression
//!
//! Fits a least-squares line through the values of a trailing window in
//! O(1) per observation. [`MovingSlope`] emits the slope only,
//! [`MovingRegression`] emits a [`LineFit`] with slope and intercept.
//! Both emit nothing until the window holds two values.

mod linear;

pub use linear::{LineFit, MovingRegression, MovingSlope};
