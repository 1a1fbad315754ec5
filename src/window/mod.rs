//! Window primitives shared by the movers
//!
//! - [`History`]: bounded FIFO of raw values that reports evictions
//! - [`MonotonicQueue`]: sliding-window extremum via a monotonic deque
//!
//! # Example
//!
//! ```
//! use flowmovers::window::{History, MinQueue};
//!
//! let mut history = History::with_len(2);
//! let mut lows = MinQueue::with_len(2);
//!
//! let mut sum = 0.0;
//! for value in [4.0, 2.0, 5.0] {
//!     sum += value - history.push(value).unwrap_or(0.0);
//!     lows.push(value);
//! }
//!
//! assert_eq!(sum, 7.0);
//! assert_eq!(lows.head().unwrap(), 2.0);
//! ```

mod history;
mod monotonic;

pub use history::{History, Window};
pub use monotonic::{Direction, Max, MaxQueue, Min, MinQueue, MonotonicQueue};
