//! Composition algebra over movers
//!
//! - [`Compound`] / [`Comparison`]: elementwise arithmetic and comparisons
//!   over movers fed the same input
//! - [`Chain`]: sequential composition, output of one feeds the next
//! - [`Constant`]: a number lifted into a mover
//! - [`Delay`] / [`MovingRatio`]: lagged values and ratios
//!
//! [`MoverExt`] offers all of these as methods on any mover.
//!
//! # Example
//!
//! ```
//! use flowmovers::averages::MovingAverage;
//! use flowmovers::compose::MoverExt;
//! use flowmovers::extrema::{MovingMax, MovingMin};
//!
//! // Window range as a fraction of the window mean
//! let mut relative_range = MovingMax::new(3)
//!     .minus(MovingMin::new(3))
//!     .divided_by(MovingAverage::new(3));
//!
//! let outputs = relative_range.run([2.0, 4.0, 6.0]).unwrap();
//! assert_eq!(outputs, vec![Some(0.0), Some(2.0 / 3.0), Some(1.0)]);
//! ```

mod chain;
mod compound;
mod delay;

pub use chain::Chain;
pub use compound::{Cmp, Comparison, Compound, Constant, IntoOperand, Op};
pub use delay::{Delay, MovingRatio};

#[cfg(feature = "std")]
use std::{boxed::Box, vec::Vec};

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::traits::{BoxedMover, Mover, MoverError};

/// Whether a combinator operand lets its output through
pub(crate) fn ready<M: Mover + ?Sized>(mover: &M) -> bool {
    !mover.is_patient() || mover.triggered()
}

/// Combinator methods available on every mover
pub trait MoverExt: Mover + Sized {
    /// Feed this mover's outputs into `next`
    fn then<N>(self, next: N) -> Chain<Self, N>
    where
        N: Mover<Input = Self::Output>,
    {
        Chain::new(self, next)
    }

    /// Emit this mover's output from `n` ticks earlier
    ///
    /// The delay stage is patient, so nothing is emitted until `n` earlier
    /// outputs exist. `lagged(0)` passes every output through.
    fn lagged(self, n: usize) -> Chain<Self, Delay<Self::Output>>
    where
        Self::Output: Clone + 'static,
    {
        Chain::new(self, Delay::new(n).patient())
    }

    /// Builder form of [`Mover::set_patient`]
    fn patient(mut self) -> Self {
        self.set_patient(true);
        self
    }

    fn boxed(self) -> BoxedMover<Self::Input, Self::Output>
    where
        Self: 'static,
    {
        Box::new(self)
    }

    /// Combine with `rhs` through a binary operation
    fn combine<R>(self, op: Op, rhs: R) -> Result<Compound<Self::Input>, MoverError>
    where
        Self: Mover<Output = f64> + 'static,
        Self::Input: Clone + 'static,
        R: IntoOperand<Self::Input>,
    {
        Compound::binary(op, self, rhs)
    }

    fn plus<R>(self, rhs: R) -> Compound<Self::Input>
    where
        Self: Mover<Output = f64> + 'static,
        Self::Input: Clone + 'static,
        R: IntoOperand<Self::Input>,
    {
        Compound::from_parts(Op::Add, Box::new(self), Some(rhs.into_operand()))
    }

    fn minus<R>(self, rhs: R) -> Compound<Self::Input>
    where
        Self: Mover<Output = f64> + 'static,
        Self::Input: Clone + 'static,
        R: IntoOperand<Self::Input>,
    {
        Compound::from_parts(Op::Sub, Box::new(self), Some(rhs.into_operand()))
    }

    fn times<R>(self, rhs: R) -> Compound<Self::Input>
    where
        Self: Mover<Output = f64> + 'static,
        Self::Input: Clone + 'static,
        R: IntoOperand<Self::Input>,
    {
        Compound::from_parts(Op::Mul, Box::new(self), Some(rhs.into_operand()))
    }

    fn divided_by<R>(self, rhs: R) -> Compound<Self::Input>
    where
        Self: Mover<Output = f64> + 'static,
        Self::Input: Clone + 'static,
        R: IntoOperand<Self::Input>,
    {
        Compound::from_parts(Op::Div, Box::new(self), Some(rhs.into_operand()))
    }

    fn negated(self) -> Compound<Self::Input>
    where
        Self: Mover<Output = f64> + 'static,
        Self::Input: Clone + 'static,
    {
        Compound::from_parts(Op::Neg, Box::new(self), None)
    }

    fn absolute(self) -> Compound<Self::Input>
    where
        Self: Mover<Output = f64> + 'static,
        Self::Input: Clone + 'static,
    {
        Compound::from_parts(Op::Abs, Box::new(self), None)
    }

    fn compare<R>(self, cmp: Cmp, rhs: R) -> Comparison<Self::Input>
    where
        Self: Mover<Output = f64> + 'static,
        Self::Input: Clone + 'static,
        R: IntoOperand<Self::Input>,
    {
        Comparison::new(cmp, self, rhs)
    }

    /// Feed every input in order and collect each tick's output
    fn run<It>(&mut self, inputs: It) -> Result<Vec<Option<Self::Output>>, MoverError>
    where
        It: IntoIterator<Item = Self::Input>,
    {
        inputs.into_iter().map(|input| self.push(input)).collect()
    }
}

impl<M: Mover> MoverExt for M {}

#[cfg(all(test, feature = "averages", feature = "extrema"))]
mod tests {
    use super::*;
    use crate::averages::{MovingAverage, MovingSum};
    use crate::extrema::MovingMax;
    use crate::traits::Signal;

    #[test]
    fn test_plus_constant() {
        let mut shifted = MovingSum::new(2).plus(10.0);
        assert_eq!(shifted.run([1.0, 2.0, 3.0]).unwrap(), vec![Some(11.0), Some(13.0), Some(15.0)]);
    }

    #[test]
    fn test_nested_arithmetic() {
        // -(sum - max) * 2
        let mut mover = MovingSum::new(3)
            .minus(MovingMax::new(3))
            .negated()
            .times(2.0);

        assert_eq!(mover.run([1.0, 5.0, 2.0]).unwrap(), vec![Some(-0.0), Some(-2.0), Some(-6.0)]);
    }

    #[test]
    fn test_combine_checks_arity() {
        assert!(MovingSum::new(2).combine(Op::Abs, 1.0).is_err());
        assert!(MovingSum::new(2).combine(Op::Pow, 2.0).is_ok());
    }

    #[test]
    fn test_compare_against_average() {
        let mut above = MovingMax::new(2).compare(Cmp::Gt, MovingAverage::new(2));

        assert_eq!(
            above.run([1.0, 1.0, 3.0]).unwrap(),
            vec![Some(false), Some(false), Some(true)]
        );
    }

    #[test]
    fn test_lagged_is_patient() {
        let mut lagged = MovingSum::unbounded().lagged(2);

        assert!(lagged.is_patient());
        assert_eq!(
            lagged.run([1.0, 1.0, 1.0, 1.0]).unwrap(),
            vec![None, None, Some(1.0), Some(2.0)]
        );
    }

    #[test]
    fn test_lagged_by_zero_passes_through() {
        let mut lagged = MovingSum::new(1).lagged(0);

        assert!(lagged.is_patient());
        assert_eq!(
            lagged.run([3.0, 1.0, 4.0]).unwrap(),
            vec![Some(3.0), Some(1.0), Some(4.0)]
        );
    }

    #[test]
    fn test_then_chains_three_stages() {
        let mut pipeline = MovingSum::new(2)
            .then(MovingAverage::new(2))
            .then(MovingMax::unbounded());

        assert_eq!(
            pipeline.run([2.0, 2.0, 0.0, 0.0]).unwrap(),
            vec![Some(2.0), Some(3.0), Some(3.0), Some(3.0)]
        );

        pipeline.feed(Signal::Reset).unwrap();
        assert_eq!(pipeline.push(1.0).unwrap(), Some(1.0));
    }

    #[test]
    fn test_boxed_operands() {
        let operand = MovingSum::new(1).boxed();
        let mut mover = operand.plus(MovingSum::new(1).boxed());

        assert_eq!(mover.push(4.0).unwrap(), Some(8.0));
    }
}
