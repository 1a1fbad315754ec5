//! Elementwise combinators over movers sharing one input stream
//!
//! A [`Compound`] feeds the same observation to each operand and applies an
//! arithmetic [`Op`] to their outputs; a [`Comparison`] does the same with a
//! [`Cmp`] and emits booleans. Plain numbers become [`Constant`] movers.

use core::fmt;
use core::marker::PhantomData;

#[cfg(feature = "std")]
use std::{boxed::Box, vec, vec::Vec};

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec, vec::Vec};

use super::ready;
use crate::math;
use crate::traits::{BoxedMover, Mover, MoverError, Patience};

/// Anything usable as a combinator operand
///
/// Implemented for every `f64`-valued mover and for plain `f64`, which is
/// lifted into a [`Constant`].
pub trait IntoOperand<I> {
    fn into_operand(self) -> BoxedMover<I, f64>;
}

impl<I: 'static> IntoOperand<I> for f64 {
    fn into_operand(self) -> BoxedMover<I, f64> {
        Box::new(Constant::new(self))
    }
}

impl<I, M> IntoOperand<I> for M
where
    M: Mover<Input = I, Output = f64> + 'static,
{
    fn into_operand(self) -> BoxedMover<I, f64> {
        Box::new(self)
    }
}

/// Mover that ignores its input and always emits the same value
pub struct Constant<I> {
    value: f64,
    patience: Patience,
    _input: PhantomData<fn(I)>,
}

impl<I> Constant<I> {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            patience: Patience::default(),
            _input: PhantomData,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl<I> Clone for Constant<I> {
    fn clone(&self) -> Self {
        Self {
            value: self.value,
            patience: self.patience,
            _input: PhantomData,
        }
    }
}

impl<I> fmt::Debug for Constant<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constant").field("value", &self.value).finish()
    }
}

impl<I: 'static> Mover for Constant<I> {
    type Input = I;
    type Output = f64;

    fn eat(&mut self, _input: I) -> Result<Option<f64>, MoverError> {
        Ok(Some(self.value))
    }

    fn zero(&mut self) {}

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn copy(&self) -> Result<BoxedMover<I, f64>, MoverError> {
        Ok(Box::new(self.clone()))
    }
}

/// Arithmetic operation applied by a [`Compound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    Neg,
    Abs,
    Add,
    Sub,
    Mul,
    Div,
    /// Division rounded toward negative infinity
    FloorDiv,
    /// Remainder with the sign of the dividend
    Rem,
    Pow,
    Min,
    Max,
}

impl Op {
    /// Number of operands the operation takes
    pub fn arity(self) -> usize {
        match self {
            Op::Neg | Op::Abs => 1,
            _ => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::Neg => "neg",
            Op::Abs => "abs",
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
            Op::FloorDiv => "floordiv",
            Op::Rem => "rem",
            Op::Pow => "pow",
            Op::Min => "min",
            Op::Max => "max",
        }
    }

    /// Apply to operand outputs; `rhs` is ignored by unary operations
    pub fn apply(self, lhs: f64, rhs: Option<f64>) -> f64 {
        match (self, rhs) {
            (Op::Neg, _) => -lhs,
            (Op::Abs, _) => math::abs(lhs),
            (Op::Add, Some(rhs)) => lhs + rhs,
            (Op::Sub, Some(rhs)) => lhs - rhs,
            (Op::Mul, Some(rhs)) => lhs * rhs,
            (Op::Div, Some(rhs)) => lhs / rhs,
            (Op::FloorDiv, Some(rhs)) => math::floor(lhs / rhs),
            (Op::Rem, Some(rhs)) => lhs % rhs,
            (Op::Pow, Some(rhs)) => math::powf(lhs, rhs),
            (Op::Min, Some(rhs)) => lhs.min(rhs),
            (Op::Max, Some(rhs)) => lhs.max(rhs),
            // Binary operation without its second operand
            (_, None) => f64::NAN,
        }
    }
}

/// Comparison applied by a [`Comparison`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cmp {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl Cmp {
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Cmp::Lt => lhs < rhs,
            Cmp::Le => lhs <= rhs,
            Cmp::Eq => lhs == rhs,
            Cmp::Ne => lhs != rhs,
            Cmp::Gt => lhs > rhs,
            Cmp::Ge => lhs >= rhs,
        }
    }
}

/// Elementwise arithmetic over one or two operand movers
///
/// Every operand sees every observation, even on ticks where another
/// operand's output is suppressed; the combined output is `None` whenever
/// any operand's output is.
///
/// # Example
///
/// ```
/// use flowmovers::averages::MovingAverage;
/// use flowmovers::compose::{Compound, Op};
/// use flowmovers::extrema::MovingMax;
/// use flowmovers::traits::Mover;
///
/// // Distance of the window maximum above the window mean
/// let mut spread = Compound::binary(Op::Sub, MovingMax::new(3), MovingAverage::new(3)).unwrap();
///
/// assert_eq!(spread.push(1.0).unwrap(), Some(0.0));
/// assert_eq!(spread.push(3.0).unwrap(), Some(1.0));
/// ```
pub struct Compound<I> {
    op: Op,
    lhs: BoxedMover<I, f64>,
    rhs: Option<BoxedMover<I, f64>>,
    patience: Patience,
}

impl<I: Clone + 'static> Compound<I> {
    /// Combine operands with `op`, checking the operand count
    pub fn new(op: Op, operands: Vec<BoxedMover<I, f64>>) -> Result<Self, MoverError> {
        let arity_error = MoverError::Arity {
            op: op.name(),
            expected: op.arity(),
            found: operands.len(),
        };
        if operands.len() != op.arity() {
            return Err(arity_error);
        }

        let mut operands = operands.into_iter();
        let lhs = operands.next().ok_or(arity_error)?;
        Ok(Self::from_parts(op, lhs, operands.next()))
    }

    pub fn unary(op: Op, operand: impl IntoOperand<I>) -> Result<Self, MoverError> {
        Self::new(op, vec![operand.into_operand()])
    }

    pub fn binary(
        op: Op,
        lhs: impl IntoOperand<I>,
        rhs: impl IntoOperand<I>,
    ) -> Result<Self, MoverError> {
        Self::new(op, vec![lhs.into_operand(), rhs.into_operand()])
    }

    /// Assemble without checking arity; callers pass operands matching `op`
    pub(crate) fn from_parts(op: Op, lhs: BoxedMover<I, f64>, rhs: Option<BoxedMover<I, f64>>) -> Self {
        Self {
            op,
            lhs,
            rhs,
            patience: Patience::default(),
        }
    }

    pub fn op(&self) -> Op {
        self.op
    }
}

impl<I> fmt::Debug for Compound<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compound")
            .field("op", &self.op)
            .finish_non_exhaustive()
    }
}

impl<I: Clone + 'static> Mover for Compound<I> {
    type Input = I;
    type Output = f64;

    fn eat(&mut self, input: I) -> Result<Option<f64>, MoverError> {
        let lhs = self.lhs.push(input.clone());
        let rhs = self.rhs.as_mut().map(|rhs| rhs.push(input));
        let (lhs, rhs) = (lhs?, rhs.transpose()?);

        Ok(match (lhs, rhs) {
            (Some(lhs), None) => Some(self.op.apply(lhs, None)),
            (Some(lhs), Some(Some(rhs))) => Some(self.op.apply(lhs, Some(rhs))),
            _ => None,
        })
    }

    fn zero(&mut self) {
        self.lhs.reset();
        if let Some(rhs) = self.rhs.as_mut() {
            rhs.reset();
        }
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn triggered(&self) -> bool {
        ready(&self.lhs) && self.rhs.as_ref().map_or(true, ready)
    }

    fn is_patient(&self) -> bool {
        self.lhs.is_patient() || self.rhs.as_ref().is_some_and(|rhs| rhs.is_patient())
    }

    fn set_patient(&mut self, patient: bool) {
        self.lhs.set_patient(patient);
        if let Some(rhs) = self.rhs.as_mut() {
            rhs.set_patient(patient);
        }
    }

    fn copy(&self) -> Result<BoxedMover<I, f64>, MoverError> {
        Ok(Box::new(Self {
            op: self.op,
            lhs: self.lhs.copy()?,
            rhs: self.rhs.as_ref().map(|rhs| rhs.copy()).transpose()?,
            patience: self.patience,
        }))
    }
}

/// Elementwise comparison of two operand movers
///
/// # Example
///
/// ```
/// use flowmovers::averages::{Ema, MovingAverage};
/// use flowmovers::compose::{Cmp, Comparison};
/// use flowmovers::traits::Mover;
///
/// // Fast average above slow average
/// let mut cross = Comparison::new(Cmp::Gt, Ema::new(2), MovingAverage::new(4));
///
/// let outputs: Vec<_> = [1.0, 2.0, 3.0, 4.0]
///     .into_iter()
///     .map(|v| cross.push(v).unwrap())
///     .collect();
/// assert_eq!(outputs, vec![Some(false), Some(true), Some(true), Some(true)]);
/// ```
pub struct Comparison<I> {
    cmp: Cmp,
    lhs: BoxedMover<I, f64>,
    rhs: BoxedMover<I, f64>,
    patience: Patience,
}

impl<I: Clone + 'static> Comparison<I> {
    pub fn new(cmp: Cmp, lhs: impl IntoOperand<I>, rhs: impl IntoOperand<I>) -> Self {
        Self {
            cmp,
            lhs: lhs.into_operand(),
            rhs: rhs.into_operand(),
            patience: Patience::default(),
        }
    }

    pub fn cmp(&self) -> Cmp {
        self.cmp
    }
}

impl<I> fmt::Debug for Comparison<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparison")
            .field("cmp", &self.cmp)
            .finish_non_exhaustive()
    }
}

impl<I: Clone + 'static> Mover for Comparison<I> {
    type Input = I;
    type Output = bool;

    fn eat(&mut self, input: I) -> Result<Option<bool>, MoverError> {
        let lhs = self.lhs.push(input.clone());
        let rhs = self.rhs.push(input);

        Ok(match (lhs?, rhs?) {
            (Some(lhs), Some(rhs)) => Some(self.cmp.apply(lhs, rhs)),
            _ => None,
        })
    }

    fn zero(&mut self) {
        self.lhs.reset();
        self.rhs.reset();
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn triggered(&self) -> bool {
        ready(&self.lhs) && ready(&self.rhs)
    }

    fn is_patient(&self) -> bool {
        self.lhs.is_patient() || self.rhs.is_patient()
    }

    fn set_patient(&mut self, patient: bool) {
        self.lhs.set_patient(patient);
        self.rhs.set_patient(patient);
    }

    fn copy(&self) -> Result<BoxedMover<I, bool>, MoverError> {
        Ok(Box::new(Self {
            cmp: self.cmp,
            lhs: self.lhs.copy()?,
            rhs: self.rhs.copy()?,
            patience: self.patience,
        }))
    }
}
