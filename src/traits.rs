//! Core traits for streaming movers
//!
//! Every mover implements the base [`Mover`] trait: an update hook
//! ([`Mover::eat`]), a reset hook ([`Mover::zero`]), and the patience gate
//! that [`Mover::feed`] wraps around them.

#[cfg(feature = "std")]
use std::boxed::Box;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

/// A boxed, type-erased mover
pub type BoxedMover<I, O> = Box<dyn Mover<Input = I, Output = O>>;

/// One tick of input: either an observation or the reset signal
///
/// The reset signal lives outside the data domain, so every value of `T`
/// (including NaN or infinities for floats) is a legal observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Signal<T> {
    /// A regular observation
    Value(T),
    /// Return the mover to its zero state
    Reset,
}

impl<T> From<T> for Signal<T> {
    fn from(value: T) -> Self {
        Signal::Value(value)
    }
}

/// Error raised while feeding or querying a mover
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoverError {
    /// Input outside the numeric domain of the mover
    #[error("{mover}: value {value} is out of domain ({reason})")]
    Domain {
        mover: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// The mover does not implement the requested feature
    #[error("{mover} does not support {feature}")]
    Unsupported {
        mover: &'static str,
        feature: &'static str,
    },
    /// Extremum requested from a queue that holds nothing
    #[error("queue has no head (it is empty)")]
    Empty,
    /// Wrong number of operands for a combinator operation
    #[error("{op} takes {expected} operand(s), found {found}")]
    Arity {
        op: &'static str,
        expected: usize,
        found: usize,
    },
    /// Timestamp earlier than the previous observation
    #[error("observation at {current} precedes previous observation at {previous}")]
    OutOfOrder { previous: f64, current: f64 },
}

/// Patience state shared by all movers
///
/// A patient mover suppresses its output until it is triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Patience {
    patient: bool,
    triggered: bool,
}

impl Patience {
    /// Create a new, untriggered patience record
    pub fn new(patient: bool) -> Self {
        Self {
            patient,
            triggered: false,
        }
    }

    /// Whether output is withheld until triggered
    pub fn is_patient(&self) -> bool {
        self.patient
    }

    pub fn set_patient(&mut self, patient: bool) {
        self.patient = patient;
    }

    /// Stored trigger flag
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Mark as triggered; stays set until [`Patience::disarm`]
    pub fn trigger(&mut self) {
        self.triggered = true;
    }

    /// Clear the trigger flag
    pub fn disarm(&mut self) {
        self.triggered = false;
    }
}

/// Core trait for all movers
///
/// Implementors supply the update step ([`eat`](Mover::eat)) and the reset
/// step ([`zero`](Mover::zero)); [`feed`](Mover::feed) dispatches reset
/// signals and applies patience on top of them.
///
/// # Example
///
/// ```
/// use flowmovers::averages::MovingSum;
/// use flowmovers::traits::{Mover, Signal};
///
/// let mut sum = MovingSum::new(2);
/// assert_eq!(sum.push(1.0).unwrap(), Some(1.0));
/// assert_eq!(sum.push(2.0).unwrap(), Some(3.0));
/// assert_eq!(sum.push(4.0).unwrap(), Some(6.0));
///
/// assert_eq!(sum.feed(Signal::Reset).unwrap(), None);
/// assert_eq!(sum.push(5.0).unwrap(), Some(5.0));
/// ```
pub trait Mover {
    /// The type of observation consumed per tick
    type Input;
    /// The statistic emitted per tick
    type Output;

    /// Update state with a new observation and produce the candidate output
    ///
    /// `Ok(None)` means the statistic is not defined yet (insufficient data).
    fn eat(&mut self, input: Self::Input) -> Result<Option<Self::Output>, MoverError>;

    /// Reset accumulated state to the zero state, keeping configuration
    fn zero(&mut self);

    /// Patience record of this mover
    fn patience(&self) -> &Patience;

    fn patience_mut(&mut self) -> &mut Patience;

    /// Whether a patient mover may emit
    ///
    /// Defaults to the stored flag, set after the first successful update.
    /// Windowed movers override this with a predicate over their state.
    fn triggered(&self) -> bool {
        self.patience().is_triggered()
    }

    fn is_patient(&self) -> bool {
        self.patience().is_patient()
    }

    fn set_patient(&mut self, patient: bool) {
        self.patience_mut().set_patient(patient);
    }

    /// Feed one tick
    ///
    /// [`Signal::Reset`] returns the mover to its zero state and yields
    /// `Ok(None)`. A value runs the update step; a patient mover that is not
    /// yet triggered yields `Ok(None)` in place of the candidate.
    fn feed(&mut self, signal: Signal<Self::Input>) -> Result<Option<Self::Output>, MoverError> {
        match signal {
            Signal::Reset => {
                self.reset();
                Ok(None)
            }
            Signal::Value(input) => {
                let candidate = self.eat(input)?;
                self.patience_mut().trigger();
                if self.is_patient() && !self.triggered() {
                    Ok(None)
                } else {
                    Ok(candidate)
                }
            }
        }
    }

    /// Feed a single observation
    fn push(&mut self, input: Self::Input) -> Result<Option<Self::Output>, MoverError> {
        self.feed(Signal::Value(input))
    }

    /// Return to the zero state
    fn reset(&mut self) {
        tracing::trace!(mover = core::any::type_name::<Self>(), "reset");
        self.patience_mut().disarm();
        self.zero();
    }

    /// Independent mover with identical configuration and state
    ///
    /// Returns [`MoverError::Unsupported`] unless the implementor provides
    /// a state-preserving copy.
    fn copy(&self) -> Result<BoxedMover<Self::Input, Self::Output>, MoverError> {
        Err(MoverError::Unsupported {
            mover: core::any::type_name::<Self>(),
            feature: "copy",
        })
    }
}

impl<M: Mover + ?Sized> Mover for Box<M> {
    type Input = M::Input;
    type Output = M::Output;

    fn eat(&mut self, input: Self::Input) -> Result<Option<Self::Output>, MoverError> {
        (**self).eat(input)
    }

    fn zero(&mut self) {
        (**self).zero();
    }

    fn patience(&self) -> &Patience {
        (**self).patience()
    }

    fn patience_mut(&mut self) -> &mut Patience {
        (**self).patience_mut()
    }

    fn triggered(&self) -> bool {
        (**self).triggered()
    }

    fn is_patient(&self) -> bool {
        (**self).is_patient()
    }

    fn set_patient(&mut self, patient: bool) {
        (**self).set_patient(patient);
    }

    fn feed(&mut self, signal: Signal<Self::Input>) -> Result<Option<Self::Output>, MoverError> {
        (**self).feed(signal)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn copy(&self) -> Result<BoxedMover<Self::Input, Self::Output>, MoverError> {
        (**self).copy()
    }
}
