//! Sequential composition of movers

#[cfg(feature = "std")]
use std::boxed::Box;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use super::ready;
use crate::traits::{BoxedMover, Mover, MoverError, Patience};

/// Two movers in sequence: each output of `first` is fed to `second`
///
/// Longer pipelines nest (`Chain<Chain<A, B>, C>`), most easily built with
/// [`MoverExt::then`](super::MoverExt::then). Ticks on which `first` emits
/// nothing are not forwarded, and the chain emits nothing.
///
/// # Example
///
/// ```
/// use flowmovers::averages::MovingAverage;
/// use flowmovers::compose::MoverExt;
/// use flowmovers::extrema::MovingMax;
///
/// // Highest 2-tick average over the last 3 ticks
/// let mut pipeline = MovingAverage::new(2).then(MovingMax::new(3));
///
/// let outputs = pipeline.run([4.0, 0.0, 2.0, 2.0]).unwrap();
/// assert_eq!(outputs, vec![Some(4.0), Some(4.0), Some(4.0), Some(2.0)]);
/// ```
#[derive(Clone, Debug)]
pub struct Chain<A, B> {
    first: A,
    second: B,
    patience: Patience,
}

impl<A, B> Chain<A, B>
where
    A: Mover,
    B: Mover<Input = A::Output>,
{
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            patience: Patience::default(),
        }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A, B> Mover for Chain<A, B>
where
    A: Mover,
    B: Mover<Input = A::Output>,
    A::Input: 'static,
    A::Output: 'static,
    B::Output: 'static,
{
    type Input = A::Input;
    type Output = B::Output;

    fn eat(&mut self, input: A::Input) -> Result<Option<B::Output>, MoverError> {
        match self.first.push(input)? {
            Some(middle) => self.second.push(middle),
            None => Ok(None),
        }
    }

    fn zero(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn patience(&self) -> &Patience {
        &self.patience
    }

    fn patience_mut(&mut self) -> &mut Patience {
        &mut self.patience
    }

    fn triggered(&self) -> bool {
        ready(&self.first) && ready(&self.second)
    }

    fn is_patient(&self) -> bool {
        self.first.is_patient() || self.second.is_patient()
    }

    fn set_patient(&mut self, patient: bool) {
        self.first.set_patient(patient);
        self.second.set_patient(patient);
    }

    fn copy(&self) -> Result<BoxedMover<A::Input, B::Output>, MoverError> {
        Ok(Box::new(Chain::new(self.first.copy()?, self.second.copy()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Signal;

    /// Adds a fixed offset; patient movers trigger from the second tick
    #[derive(Clone, Debug)]
    struct Offset {
        by: f64,
        seen: u32,
        patience: Patience,
    }

    impl Offset {
        fn new(by: f64, patient: bool) -> Self {
            Self {
                by,
                seen: 0,
                patience: Patience::new(patient),
            }
        }
    }

    impl Mover for Offset {
        type Input = f64;
        type Output = f64;

        fn eat(&mut self, input: f64) -> Result<Option<f64>, MoverError> {
            self.seen += 1;
            Ok(Some(input + self.by))
        }

        fn zero(&mut self) {
            self.seen = 0;
        }

        fn patience(&self) -> &Patience {
            &self.patience
        }

        fn patience_mut(&mut self) -> &mut Patience {
            &mut self.patience
        }

        fn triggered(&self) -> bool {
            self.seen >= 2
        }

        fn copy(&self) -> Result<BoxedMover<f64, f64>, MoverError> {
            Ok(Box::new(self.clone()))
        }
    }

    #[test]
    fn test_outputs_flow_forward() {
        let mut chain = Chain::new(Offset::new(1.0, false), Offset::new(10.0, false));

        assert_eq!(chain.push(0.0).unwrap(), Some(11.0));
        assert_eq!(chain.push(5.0).unwrap(), Some(16.0));
    }

    #[test]
    fn test_suppressed_ticks_not_forwarded() {
        let mut chain = Chain::new(Offset::new(1.0, true), Offset::new(10.0, false));

        assert!(chain.is_patient());
        assert_eq!(chain.push(0.0).unwrap(), None);
        assert_eq!(chain.push(0.0).unwrap(), Some(11.0));
        // Second stage saw only the forwarded tick
        assert_eq!(chain.second().seen, 1);
    }

    #[test]
    fn test_set_patient_propagates() {
        let mut chain = Chain::new(Offset::new(1.0, false), Offset::new(1.0, false));
        chain.set_patient(true);

        assert!(chain.first().is_patient());
        assert!(chain.second().is_patient());
    }

    #[test]
    fn test_reset_clears_both_stages() {
        let mut chain = Chain::new(Offset::new(1.0, true), Offset::new(1.0, false));
        chain.push(0.0).unwrap();
        chain.push(0.0).unwrap();

        assert_eq!(chain.feed(Signal::Reset).unwrap(), None);
        assert_eq!(chain.first().seen, 0);
        assert_eq!(chain.second().seen, 0);
        assert_eq!(chain.push(0.0).unwrap(), None);
    }

    #[test]
    fn test_copy() {
        let mut chain = Chain::new(Offset::new(1.0, false), Offset::new(2.0, false));
        chain.push(0.0).unwrap();

        let mut copy = chain.copy().unwrap();
        assert_eq!(copy.push(1.0).unwrap(), Some(4.0));

        let (first, _) = chain.into_parts();
        assert_eq!(first.seen, 1);
    }
}
