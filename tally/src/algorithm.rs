//! Algorithm traits.

use crate::TallyError;

/// Computes an aggregate from a full set of entries.
///
/// Implementations must be deterministic for a fixed input slice. If the
/// result depends on entry order, the implementation documents its order
/// policy; callers may not assume one.
pub trait TallyAlgorithm<E> {
    type Output;

    fn execute(&self, entries: &[E]) -> Result<Self::Output, TallyError>;
}

/// Computes updated weights from new entries and a baseline of prior weights.
///
/// The baseline is whatever the weight store held before this run, which may
/// be empty (cold store, or a baseline read that failed). Implementations
/// must produce a usable result from an empty baseline.
pub trait WeightedTallyAlgorithm<E, W> {
    fn execute_weighted(&self, entries: &[E], baseline: Vec<W>) -> Result<Vec<W>, TallyError>;
}

/// Runs `A` and converts every successful result with `F`.
///
/// Used to turn a raw aggregate into a caller's response type.
#[derive(Clone, Debug)]
pub struct MapOutput<A, F> {
    inner: A,
    f: F,
}

impl<A, F> MapOutput<A, F> {
    pub fn new(inner: A, f: F) -> Self {
        Self { inner, f }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<E, A, F, O> TallyAlgorithm<E> for MapOutput<A, F>
where
    A: TallyAlgorithm<E>,
    F: Fn(A::Output) -> O,
{
    type Output = O;

    fn execute(&self, entries: &[E]) -> Result<O, TallyError> {
        self.inner.execute(entries).map(&self.f)
    }
}
