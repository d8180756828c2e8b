use std::iter::FusedIterator;

use crate::index::Index;
use crate::shape::Shape;

/// Iterator over every full index of a shape, in row-major order.
///
/// The shape may be a scalar, in which case the iterator yields a single
/// empty index. A shape with an empty dimension yields no indices.
pub struct Indices {
    shape: Shape,
    next: Option<Index>,

    /// Remaining iteration steps.
    steps: usize,
}

impl Indices {
    /// Return an iterator over all the indices where each coordinate is
    /// between `0` and `shape[dim]`.
    pub fn from_shape(shape: &Shape) -> Indices {
        let steps = shape.contiguous_size();
        Indices {
            next: (steps > 0).then(|| std::iter::repeat(0).take(shape.rank()).collect()),
            shape: shape.clone(),
            steps,
        }
    }
}

impl Iterator for Indices {
    type Item = Index;

    /// Return the next index in the sequence, or `None` after all indices
    /// have been returned.
    fn next(&mut self) -> Option<Index> {
        let current = self.next.take()?;
        self.steps -= 1;

        let mut next = current.clone();
        let mut has_next = false;
        for dim in (0..self.shape.rank()).rev() {
            next[dim] += 1;
            if next[dim] == self.shape[dim] {
                next[dim] = 0;
            } else {
                has_next = true;
                break;
            }
        }
        self.next = has_next.then_some(next);

        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.steps, Some(self.steps))
    }
}

impl ExactSizeIterator for Indices {}

impl FusedIterator for Indices {}
