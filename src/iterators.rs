use std::iter::FusedIterator;
use std::ops::Range;

use crate::slice::TensorSlice;
use crate::tensor::AsView;

/// Iterator over views of the first-level elements of a tensor or view.
///
/// Yields nothing for a scalar.
pub struct Elements<'a, T> {
    view: TensorSlice<'a, T>,
    remaining: Range<usize>,
}

impl<'a, T> Elements<'a, T> {
    pub(crate) fn new(view: TensorSlice<'a, T>) -> Elements<'a, T> {
        Elements {
            remaining: 0..view.element_count(),
            view,
        }
    }
}

impl<'a, T> Iterator for Elements<'a, T> {
    type Item = TensorSlice<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.remaining.next()?;
        Some(self.view.element(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let i = self.remaining.nth(n)?;
        Some(self.view.element(i))
    }
}

impl<T> DoubleEndedIterator for Elements<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let i = self.remaining.next_back()?;
        Some(self.view.element(i))
    }
}

impl<T> ExactSizeIterator for Elements<'_, T> {}

impl<T> FusedIterator for Elements<'_, T> {}
