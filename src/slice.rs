use std::ops::{Bound, Range, RangeBounds};

use crate::errors::SliceError;
use crate::index::Index;
use crate::iterators::Elements;
use crate::shape::Shape;
use crate::storage::{Storage, StorageMut};
use crate::tensor::{AsView, AsViewMut, Tensor};

/// A non-owning view of a region of an owning [`Tensor`].
///
/// A view is addressed by a list of fixed leading coordinates into the
/// owner (its indexing depth) plus an optional range which restricts the
/// view's own leading dimension. Every view therefore covers a contiguous
/// range of the owner's units, and reads and writes through a view act on
/// the owner's buffer directly.
///
/// `S` is the borrow of the owner. See [`TensorSlice`] and [`TensorSliceMut`].
#[derive(Clone)]
pub struct TensorSliceBase<S: Storage> {
    base: S,
    indices: Index,
    bounds: Option<Range<usize>>,

    // Derived from the fields above when the view is created.
    shape: Shape,
    unit_range: Range<usize>,
}

/// Read-only view of a tensor.
pub type TensorSlice<'a, T = f32> = TensorSliceBase<&'a Tensor<T>>;

/// Mutable view of a tensor.
///
/// While a mutable view exists, the owner and all other views of it are
/// inaccessible.
pub type TensorSliceMut<'a, T = f32> = TensorSliceBase<&'a mut Tensor<T>>;

/// Resolve `range` against a dimension of size `len`.
///
/// Returns `None` if the range is reversed or extends past `len`.
pub(crate) fn resolve_range<R: RangeBounds<usize>>(range: R, len: usize) -> Option<Range<usize>> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.checked_add(1)?,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1)?,
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    (start <= end && end <= len).then_some(start..end)
}

/// Compute the shape and unit range of a view of a tensor with shape `base`.
fn view_layout(
    base: &Shape,
    indices: &Index,
    bounds: Option<&Range<usize>>,
) -> (Shape, Range<usize>) {
    let mut shape = Shape::from_slice(&base.dims()[indices.len()..]);
    let mut start = indices.unit_offset(base);
    let mut len = shape.contiguous_size();
    if let Some(bounds) = bounds {
        let inner: usize = shape.dims()[1..].iter().product();
        shape[0] = bounds.len();
        start += bounds.start * inner;
        len = bounds.len() * inner;
    }
    (shape, start..start + len)
}

#[track_caller]
fn index_panic(err: SliceError, index: &[usize], shape: &Shape) -> ! {
    match err {
        SliceError::InvalidIndex => {
            panic!("index {:?} out of bounds for shape {}", index, shape)
        }
        _ => panic!("{}: index {:?} for shape {}", err, index, shape),
    }
}

#[track_caller]
fn range_panic(err: SliceError, shape: &Shape) -> ! {
    panic!("{} for shape {}", err, shape)
}

impl<S: Storage> TensorSliceBase<S> {
    fn from_parts(base: S, indices: Index, bounds: Option<Range<usize>>) -> Self {
        let (shape, unit_range) = view_layout(base.tensor().shape(), &indices, bounds.as_ref());
        TensorSliceBase {
            base,
            indices,
            bounds,
            shape,
            unit_range,
        }
    }

    /// Return the fixed leading coordinates into the owner.
    pub fn indices(&self) -> &Index {
        &self.indices
    }

    /// Return the number of owner dimensions that this view has indexed away.
    pub fn indexing_depth(&self) -> usize {
        self.indices.len()
    }

    /// Return the range of the view's leading dimension within the owner,
    /// if the view is restricted to one.
    pub fn bounds(&self) -> Option<&Range<usize>> {
        self.bounds.as_ref()
    }

    /// Return the range of the owner's units covered by this view.
    pub fn unit_range(&self) -> Range<usize> {
        self.unit_range.clone()
    }

    /// Compose `index` with this view's addressing, returning the indices
    /// of the resulting view into the owner.
    fn resolve_index(&self, index: &[usize]) -> Result<(Index, Option<Range<usize>>), SliceError> {
        if index.is_empty() {
            return Ok((self.indices.clone(), self.bounds.clone()));
        }
        if self.shape.is_scalar() {
            return Err(SliceError::InvalidRankAccess);
        }
        if index.len() > self.shape.rank() {
            return Err(SliceError::TooManyDims);
        }
        if !Index::from_slice(index).is_valid_in(&self.shape) {
            return Err(SliceError::InvalidIndex);
        }

        let offset = self.bounds.as_ref().map(|b| b.start).unwrap_or(0);
        let mut indices = self.indices.appending(index[0] + offset);
        for &coord in &index[1..] {
            indices = indices.appending(coord);
        }
        Ok((indices, None))
    }

    /// Compose a range over this view's leading dimension with this view's
    /// addressing.
    fn resolve_slice<R: RangeBounds<usize>>(&self, range: R) -> Result<Range<usize>, SliceError> {
        if self.shape.is_scalar() {
            return Err(SliceError::InvalidRankAccess);
        }
        let range = resolve_range(range, self.shape[0]).ok_or(SliceError::InvalidRange)?;
        let offset = self.bounds.as_ref().map(|b| b.start).unwrap_or(0);
        Ok(range.start + offset..range.end + offset)
    }
}

impl<'a, T> TensorSliceBase<&'a Tensor<T>> {
    /// Create a view of the whole of `base`.
    pub fn new(base: &'a Tensor<T>) -> Self {
        Self::from_parts(base, Index::default(), None)
    }

    /// Return the owning tensor.
    ///
    /// Use [`to_tensor`](AsView::to_tensor) to copy just the viewed region.
    pub fn base(&self) -> &'a Tensor<T> {
        self.base
    }

    /// Return the units of the viewed region in row-major order.
    pub fn units(&self) -> &'a [T] {
        let base: &'a Tensor<T> = self.base;
        &base.units()[self.unit_range.clone()]
    }

    /// Return the unit if this view is a scalar.
    pub fn item(&self) -> Option<&'a T> {
        if self.shape.is_scalar() {
            self.units().first()
        } else {
            None
        }
    }

    /// Return a view of the element at index `i` along the leading dimension.
    #[track_caller]
    pub fn element(&self, i: usize) -> TensorSlice<'a, T> {
        self.try_element(i)
            .unwrap_or_else(|err| index_panic(err, &[i], &self.shape))
    }

    /// Fallible variant of [`element`](TensorSliceBase::element).
    pub fn try_element(&self, i: usize) -> Result<TensorSlice<'a, T>, SliceError> {
        self.try_at([i])
    }

    /// Return a view of the sub-tensor at a full or partial index.
    #[track_caller]
    pub fn at<I: AsRef<[usize]>>(&self, index: I) -> TensorSlice<'a, T> {
        let index = index.as_ref();
        self.try_at(index)
            .unwrap_or_else(|err| index_panic(err, index, &self.shape))
    }

    /// Fallible variant of [`at`](TensorSliceBase::at).
    pub fn try_at<I: AsRef<[usize]>>(&self, index: I) -> Result<TensorSlice<'a, T>, SliceError> {
        let (indices, bounds) = self.resolve_index(index.as_ref())?;
        Ok(Self::from_parts(self.base, indices, bounds))
    }

    /// Return a view of a contiguous range of elements along the leading
    /// dimension.
    #[track_caller]
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> TensorSlice<'a, T> {
        self.try_slice(range)
            .unwrap_or_else(|err| range_panic(err, &self.shape))
    }

    /// Fallible variant of [`slice`](TensorSliceBase::slice).
    pub fn try_slice<R: RangeBounds<usize>>(&self, range: R) -> Result<TensorSlice<'a, T>, SliceError> {
        let bounds = self.resolve_slice(range)?;
        Ok(Self::from_parts(self.base, self.indices.clone(), Some(bounds)))
    }

    /// Return an iterator over views of the first-level elements.
    pub fn elements(&self) -> Elements<'a, T> {
        Elements::new(self.clone())
    }
}

impl<'a, T> TensorSliceBase<&'a mut Tensor<T>> {
    /// Create a mutable view of the whole of `base`.
    pub fn new(base: &'a mut Tensor<T>) -> Self {
        Self::from_parts(base, Index::default(), None)
    }

    /// Return the owning tensor.
    pub fn base(&self) -> &Tensor<T> {
        self.base
    }

    /// Consume this view and return the units of the viewed region.
    pub fn into_units_mut(self) -> &'a mut [T] {
        let base: &'a mut Tensor<T> = self.base;
        &mut base.units_mut()[self.unit_range]
    }

    /// Consume this view and return a mutable view of the element at index
    /// `i` along the leading dimension.
    #[track_caller]
    pub fn into_element_mut(self, i: usize) -> TensorSliceMut<'a, T> {
        self.into_at_mut([i])
    }

    /// Fallible variant of [`into_element_mut`](TensorSliceBase::into_element_mut).
    pub fn try_into_element_mut(self, i: usize) -> Result<TensorSliceMut<'a, T>, SliceError> {
        self.try_into_at_mut([i])
    }

    /// Consume this view and return a mutable view of the sub-tensor at a
    /// full or partial index.
    #[track_caller]
    pub fn into_at_mut<I: AsRef<[usize]>>(self, index: I) -> TensorSliceMut<'a, T> {
        let index = index.as_ref();
        match self.resolve_index(index) {
            Ok((indices, bounds)) => Self::from_parts(self.base, indices, bounds),
            Err(err) => index_panic(err, index, &self.shape),
        }
    }

    /// Fallible variant of [`into_at_mut`](TensorSliceBase::into_at_mut).
    pub fn try_into_at_mut<I: AsRef<[usize]>>(
        self,
        index: I,
    ) -> Result<TensorSliceMut<'a, T>, SliceError> {
        let (indices, bounds) = self.resolve_index(index.as_ref())?;
        Ok(Self::from_parts(self.base, indices, bounds))
    }

    /// Consume this view and return a mutable view of a contiguous range of
    /// elements along the leading dimension.
    #[track_caller]
    pub fn into_slice_mut<R: RangeBounds<usize>>(self, range: R) -> TensorSliceMut<'a, T> {
        match self.resolve_slice(range) {
            Ok(bounds) => Self::from_parts(self.base, self.indices, Some(bounds)),
            Err(err) => range_panic(err, &self.shape),
        }
    }

    /// Fallible variant of [`into_slice_mut`](TensorSliceBase::into_slice_mut).
    pub fn try_into_slice_mut<R: RangeBounds<usize>>(
        self,
        range: R,
    ) -> Result<TensorSliceMut<'a, T>, SliceError> {
        let bounds = self.resolve_slice(range)?;
        Ok(Self::from_parts(self.base, self.indices, Some(bounds)))
    }
}

impl<S: Storage> AsView for TensorSliceBase<S> {
    type Unit = S::Unit;

    fn view(&self) -> TensorSlice<'_, S::Unit> {
        TensorSliceBase {
            base: self.base.tensor(),
            indices: self.indices.clone(),
            bounds: self.bounds.clone(),
            shape: self.shape.clone(),
            unit_range: self.unit_range.clone(),
        }
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn units(&self) -> &[S::Unit] {
        &self.base.tensor().units()[self.unit_range.clone()]
    }
}

impl<S: StorageMut> AsViewMut for TensorSliceBase<S> {
    fn view_mut(&mut self) -> TensorSliceMut<'_, S::Unit> {
        TensorSliceBase {
            base: self.base.tensor_mut(),
            indices: self.indices.clone(),
            bounds: self.bounds.clone(),
            shape: self.shape.clone(),
            unit_range: self.unit_range.clone(),
        }
    }

    fn units_mut(&mut self) -> &mut [S::Unit] {
        let range = self.unit_range.clone();
        &mut self.base.tensor_mut().units_mut()[range]
    }
}

impl<S: Storage, S2: Storage<Unit = S::Unit>> PartialEq<TensorSliceBase<S2>> for TensorSliceBase<S>
where
    S::Unit: PartialEq,
{
    fn eq(&self, other: &TensorSliceBase<S2>) -> bool {
        self.shape == other.shape && AsView::units(self) == AsView::units(other)
    }
}

impl<S: Storage> PartialEq<Tensor<S::Unit>> for TensorSliceBase<S>
where
    S::Unit: PartialEq,
{
    fn eq(&self, other: &Tensor<S::Unit>) -> bool {
        self.shape == *other.shape() && AsView::units(self) == other.units()
    }
}

impl<T: PartialEq, S: Storage<Unit = T>> PartialEq<TensorSliceBase<S>> for Tensor<T> {
    fn eq(&self, other: &TensorSliceBase<S>) -> bool {
        other == self
    }
}

#[cfg(test)]
mod tests {
    use corten_testing::TestCases;

    use super::resolve_range;
    use crate::errors::SliceError;
    use crate::prelude::*;
    use crate::Tensor;

    #[test]
    fn test_resolve_range() {
        assert_eq!(resolve_range(.., 4), Some(0..4));
        assert_eq!(resolve_range(1..3, 4), Some(1..3));
        assert_eq!(resolve_range(1..=3, 4), Some(1..4));
        assert_eq!(resolve_range(2.., 4), Some(2..4));
        assert_eq!(resolve_range(..5, 4), None);
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = resolve_range(3..1, 4);
        assert_eq!(reversed, None);
    }

    #[test]
    fn test_element_of_view_borrows_owner() {
        let tensor = Tensor::increasing_from([2, 3, 4], 0);

        // Chained indexing returns views of the owner, not of temporaries.
        let unit = tensor.element(1).element(2).element(3);
        assert_eq!(unit.item(), Some(&23));
        assert_eq!(unit.indexing_depth(), 3);
        assert_eq!(unit.unit_range(), 23..24);
    }

    #[test]
    fn test_composed_view_addressing() {
        #[derive(Debug)]
        struct Case {
            // Range over the leading dimension, then an index within it.
            range: std::ops::Range<usize>,
            index: Vec<usize>,
            expected_shape: Vec<usize>,
            expected_units: Vec<i32>,
        }

        let cases = [
            Case {
                range: 1..3,
                index: vec![0],
                expected_shape: vec![3],
                expected_units: vec![3, 4, 5],
            },
            Case {
                range: 2..4,
                index: vec![1, 2],
                expected_shape: vec![],
                expected_units: vec![11],
            },
            Case {
                range: 0..4,
                index: vec![],
                expected_shape: vec![4, 3],
                expected_units: (0..12).collect(),
            },
        ];

        let tensor = Tensor::increasing_from([4, 3], 0);
        cases.test_each(|case| {
            let view = tensor.slice(case.range.clone()).at(&case.index);
            assert_eq!(view.shape(), case.expected_shape.as_slice());
            assert_eq!(view.units(), case.expected_units.as_slice());
        })
    }

    #[test]
    fn test_slice_of_slice() {
        let tensor = Tensor::increasing_from([6, 2], 0);
        let outer = tensor.slice(1..5);
        let inner = outer.slice(1..3);
        assert_eq!(inner.shape(), &[2, 2]);
        assert_eq!(inner.bounds(), Some(&(2..4)));
        assert_eq!(inner.units(), &[4, 5, 6, 7]);
        assert_eq!(inner.element(1).units(), &[6, 7]);
    }

    #[test]
    fn test_try_at_errors() {
        let tensor = Tensor::increasing_from([4, 3], 0);
        assert_eq!(tensor.try_at([4]).err(), Some(SliceError::InvalidIndex));
        assert_eq!(tensor.try_at([0, 3]).err(), Some(SliceError::InvalidIndex));
        assert_eq!(tensor.try_at([0, 0, 0]).err(), Some(SliceError::TooManyDims));
        assert_eq!(
            tensor.try_slice(2..5).err(),
            Some(SliceError::InvalidRange)
        );

        let scalar = Tensor::scalar(1);
        assert_eq!(scalar.try_at([0]).err(), Some(SliceError::InvalidRankAccess));
        assert_eq!(scalar.try_slice(..).err(), Some(SliceError::InvalidRankAccess));
        assert_eq!(scalar.try_at([]).map(|v| v.item().copied()), Ok(Some(1)));

        // Bounds restrict the leading dimension of a sliced view.
        let view = tensor.slice(1..3);
        assert_eq!(view.try_element(2).err(), Some(SliceError::InvalidIndex));
    }

    #[test]
    #[should_panic(expected = "index [4] out of bounds for shape [4, 3]")]
    fn test_element_out_of_bounds() {
        let tensor = Tensor::<f32>::zeros([4, 3]);
        tensor.element(4);
    }

    #[test]
    #[should_panic(expected = "cannot index into a scalar: index [0] for shape []")]
    fn test_index_scalar() {
        let tensor = Tensor::scalar(2.);
        tensor.element(0);
    }

    #[test]
    fn test_mutable_views_write_owner() {
        let mut tensor = Tensor::zeros([3, 2]);
        {
            let mut rows = tensor.slice_mut(1..);
            let mut row = rows.element_mut(1);
            row.set_unit(0, 5);
            row.fill(7);
            rows.set_unit(0, 1);
        }
        assert_eq!(tensor.units(), &[0, 0, 1, 0, 7, 7]);

        let units = tensor.view_mut().into_at_mut([2]).into_units_mut();
        units[1] = 9;
        assert_eq!(tensor.at([2, 1]).item(), Some(&9));
    }

    #[test]
    fn test_try_into_mut_errors() {
        let mut tensor = Tensor::<i32>::zeros([2, 2]);
        assert_eq!(
            tensor.view_mut().try_into_element_mut(2).err(),
            Some(SliceError::InvalidIndex)
        );
        assert_eq!(
            tensor.view_mut().try_into_slice_mut(1..3).err(),
            Some(SliceError::InvalidRange)
        );
        assert!(tensor.view_mut().try_into_at_mut([1, 1]).is_ok());
    }

    #[test]
    fn test_view_equality() {
        let a = Tensor::increasing_from([2, 3], 0);
        let b = Tensor::from_data([3], vec![3, 4, 5]).unwrap();

        assert_eq!(a.element(1), b);
        assert_eq!(b, a.element(1));
        assert_eq!(a.element(1), b.view());
        assert_ne!(a.element(0), b.view());

        // Same units, different shape.
        let c = Tensor::from_data([1, 3], vec![3, 4, 5]).unwrap();
        assert_ne!(a.element(1), c);
        assert!(a.element(1).eq_similar(&c));
    }
}
