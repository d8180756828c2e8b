use std::ops::RangeBounds;

use crate::errors::{ExpandError, FromDataError, ReshapeError, ShapeMismatch, SliceError};
use crate::index::Index;
use crate::index_iterator::Indices;
use crate::iterators::Elements;
use crate::shape::Shape;
use crate::slice::{resolve_range, TensorSlice, TensorSliceMut};
use crate::unit::{DivisionUnit, NumericUnit};

/// An owning, multi-dimensional array of units stored contiguously in
/// row-major order.
///
/// A tensor is the sole owner of its unit buffer. Views of the tensor
/// ([`TensorSlice`], [`TensorSliceMut`]) borrow it and read or write the
/// buffer directly, without copying.
///
/// Most methods for reading and indexing tensors are provided by the
/// [`AsView`] trait, and methods for mutation by [`AsViewMut`]. Both are
/// implemented for tensors and views alike and are most conveniently
/// imported via the [prelude](crate::prelude).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TensorBase<T> {
    // Constructors must ensure `units.len() == shape.contiguous_size()`.
    shape: Shape,
    units: Vec<T>,
}

/// Owned tensor with a dynamic rank.
pub type Tensor<T = f32> = TensorBase<T>;

/// Trait implemented by tensors and views, which provides a `view` method to
/// get an immutable view of the tensor, plus methods which forward to such
/// a view.
///
/// The purpose of this trait is to preserve the lifetime of the underlying
/// owner in return types. Methods on [`TensorSlice`] return views that
/// borrow the owning tensor rather than the slice they were called on, so
/// that operations can be chained (eg. `tensor.element(0).element(1)`).
pub trait AsView {
    /// Type of unit stored in the tensor.
    type Unit;

    /// Return a read-only view of the whole tensor or view.
    fn view(&self) -> TensorSlice<'_, Self::Unit>;

    /// Return the shape of this tensor or view.
    fn shape(&self) -> &Shape;

    /// Return the units of this tensor or view in row-major order.
    fn units(&self) -> &[Self::Unit];

    /// Return the number of dimensions.
    fn rank(&self) -> usize {
        self.shape().rank()
    }

    /// Return true if this tensor has no dimensions.
    fn is_scalar(&self) -> bool {
        self.shape().is_scalar()
    }

    /// Return the number of units.
    fn unit_count(&self) -> usize {
        self.units().len()
    }

    /// Return the shape of each first-level element, or `None` for a scalar.
    fn element_shape(&self) -> Option<Shape> {
        self.shape().dropping_first()
    }

    /// Return the size of the leading dimension, or zero for a scalar.
    fn element_count(&self) -> usize {
        self.shape().dims().first().copied().unwrap_or(0)
    }

    /// Return the unit at flat position `pos`.
    ///
    /// Panics if `pos >= self.unit_count()`.
    fn unit(&self, pos: usize) -> &Self::Unit {
        let units = self.units();
        assert!(
            pos < units.len(),
            "unit position {} out of bounds for {} units",
            pos,
            units.len()
        );
        &units[pos]
    }

    /// Return the unit at flat position `pos`, or `None` if out of bounds.
    fn get_unit(&self, pos: usize) -> Option<&Self::Unit> {
        self.units().get(pos)
    }

    /// Return the scalar value if this tensor has no dimensions.
    fn item(&self) -> Option<&Self::Unit> {
        if self.is_scalar() {
            self.units().first()
        } else {
            None
        }
    }

    /// Return a view of the element at index `i` along the leading dimension.
    ///
    /// Panics if this is a scalar or `i` is out of bounds.
    fn element(&self, i: usize) -> TensorSlice<'_, Self::Unit> {
        self.view().element(i)
    }

    /// Fallible variant of [`element`](AsView::element).
    fn try_element(&self, i: usize) -> Result<TensorSlice<'_, Self::Unit>, SliceError> {
        self.view().try_element(i)
    }

    /// Return a view of the sub-tensor at a full or partial index.
    ///
    /// The unaddressed trailing dimensions are preserved in the view's shape.
    /// An empty index returns a view of the whole tensor.
    ///
    /// Panics if the index has more coordinates than the tensor has
    /// dimensions (including any non-empty index into a scalar) or a
    /// coordinate is out of bounds.
    fn at<I: AsRef<[usize]>>(&self, index: I) -> TensorSlice<'_, Self::Unit> {
        self.view().at(index)
    }

    /// Fallible variant of [`at`](AsView::at).
    fn try_at<I: AsRef<[usize]>>(&self, index: I) -> Result<TensorSlice<'_, Self::Unit>, SliceError> {
        self.view().try_at(index)
    }

    /// Return a view of a contiguous range of elements along the leading
    /// dimension.
    ///
    /// Panics if this is a scalar or the range is out of bounds.
    fn slice<R: RangeBounds<usize>>(&self, range: R) -> TensorSlice<'_, Self::Unit> {
        self.view().slice(range)
    }

    /// Fallible variant of [`slice`](AsView::slice).
    fn try_slice<R: RangeBounds<usize>>(
        &self,
        range: R,
    ) -> Result<TensorSlice<'_, Self::Unit>, SliceError> {
        self.view().try_slice(range)
    }

    /// Return an iterator over views of the first-level elements.
    fn elements(&self) -> Elements<'_, Self::Unit> {
        self.view().elements()
    }

    /// Return an iterator over all full indices of this tensor.
    fn indices(&self) -> Indices {
        Indices::from_shape(self.shape())
    }

    /// Copy this tensor or view into a new owning tensor.
    fn to_tensor(&self) -> Tensor<Self::Unit>
    where
        Self::Unit: Clone,
    {
        TensorBase {
            shape: self.shape().clone(),
            units: self.units().to_vec(),
        }
    }

    /// Return a copy of this tensor with a different shape.
    ///
    /// Returns `None` if `shape` has a different contiguous size.
    fn reshaped<S: Into<Shape>>(&self, shape: S) -> Option<Tensor<Self::Unit>>
    where
        Self::Unit: Clone,
    {
        let shape = shape.into();
        if shape.contiguous_size() != self.unit_count() {
            return None;
        }
        Some(TensorBase {
            shape,
            units: self.units().to_vec(),
        })
    }

    /// Return a new tensor formed by concatenating `self` and `other` along
    /// dimension `dim`.
    ///
    /// Returns `None` if the shapes cannot be concatenated, see
    /// [`Shape::concatenating`].
    fn concatenating<V: AsView<Unit = Self::Unit> + ?Sized>(
        &self,
        other: &V,
        dim: usize,
    ) -> Option<Tensor<Self::Unit>>
    where
        Self::Unit: Clone,
    {
        let shape = self.shape().concatenating(other.shape(), dim)?;
        let outer: usize = shape.dims()[..dim].iter().product();
        let lhs_chunk: usize = self.shape().dims()[dim..].iter().product();
        let rhs_chunk: usize = other.shape().dims()[dim..].iter().product();

        let (lhs, rhs) = (self.units(), other.units());
        let mut units = Vec::with_capacity(shape.contiguous_size());
        for i in 0..outer {
            units.extend_from_slice(&lhs[i * lhs_chunk..(i + 1) * lhs_chunk]);
            units.extend_from_slice(&rhs[i * rhs_chunk..(i + 1) * rhs_chunk]);
        }
        Some(TensorBase { shape, units })
    }

    /// Return a new tensor with the same shape, formed by applying `f` to
    /// each unit.
    fn map<F, U>(&self, f: F) -> Tensor<U>
    where
        F: FnMut(&Self::Unit) -> U,
    {
        TensorBase {
            shape: self.shape().clone(),
            units: self.units().iter().map(f).collect(),
        }
    }

    /// Run `f` with the units of this tensor as a contiguous slice.
    fn with_units<R>(&self, f: impl FnOnce(&[Self::Unit]) -> R) -> R {
        f(self.units())
    }

    /// Return true if `other` has exactly the same shape.
    fn is_isomorphic_to<V: AsView + ?Sized>(&self, other: &V) -> bool {
        self.shape() == other.shape()
    }

    /// Return true if `other` has a similar shape, ie. one that differs only
    /// in leading size-1 dimensions.
    fn is_similar_to<V: AsView + ?Sized>(&self, other: &V) -> bool {
        self.shape().is_similar_to(other.shape())
    }

    /// Return true if `other` has a similar shape and the same units.
    fn eq_similar<V: AsView<Unit = Self::Unit> + ?Sized>(&self, other: &V) -> bool
    where
        Self::Unit: PartialEq,
    {
        self.is_similar_to(other) && self.units() == other.units()
    }
}

/// Trait implemented by owning tensors and mutable views, which provides
/// in-place mutation of units and sub-tensors.
///
/// Every mutation acts directly on the owning tensor's buffer.
pub trait AsViewMut: AsView {
    /// Return a mutable view of the whole tensor or view.
    fn view_mut(&mut self) -> TensorSliceMut<'_, Self::Unit>;

    /// Return the units of this tensor or view as a mutable slice.
    fn units_mut(&mut self) -> &mut [Self::Unit];

    /// Return a mutable reference to the unit at flat position `pos`.
    ///
    /// Panics if `pos >= self.unit_count()`.
    fn unit_mut(&mut self, pos: usize) -> &mut Self::Unit {
        let units = self.units_mut();
        let len = units.len();
        assert!(
            pos < len,
            "unit position {} out of bounds for {} units",
            pos,
            len
        );
        &mut units[pos]
    }

    /// Replace the unit at flat position `pos`.
    fn set_unit(&mut self, pos: usize, value: Self::Unit) {
        *self.unit_mut(pos) = value;
    }

    /// Add `by` to the unit at flat position `pos`.
    fn increment_unit(&mut self, pos: usize, by: Self::Unit)
    where
        Self::Unit: NumericUnit,
    {
        let unit = self.unit_mut(pos);
        *unit = *unit + by;
    }

    /// Subtract `by` from the unit at flat position `pos`.
    fn decrement_unit(&mut self, pos: usize, by: Self::Unit)
    where
        Self::Unit: NumericUnit,
    {
        let unit = self.unit_mut(pos);
        *unit = *unit - by;
    }

    /// Multiply the unit at flat position `pos` by `by`.
    fn multiply_unit(&mut self, pos: usize, by: Self::Unit)
    where
        Self::Unit: NumericUnit,
    {
        let unit = self.unit_mut(pos);
        *unit = *unit * by;
    }

    /// Divide the unit at flat position `pos` by `by`.
    ///
    /// Integer units truncate, see [`DivisionUnit`].
    fn divide_unit(&mut self, pos: usize, by: Self::Unit)
    where
        Self::Unit: DivisionUnit,
    {
        let unit = self.unit_mut(pos);
        *unit = unit.divide(by);
    }

    /// Return a mutable view of the element at index `i` along the leading
    /// dimension.
    ///
    /// Panics if this is a scalar or `i` is out of bounds.
    fn element_mut(&mut self, i: usize) -> TensorSliceMut<'_, Self::Unit> {
        self.view_mut().into_element_mut(i)
    }

    /// Return a mutable view of the sub-tensor at a full or partial index.
    ///
    /// See [`AsView::at`].
    fn at_mut<I: AsRef<[usize]>>(&mut self, index: I) -> TensorSliceMut<'_, Self::Unit> {
        self.view_mut().into_at_mut(index)
    }

    /// Return a mutable view of a contiguous range of elements along the
    /// leading dimension.
    fn slice_mut<R: RangeBounds<usize>>(&mut self, range: R) -> TensorSliceMut<'_, Self::Unit> {
        self.view_mut().into_slice_mut(range)
    }

    /// Copy the units of `replacement` into this tensor or view.
    ///
    /// Fails if the shape of `replacement` does not equal the shape of
    /// `self`.
    fn try_assign<V: AsView<Unit = Self::Unit> + ?Sized>(
        &mut self,
        replacement: &V,
    ) -> Result<(), ShapeMismatch>
    where
        Self::Unit: Clone,
    {
        if self.shape() != replacement.shape() {
            return Err(ShapeMismatch {
                expected: self.shape().clone(),
                actual: replacement.shape().clone(),
            });
        }
        self.units_mut().clone_from_slice(replacement.units());
        Ok(())
    }

    /// Copy the units of `replacement` into this tensor or view.
    ///
    /// Panics if the shape of `replacement` does not equal the shape of
    /// `self`.
    fn assign<V: AsView<Unit = Self::Unit> + ?Sized>(&mut self, replacement: &V)
    where
        Self::Unit: Clone,
    {
        if let Err(err) = self.try_assign(replacement) {
            panic!("{}", err);
        }
    }

    /// Replace the element at index `i` along the leading dimension.
    ///
    /// Panics if `i` is out of bounds or the shape of `replacement` is not
    /// the element shape.
    fn set_element<V: AsView<Unit = Self::Unit> + ?Sized>(&mut self, i: usize, replacement: &V)
    where
        Self::Unit: Clone,
    {
        self.element_mut(i).assign(replacement)
    }

    /// Replace the sub-tensor at a full or partial index.
    ///
    /// Panics if the index is invalid or the shape of `replacement` is not
    /// the shape of the addressed sub-tensor.
    fn set_at<I: AsRef<[usize]>, V: AsView<Unit = Self::Unit> + ?Sized>(
        &mut self,
        index: I,
        replacement: &V,
    ) where
        Self::Unit: Clone,
    {
        self.at_mut(index).assign(replacement)
    }

    /// Replace a range of elements along the leading dimension.
    ///
    /// The shape of `replacement` must be the element shape prepended with
    /// the length of the range. To replace a range with a different number
    /// of elements use [`Tensor::replace_elements`].
    fn set_slice<R: RangeBounds<usize>, V: AsView<Unit = Self::Unit> + ?Sized>(
        &mut self,
        range: R,
        replacement: &V,
    ) where
        Self::Unit: Clone,
    {
        self.slice_mut(range).assign(replacement)
    }

    /// Set every unit to `value`.
    fn fill(&mut self, value: Self::Unit)
    where
        Self::Unit: Clone,
    {
        self.units_mut().fill(value)
    }

    /// Replace every unit with the result of applying `f` to it.
    fn apply<F: FnMut(&Self::Unit) -> Self::Unit>(&mut self, mut f: F) {
        for unit in self.units_mut() {
            *unit = f(unit);
        }
    }

    /// Run `f` with exclusive access to the units of this tensor or view as
    /// a contiguous slice.
    ///
    /// No other accessor of the same owner can run while `f` executes.
    fn with_units_mut<R>(&mut self, f: impl FnOnce(&mut [Self::Unit]) -> R) -> R {
        f(self.units_mut())
    }
}

impl<T> TensorBase<T> {
    /// Create a tensor with a given shape and every unit set to `value`.
    pub fn full<S: Into<Shape>>(shape: S, value: T) -> Tensor<T>
    where
        T: Clone,
    {
        let shape = shape.into();
        let units = vec![value; shape.contiguous_size()];
        TensorBase { shape, units }
    }

    /// Create a tensor with a given shape and every unit set to its default
    /// value.
    pub fn zeros<S: Into<Shape>>(shape: S) -> Tensor<T>
    where
        T: Clone + Default,
    {
        Self::full(shape, T::default())
    }

    /// Create a scalar (rank 0) tensor holding `value`.
    pub fn scalar(value: T) -> Tensor<T> {
        TensorBase {
            shape: Shape::scalar(),
            units: vec![value],
        }
    }

    /// Create a vector (rank 1) tensor from a `Vec` of units.
    pub fn from_vec(units: Vec<T>) -> Tensor<T> {
        TensorBase {
            shape: Shape::from([units.len()]),
            units,
        }
    }

    /// Create a tensor from a shape and a `Vec` of units in row-major order.
    ///
    /// Fails if the length of `units` does not equal the contiguous size of
    /// the shape.
    pub fn from_data<S: Into<Shape>>(shape: S, units: Vec<T>) -> Result<Tensor<T>, FromDataError> {
        let shape = shape.into();
        if units.len() != shape.contiguous_size() {
            return Err(FromDataError::StorageLengthMismatch);
        }
        Ok(TensorBase { shape, units })
    }

    /// Create a tensor with a given shape, filled by calling `supplier` once
    /// per unit in row-major order.
    pub fn from_supplier<S: Into<Shape>, F: FnMut() -> T>(shape: S, supplier: F) -> Tensor<T> {
        let shape = shape.into();
        let units = std::iter::repeat_with(supplier)
            .take(shape.contiguous_size())
            .collect();
        TensorBase { shape, units }
    }

    /// Create a tensor with a given shape, filled by calling `f` with the
    /// index of each unit in row-major order.
    pub fn from_fn<S: Into<Shape>, F: FnMut(&Index) -> T>(shape: S, mut f: F) -> Tensor<T> {
        let shape = shape.into();
        let units = Indices::from_shape(&shape).map(|index| f(&index)).collect();
        TensorBase { shape, units }
    }

    /// Create a tensor with a given shape from a sequence of units in
    /// row-major order.
    ///
    /// Units beyond the contiguous size of the shape are ignored. Fails if
    /// the sequence is too short.
    pub fn from_units<S: Into<Shape>, I: IntoIterator<Item = T>>(
        shape: S,
        units: I,
    ) -> Result<Tensor<T>, FromDataError> {
        let shape = shape.into();
        let len = shape.contiguous_size();
        let units: Vec<T> = units.into_iter().take(len).collect();
        if units.len() < len {
            return Err(FromDataError::StorageTooShort);
        }
        Ok(TensorBase { shape, units })
    }

    /// Create a tensor with a given shape from a sequence of units in
    /// row-major order, calling `vacancy_supplier` for each unit the sequence
    /// is short of.
    pub fn from_units_or_else<S, I, F>(shape: S, units: I, vacancy_supplier: F) -> Tensor<T>
    where
        S: Into<Shape>,
        I: IntoIterator<Item = T>,
        F: FnMut() -> T,
    {
        let shape = shape.into();
        let units = units
            .into_iter()
            .chain(std::iter::repeat_with(vacancy_supplier))
            .take(shape.contiguous_size())
            .collect();
        TensorBase { shape, units }
    }

    /// Create a tensor with a given shape whose units count up by one from
    /// `start` in row-major order.
    pub fn increasing_from<S: Into<Shape>>(shape: S, start: T) -> Tensor<T>
    where
        T: NumericUnit,
    {
        // The last unit may be the maximum value of `T`, so never step past it.
        let mut prev: Option<T> = None;
        Self::from_supplier(shape, || {
            let unit = prev.map_or(start, |prev| prev + T::one());
            prev = Some(unit);
            unit
        })
    }

    /// Create a tensor with no elements, whose elements have shape
    /// `element_shape`.
    ///
    /// Elements can be added with [`push_element`](TensorBase::push_element)
    /// or [`append`](TensorBase::append).
    pub fn empty<S: Into<Shape>>(element_shape: S) -> Tensor<T> {
        Self::with_capacity(element_shape, 0)
    }

    /// Variant of [`empty`](TensorBase::empty) which reserves space for
    /// `capacity` elements.
    pub fn with_capacity<S: Into<Shape>>(element_shape: S, capacity: usize) -> Tensor<T> {
        let element_shape = element_shape.into();
        TensorBase {
            units: Vec::with_capacity(capacity * element_shape.contiguous_size()),
            shape: element_shape.prepending(0),
        }
    }

    /// Return the shape of this tensor.
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Return the units of this tensor in row-major order.
    #[inline]
    pub fn units(&self) -> &[T] {
        &self.units
    }

    /// Return the units of this tensor as a mutable slice.
    #[inline]
    pub fn units_mut(&mut self) -> &mut [T] {
        &mut self.units
    }

    /// Consume this tensor and return its units in row-major order.
    pub fn into_units(self) -> Vec<T> {
        self.units
    }

    /// Change the shape of this tensor without moving its units.
    ///
    /// Fails if `shape` has a different contiguous size.
    pub fn reshape<S: Into<Shape>>(&mut self, shape: S) -> Result<(), ReshapeError> {
        let shape = shape.into();
        if shape.contiguous_size() != self.units.len() {
            return Err(ReshapeError::LengthMismatch);
        }
        self.shape = shape;
        Ok(())
    }

    /// Return the element shape, or an error if this tensor is a scalar and
    /// has no leading dimension to grow.
    fn growable_element_shape(&self) -> Result<Shape, ExpandError> {
        self.shape.dropping_first().ok_or(ExpandError::ScalarTensor)
    }

    /// Append a single element to the leading dimension.
    ///
    /// The shape of `element` must equal the element shape of this tensor.
    pub fn push_element<V: AsView<Unit = T> + ?Sized>(
        &mut self,
        element: &V,
    ) -> Result<(), ExpandError>
    where
        T: Clone,
    {
        if *element.shape() != self.growable_element_shape()? {
            return Err(ExpandError::ShapeMismatch);
        }
        self.units.extend_from_slice(element.units());
        self.shape[0] += 1;
        Ok(())
    }

    /// Append all elements of `other` to the leading dimension.
    ///
    /// The element shape of `other` must equal the element shape of this
    /// tensor.
    pub fn append<V: AsView<Unit = T> + ?Sized>(&mut self, other: &V) -> Result<(), ExpandError>
    where
        T: Clone,
    {
        let element_shape = self.growable_element_shape()?;
        if other.element_shape().as_ref() != Some(&element_shape) {
            return Err(ExpandError::ShapeMismatch);
        }
        self.units.extend_from_slice(other.units());
        self.shape[0] += other.element_count();
        Ok(())
    }

    /// Replace a range of elements along the leading dimension with the
    /// elements of `replacement`, which may have a different count.
    ///
    /// The element shape of `replacement` must equal the element shape of
    /// this tensor. Panics if the range is out of bounds.
    pub fn replace_elements<R: RangeBounds<usize>, V: AsView<Unit = T> + ?Sized>(
        &mut self,
        range: R,
        replacement: &V,
    ) -> Result<(), ExpandError>
    where
        T: Clone,
    {
        let element_shape = self.growable_element_shape()?;
        if replacement.element_shape().as_ref() != Some(&element_shape) {
            return Err(ExpandError::ShapeMismatch);
        }
        let count = self.shape[0];
        let range = resolve_range(range, count).unwrap_or_else(|| {
            panic!(
                "element range is invalid for tensor of shape {}",
                self.shape
            )
        });
        let element_size = element_shape.contiguous_size();
        self.units.splice(
            range.start * element_size..range.end * element_size,
            replacement.units().iter().cloned(),
        );
        self.shape[0] = count - range.len() + replacement.element_count();
        Ok(())
    }

    /// Remove the element at index `i` along the leading dimension and return
    /// it as a new tensor.
    ///
    /// Panics if this is a scalar or `i` is out of bounds.
    pub fn remove_element(&mut self, i: usize) -> Tensor<T> {
        let element_shape = self
            .shape
            .dropping_first()
            .unwrap_or_else(|| panic!("{}", SliceError::InvalidRankAccess));
        assert!(
            i < self.shape[0],
            "element {} out of bounds for tensor of shape {}",
            i,
            self.shape
        );
        let element_size = element_shape.contiguous_size();
        let units = self
            .units
            .drain(i * element_size..(i + 1) * element_size)
            .collect();
        self.shape[0] -= 1;
        TensorBase {
            shape: element_shape,
            units,
        }
    }
}

impl<T> AsView for TensorBase<T> {
    type Unit = T;

    fn view(&self) -> TensorSlice<'_, T> {
        TensorSlice::new(self)
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn units(&self) -> &[T] {
        &self.units
    }
}

impl<T> AsViewMut for TensorBase<T> {
    fn view_mut(&mut self) -> TensorSliceMut<'_, T> {
        TensorSliceMut::new(self)
    }

    fn units_mut(&mut self) -> &mut [T] {
        &mut self.units
    }
}

impl<T> From<Vec<T>> for TensorBase<T> {
    /// Create a vector (rank 1) tensor.
    fn from(units: Vec<T>) -> Tensor<T> {
        Self::from_vec(units)
    }
}

impl<T, const N: usize> From<[T; N]> for TensorBase<T> {
    /// Create a vector (rank 1) tensor.
    fn from(units: [T; N]) -> Tensor<T> {
        Self::from_vec(units.into())
    }
}

impl<T: Clone + Default> Default for TensorBase<T> {
    /// Return a scalar holding the unit type's default value.
    fn default() -> Tensor<T> {
        Self::scalar(T::default())
    }
}

impl<'a, T> IntoIterator for &'a TensorBase<T> {
    type Item = TensorSlice<'a, T>;
    type IntoIter = Elements<'a, T>;

    fn into_iter(self) -> Elements<'a, T> {
        self.elements()
    }
}

#[cfg(test)]
mod tests;
