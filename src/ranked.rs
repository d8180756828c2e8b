//! Tensors and views whose rank is fixed at compile time.
//!
//! [`RankedTensor`] and [`RankedSlice`] wrap the dynamically ranked
//! [`Tensor`] and [`TensorSlice`]. Their shapes are `[usize; N]` arrays, and
//! indexing into the leading dimension narrows the static rank by one.
//! Supported ranks are 1 to 4. Using any other rank fails to compile.

use std::fmt;

use crate::errors::{DimensionError, FromDataError};
use crate::shape::Shape;
use crate::slice::{TensorSlice, TensorSliceMut};
use crate::tensor::{AsView, AsViewMut, Tensor};

/// Owned tensor with a static rank `N`.
#[derive(Clone, PartialEq)]
pub struct RankedTensor<T, const N: usize> {
    tensor: Tensor<T>,
}

/// View of a tensor with a static rank `N`.
#[derive(Clone)]
pub struct RankedSlice<'a, T, const N: usize> {
    view: TensorSlice<'a, T>,
}

pub type Tensor1D<T = f32> = RankedTensor<T, 1>;
pub type Tensor2D<T = f32> = RankedTensor<T, 2>;
pub type Tensor3D<T = f32> = RankedTensor<T, 3>;
pub type Tensor4D<T = f32> = RankedTensor<T, 4>;

struct RankGuard<const N: usize>;

impl<const N: usize> RankGuard<N> {
    const SUPPORTED: () = assert!(N >= 1 && N <= 4, "static rank must be between 1 and 4");
}

/// Copy the dimensions of `shape` into an array.
///
/// The caller must ensure that the rank of `shape` is `N`.
fn static_dims<const N: usize>(shape: &Shape) -> [usize; N] {
    let mut dims = [0; N];
    dims.copy_from_slice(shape.dims());
    dims
}

/// Return the length shared by every sequence in `seqs`, or zero if there
/// are none.
///
/// Panics if the sequences have differing lengths.
#[track_caller]
fn uniform_len<'a, U: 'a>(depth: usize, seqs: impl IntoIterator<Item = &'a Vec<U>>) -> usize {
    let mut len = None;
    for seq in seqs {
        match len {
            None => len = Some(seq.len()),
            Some(len) if len != seq.len() => panic!(
                "malformed literal: sequences at depth {} have lengths {} and {}",
                depth,
                len,
                seq.len()
            ),
            Some(_) => {}
        }
    }
    len.unwrap_or(0)
}

impl<T, const N: usize> RankedTensor<T, N> {
    fn from_dyn(tensor: Tensor<T>) -> Self {
        let () = RankGuard::<N>::SUPPORTED;
        RankedTensor { tensor }
    }

    /// Create a tensor from a shape and units in row-major order.
    ///
    /// Fails if the length of `units` does not equal the product of `shape`.
    pub fn from_data(shape: [usize; N], units: Vec<T>) -> Result<Self, FromDataError> {
        Tensor::from_data(shape, units).map(Self::from_dyn)
    }

    /// Create a tensor with every unit set to `value`.
    pub fn full(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        Self::from_dyn(Tensor::full(shape, value))
    }

    /// Create a tensor with every unit set to its default value.
    pub fn zeros(shape: [usize; N]) -> Self
    where
        T: Clone + Default,
    {
        Self::from_dyn(Tensor::zeros(shape))
    }

    /// Return the size of each dimension.
    pub fn dims(&self) -> [usize; N] {
        static_dims(self.tensor.shape())
    }

    /// Return a view of this tensor with the same static rank.
    pub fn ranked_view(&self) -> RankedSlice<'_, T, N> {
        RankedSlice::from_dyn(self.tensor.view())
    }

    /// Return the unit at a full index.
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, index: [usize; N]) -> &T {
        self.ranked_view().get(index)
    }

    /// Return a mutable reference to the unit at a full index.
    ///
    /// Panics if the index is out of bounds.
    pub fn get_mut(&mut self, index: [usize; N]) -> &mut T {
        &mut self.tensor.at_mut(index).into_units_mut()[0]
    }

    /// Return the dynamically ranked tensor.
    pub fn as_dyn(&self) -> &Tensor<T> {
        &self.tensor
    }

    /// Consume this tensor and return it with a dynamic rank.
    pub fn into_dyn(self) -> Tensor<T> {
        self.tensor
    }
}

impl<'a, T, const N: usize> RankedSlice<'a, T, N> {
    fn from_dyn(view: TensorSlice<'a, T>) -> Self {
        let () = RankGuard::<N>::SUPPORTED;
        RankedSlice { view }
    }

    /// Return the size of each dimension.
    pub fn dims(&self) -> [usize; N] {
        static_dims(self.view.shape())
    }

    /// Return the units of this view in row-major order.
    pub fn units(&self) -> &'a [T] {
        self.view.units()
    }

    /// Return the unit at a full index.
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, index: [usize; N]) -> &'a T {
        let unit = self.view.at(index);
        &unit.units()[0]
    }

    /// Return the dynamically ranked view.
    pub fn as_dyn(&self) -> &TensorSlice<'a, T> {
        &self.view
    }

    /// Copy the viewed region into a new ranked tensor.
    pub fn to_tensor(&self) -> RankedTensor<T, N>
    where
        T: Clone,
    {
        RankedTensor::from_dyn(self.view.to_tensor())
    }
}

impl<T> RankedTensor<T, 1> {
    /// Return the unit at index `i`.
    ///
    /// Panics if `i` is out of bounds.
    pub fn element(&self, i: usize) -> &T {
        self.ranked_view().element(i)
    }

    /// Create a vector from a sequence of units.
    pub fn from_nested(units: Vec<T>) -> Self {
        Self::from_dyn(Tensor::from_vec(units))
    }
}

impl<'a, T> RankedSlice<'a, T, 1> {
    /// Return the unit at index `i`.
    ///
    /// Panics if `i` is out of bounds.
    pub fn element(&self, i: usize) -> &'a T {
        let units = self.view.units();
        assert!(
            i < units.len(),
            "index [{}] out of bounds for shape {}",
            i,
            self.view.shape()
        );
        &units[i]
    }
}

impl<T> RankedTensor<T, 2> {
    /// Create a matrix from a list of rows.
    ///
    /// Panics if the rows have differing lengths.
    #[track_caller]
    pub fn from_nested(rows: Vec<Vec<T>>) -> Self {
        let cols = uniform_len(1, &rows);
        let shape = [rows.len(), cols];
        let units = rows.into_iter().flatten().collect();
        Self::from_dyn(reshaped_into(Tensor::from_vec(units), shape))
    }
}

impl<T> RankedTensor<T, 3> {
    /// Create a rank 3 tensor from nested sequences.
    ///
    /// Panics if sequences at the same depth have differing lengths.
    #[track_caller]
    pub fn from_nested(units: Vec<Vec<Vec<T>>>) -> Self {
        let d1 = uniform_len(1, &units);
        let d2 = uniform_len(2, units.iter().flatten());
        let shape = [units.len(), d1, d2];
        let units = units.into_iter().flatten().flatten().collect();
        Self::from_dyn(reshaped_into(Tensor::from_vec(units), shape))
    }
}

impl<T> RankedTensor<T, 4> {
    /// Create a rank 4 tensor from nested sequences.
    ///
    /// Panics if sequences at the same depth have differing lengths.
    #[track_caller]
    pub fn from_nested(units: Vec<Vec<Vec<Vec<T>>>>) -> Self {
        let d1 = uniform_len(1, &units);
        let d2 = uniform_len(2, units.iter().flatten());
        let d3 = uniform_len(3, units.iter().flatten().flatten());
        let shape = [units.len(), d1, d2, d3];
        let units = units.into_iter().flatten().flatten().flatten().collect();
        Self::from_dyn(reshaped_into(Tensor::from_vec(units), shape))
    }
}

/// Reshape a vector whose unit count is known to match `shape`.
fn reshaped_into<T, const N: usize>(mut tensor: Tensor<T>, shape: [usize; N]) -> Tensor<T> {
    if let Err(err) = tensor.reshape(shape) {
        panic!("malformed literal: {}", err);
    }
    tensor
}

/// Implement rank-narrowing element access for a given static rank.
macro_rules! impl_element_narrowing {
    ($($rank:literal => $lower:literal),*) => {
        $(
            impl<T> RankedTensor<T, $rank> {
                /// Return a view of the element at index `i` along the
                /// leading dimension.
                ///
                /// Panics if `i` is out of bounds.
                pub fn element(&self, i: usize) -> RankedSlice<'_, T, $lower> {
                    RankedSlice::from_dyn(self.tensor.element(i))
                }

                /// Return a mutable view of the element at index `i` along
                /// the leading dimension.
                pub fn element_mut(&mut self, i: usize) -> TensorSliceMut<'_, T> {
                    self.tensor.element_mut(i)
                }
            }

            impl<'a, T> RankedSlice<'a, T, $rank> {
                /// Return a view of the element at index `i` along the
                /// leading dimension.
                ///
                /// Panics if `i` is out of bounds.
                pub fn element(&self, i: usize) -> RankedSlice<'a, T, $lower> {
                    RankedSlice::from_dyn(self.view.element(i))
                }
            }
        )*
    };
}

impl_element_narrowing!(2 => 1, 3 => 2, 4 => 3);

impl<T, const N: usize> TryFrom<Tensor<T>> for RankedTensor<T, N> {
    type Error = DimensionError;

    /// Convert a dynamically ranked tensor, failing if its rank is not `N`.
    fn try_from(tensor: Tensor<T>) -> Result<Self, DimensionError> {
        tensor.shape().to_array::<N>()?;
        Ok(Self::from_dyn(tensor))
    }
}

impl<'a, T, const N: usize> TryFrom<TensorSlice<'a, T>> for RankedSlice<'a, T, N> {
    type Error = DimensionError;

    /// Convert a dynamically ranked view, failing if its rank is not `N`.
    fn try_from(view: TensorSlice<'a, T>) -> Result<Self, DimensionError> {
        view.shape().to_array::<N>()?;
        Ok(Self::from_dyn(view))
    }
}

impl<T, const N: usize> From<RankedTensor<T, N>> for Tensor<T> {
    fn from(tensor: RankedTensor<T, N>) -> Tensor<T> {
        tensor.into_dyn()
    }
}

impl<T, const A: usize> From<[T; A]> for RankedTensor<T, 1> {
    fn from(units: [T; A]) -> Self {
        Self::from_dyn(Tensor::from(units))
    }
}

impl<T, const A: usize, const B: usize> From<[[T; B]; A]> for RankedTensor<T, 2> {
    fn from(units: [[T; B]; A]) -> Self {
        let units = units.into_iter().flatten().collect();
        Self::from_dyn(reshaped_into(Tensor::from_vec(units), [A, B]))
    }
}

impl<T, const A: usize, const B: usize, const C: usize> From<[[[T; C]; B]; A]>
    for RankedTensor<T, 3>
{
    fn from(units: [[[T; C]; B]; A]) -> Self {
        let units = units.into_iter().flatten().flatten().collect();
        Self::from_dyn(reshaped_into(Tensor::from_vec(units), [A, B, C]))
    }
}

impl<T, const A: usize, const B: usize, const C: usize, const D: usize>
    From<[[[[T; D]; C]; B]; A]> for RankedTensor<T, 4>
{
    fn from(units: [[[[T; D]; C]; B]; A]) -> Self {
        let units = units.into_iter().flatten().flatten().flatten().collect();
        Self::from_dyn(reshaped_into(Tensor::from_vec(units), [A, B, C, D]))
    }
}

impl<T, const N: usize> AsView for RankedTensor<T, N> {
    type Unit = T;

    fn view(&self) -> TensorSlice<'_, T> {
        self.tensor.view()
    }

    fn shape(&self) -> &Shape {
        self.tensor.shape()
    }

    fn units(&self) -> &[T] {
        self.tensor.units()
    }
}

impl<T, const N: usize> AsViewMut for RankedTensor<T, N> {
    fn view_mut(&mut self) -> TensorSliceMut<'_, T> {
        self.tensor.view_mut()
    }

    fn units_mut(&mut self) -> &mut [T] {
        self.tensor.units_mut()
    }
}

impl<T, const N: usize> AsView for RankedSlice<'_, T, N> {
    type Unit = T;

    fn view(&self) -> TensorSlice<'_, T> {
        self.view.clone()
    }

    fn shape(&self) -> &Shape {
        AsView::shape(&self.view)
    }

    fn units(&self) -> &[T] {
        self.view.units()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for RankedTensor<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tensor, f)
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for RankedSlice<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view, f)
    }
}
