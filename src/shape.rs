//! Tensor shapes and shape algebra.
//!
//! A [`Shape`] is an ordered list of dimension sizes, outermost first. The
//! algebra in this module (concatenation, matrix multiplication, broadcasting)
//! never fails hard: each operation returns `None` when the operands are
//! incompatible, and has a `can_*` predicate derived from it so callers can
//! test feasibility before committing.

use std::fmt;
use std::iter::zip;
use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use crate::errors::DimensionError;

/// Storage for dimension sizes. Most tensors have four or fewer dimensions.
type Dims = SmallVec<[usize; 4]>;

/// Return true if `permutation` is a valid permutation of dimensions for
/// a shape of rank `ndim`.
pub fn is_valid_permutation(ndim: usize, permutation: &[usize]) -> bool {
    permutation.len() == ndim
        && (0..ndim).all(|dim| permutation.iter().filter(|d| **d == dim).count() == 1)
}

/// The sizes of each dimension of a tensor, outermost first.
///
/// A shape of rank 0 describes a scalar.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Dims,
}

impl Shape {
    /// Return the shape of a scalar, which has no dimensions.
    pub fn scalar() -> Shape {
        Shape {
            dims: SmallVec::new(),
        }
    }

    /// Create a shape from a slice of dimension sizes.
    pub fn from_slice(dims: &[usize]) -> Shape {
        Shape {
            dims: SmallVec::from_slice(dims),
        }
    }

    /// Return the dimension sizes as a slice.
    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Return an iterator over the dimension sizes.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + ExactSizeIterator + '_ {
        self.dims.iter().copied()
    }

    /// Return the number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Return the number of units a contiguous tensor of this shape holds.
    ///
    /// This is the product of the dimension sizes, which is `1` for a scalar
    /// and `0` if any dimension is empty. Leading size-1 dimensions do not
    /// affect the result, so similar shapes with no empty dimensions have the
    /// same contiguous size.
    ///
    /// Note this is not the product of the [simplified](Shape::simplified)
    /// dimensions: `[3, 0, 2]` simplifies to `[3]` but holds no units, so its
    /// contiguous size is `0`. The size always matches the storage length of
    /// a tensor with this shape.
    #[inline]
    pub fn contiguous_size(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_scalar(&self) -> bool {
        self.rank() == 0
    }

    pub fn is_vector(&self) -> bool {
        self.rank() == 1
    }

    pub fn is_matrix(&self) -> bool {
        self.rank() == 2
    }

    /// Return the row-major strides of a contiguous tensor with this shape.
    ///
    /// The stride of a dimension is the product of the sizes of all the
    /// dimensions after it.
    pub fn contiguous_strides(&self) -> SmallVec<[usize; 4]> {
        let mut strides: SmallVec<[usize; 4]> = SmallVec::from_elem(0, self.rank());
        let mut stride = 1;
        for i in (0..self.rank()).rev() {
            strides[i] = stride;
            stride *= self.dims[i];
        }
        strides
    }

    /// Convert this shape into an array with a static dimension count.
    ///
    /// Fails if the rank is not `N`.
    pub fn to_array<const N: usize>(&self) -> Result<[usize; N], DimensionError> {
        self.dims.as_slice().try_into().map_err(|_| DimensionError {
            expected: N,
            actual: self.rank(),
        })
    }

    /// Return a new shape with an outer dimension of size `size`.
    pub fn prepending(&self, size: usize) -> Shape {
        let mut dims = Dims::with_capacity(self.rank() + 1);
        dims.push(size);
        dims.extend_from_slice(&self.dims);
        Shape { dims }
    }

    /// Return a new shape with an inner dimension of size `size`.
    pub fn appending(&self, size: usize) -> Shape {
        let mut dims = self.dims.clone();
        dims.push(size);
        Shape { dims }
    }

    /// Return the shape of each first-level element, ie. this shape without
    /// its outermost dimension, or `None` if this is a scalar shape.
    pub fn dropping_first(&self) -> Option<Shape> {
        if self.is_scalar() {
            return None;
        }
        Some(Shape::from_slice(&self.dims[1..]))
    }

    /// Return a copy of this shape with dimension `dim` removed.
    ///
    /// Panics if `dim >= self.rank()`.
    pub fn dropping_dimension(&self, dim: usize) -> Shape {
        assert!(
            dim < self.rank(),
            "dim {} out of bounds for shape {}",
            dim,
            self
        );
        let mut dims = self.dims.clone();
        dims.remove(dim);
        Shape { dims }
    }

    /// Return a copy of this shape with leading size-1 dimensions removed.
    pub fn dropping_higher_paddings(&self) -> Shape {
        let padding = self.dims.iter().take_while(|&&size| size == 1).count();
        Shape::from_slice(&self.dims[padding..])
    }

    /// Return the simplified form of this shape.
    ///
    /// Simplification drops leading size-1 dimensions ("higher paddings"),
    /// then truncates the shape before the first dimension of size 0. The
    /// result is used to compare shapes independent of degenerate leading
    /// dimensions, see [`is_similar_to`](Shape::is_similar_to).
    pub fn simplified(&self) -> Shape {
        self.dropping_higher_paddings()
            .iter()
            .take_while(|&size| size != 0)
            .collect()
    }

    /// Return true if this shape and `other` have the same simplified form.
    ///
    /// For example `[1, 1, 4]` is similar to `[4]` but not equal to it.
    pub fn is_similar_to(&self, other: &Shape) -> bool {
        self.simplified() == other.simplified()
    }

    /// Left-pad this shape with size-1 dimensions until it has rank `rank`.
    ///
    /// Shapes that already have rank `rank` or greater are returned
    /// unchanged.
    pub fn padded_to_rank(&self, rank: usize) -> Shape {
        let pad = rank.saturating_sub(self.rank());
        let mut dims = Dims::with_capacity(pad + self.rank());
        dims.resize(pad, 1);
        dims.extend_from_slice(&self.dims);
        Shape { dims }
    }

    /// Return the conformed pair of `self` and `other`.
    ///
    /// The shapes are right-aligned to the same rank by left-padding the lower
    /// rank shape with size-1 dimensions. The higher rank shape is never
    /// truncated.
    pub fn conformed_with(&self, other: &Shape) -> (Shape, Shape) {
        let rank = self.rank().max(other.rank());
        (self.padded_to_rank(rank), other.padded_to_rank(rank))
    }

    /// Return the shape formed by concatenating `self` and `other` along
    /// dimension `dim`.
    ///
    /// Returns `None` unless both shapes have the same rank, `dim` is less
    /// than that rank and every dimension other than `dim` matches exactly.
    pub fn concatenating(&self, other: &Shape, dim: usize) -> Option<Shape> {
        if self.rank() != other.rank() || dim >= self.rank() {
            return None;
        }
        let others_match = zip(self.iter(), other.iter())
            .enumerate()
            .all(|(i, (a, b))| i == dim || a == b);
        if !others_match {
            return None;
        }
        let mut dims = self.dims.clone();
        dims[dim] += other.dims[dim];
        Some(Shape { dims })
    }

    /// Return true if [`concatenating`](Shape::concatenating) would succeed.
    pub fn can_concatenate(&self, other: &Shape, dim: usize) -> bool {
        self.concatenating(other, dim).is_some()
    }

    /// Return the shape of the product of tensors with shapes `self` and
    /// `other`, contracting the innermost dimension of `self` with the
    /// outermost dimension of `other`.
    ///
    /// For matrices this is the usual `[m, k] x [k, n] => [m, n]`. Two vectors
    /// of equal length produce a scalar. Returns `None` if either shape is a
    /// scalar or the contracted sizes differ.
    pub fn multiplied(&self, other: &Shape) -> Option<Shape> {
        let (&inner, outer) = (self.dims.last()?, other.dims.first()?);
        if inner != *outer {
            return None;
        }
        let dims = self.dims[..self.rank() - 1]
            .iter()
            .chain(other.dims[1..].iter())
            .copied()
            .collect();
        Some(Shape { dims })
    }

    /// Return true if [`multiplied`](Shape::multiplied) would succeed.
    pub fn can_multiply(&self, other: &Shape) -> bool {
        self.multiplied(other).is_some()
    }

    /// Return the shape of a (batched) matrix multiplication of `self` by
    /// `other`.
    ///
    /// Both shapes are conformed to a common rank of at least 2. The inner
    /// dimensions (last of `self`, second-to-last of `other`) must match and
    /// the leading batch dimensions must broadcast together. The result has
    /// the broadcast batch dimensions followed by `[rows of self, columns of
    /// other]`. Returns `None` if either shape is a scalar or the shapes are
    /// incompatible.
    pub fn matrix_multiplied(&self, other: &Shape) -> Option<Shape> {
        if self.is_scalar() || other.is_scalar() {
            return None;
        }
        let rank = self.rank().max(other.rank()).max(2);
        let lhs = self.padded_to_rank(rank);
        let rhs = other.padded_to_rank(rank);

        if lhs.dims[rank - 1] != rhs.dims[rank - 2] {
            return None;
        }

        let lhs_batch = Shape::from_slice(&lhs.dims[..rank - 2]);
        let rhs_batch = Shape::from_slice(&rhs.dims[..rank - 2]);
        let batch = lhs_batch.mutually_broadcasted(&rhs_batch)?;

        Some(batch.appending(lhs.dims[rank - 2]).appending(rhs.dims[rank - 1]))
    }

    /// Return true if [`matrix_multiplied`](Shape::matrix_multiplied) would
    /// succeed.
    pub fn can_matrix_multiply(&self, other: &Shape) -> bool {
        self.matrix_multiplied(other).is_some()
    }

    /// Return a copy of this shape with the order of dimensions reversed.
    pub fn transposed(&self) -> Shape {
        self.iter().rev().collect()
    }

    /// Return a copy of this shape with dimensions re-ordered so that
    /// dimension `i` of the result is dimension `order[i]` of `self`.
    ///
    /// Returns `None` if `order` is not a permutation of `0..self.rank()`.
    pub fn permuted(&self, order: &[usize]) -> Option<Shape> {
        if !is_valid_permutation(self.rank(), order) {
            return None;
        }
        Some(order.iter().map(|&dim| self.dims[dim]).collect())
    }

    /// Return true if this shape simplifies to the scalar shape.
    ///
    /// This holds for shapes whose dimensions are all 1, and for shapes whose
    /// first non-1 dimension is empty.
    pub fn is_scalar_like(&self) -> bool {
        self.simplified().is_scalar()
    }

    /// Return the shape that `self` takes when broadcast to `target`.
    ///
    /// A shape that simplifies to a scalar broadcasts to every shape and
    /// yields `target` unchanged. Otherwise the conformed shapes must be
    /// equal, see [`mutually_broadcasted`](Shape::mutually_broadcasted).
    pub fn broadcasted(&self, target: &Shape) -> Option<Shape> {
        self.mutually_broadcasted(target)
    }

    /// Return true if [`broadcasted`](Shape::broadcasted) would succeed.
    pub fn can_broadcast_to(&self, target: &Shape) -> bool {
        self.broadcasted(target).is_some()
    }

    /// Return the shape that both `self` and `other` broadcast to.
    ///
    /// If exactly one of the shapes simplifies to a scalar, the result is the
    /// other shape as given. Otherwise the two shapes must be equal after
    /// conforming, and the result is the conformed shape. Unlike numpy, a
    /// size-1 dimension inside a non-scalar shape is not stretched.
    pub fn mutually_broadcasted(&self, other: &Shape) -> Option<Shape> {
        match (self.is_scalar_like(), other.is_scalar_like()) {
            (true, false) => return Some(other.clone()),
            (false, true) => return Some(self.clone()),
            _ => {}
        }
        let (lhs, rhs) = self.conformed_with(other);
        (lhs == rhs).then_some(lhs)
    }

    /// Return true if [`mutually_broadcasted`](Shape::mutually_broadcasted)
    /// would succeed.
    pub fn can_mutually_broadcast(&self, other: &Shape) -> bool {
        self.mutually_broadcasted(other).is_some()
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        &self.dims
    }
}

impl Index<usize> for Shape {
    type Output = usize;

    fn index(&self, dim: usize) -> &usize {
        &self.dims[dim]
    }
}

impl IndexMut<usize> for Shape {
    fn index_mut(&mut self, dim: usize) -> &mut usize {
        &mut self.dims[dim]
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Shape {
        Shape {
            dims: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Shape {
        Shape::from_slice(&dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Shape {
        Shape::from_slice(dims)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Shape {
        Shape {
            dims: SmallVec::from_vec(dims),
        }
    }
}

impl From<&Shape> for Shape {
    fn from(shape: &Shape) -> Shape {
        shape.clone()
    }
}

impl PartialEq<[usize]> for Shape {
    fn eq(&self, other: &[usize]) -> bool {
        self.dims.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Shape {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.dims.as_slice() == other.as_slice()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.dims.as_slice())
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
