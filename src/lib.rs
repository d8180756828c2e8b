//! corten provides multi-dimensional arrays (_tensors_) with shape-aware
//! indexing, zero-copy views and row-major contiguous storage.
//!
//! # Shapes and indices
//!
//! A [Shape] is a list of dimension sizes, outermost first. Besides the
//! basic queries ([rank](Shape::rank), [contiguous size](Shape::contiguous_size))
//! it provides the shape algebra used to check whether operations on tensors
//! are feasible: concatenation, matrix multiplication and broadcasting. These
//! return `None` rather than failing, so callers can test feasibility before
//! committing to an operation.
//!
//! An [Index] is a list of coordinates. It may address fewer dimensions than
//! the shape it is used with, in which case it refers to a sub-tensor.
//!
//! # Tensors and views
//!
//! [Tensor] is the owning container. It holds its units in a single
//! contiguous buffer in row-major order. [TensorSlice] and [TensorSliceMut]
//! are views which borrow an owning tensor and address a region of it
//! without copying. Views are created by indexing into the leading dimension
//! ([element](AsView::element)), by a full or partial index
//! ([at](AsView::at)) or by a range over the leading dimension
//! ([slice](AsView::slice)), and can be indexed further in the same way.
//!
//! The [AsView] and [AsViewMut] traits provide the reading and mutation
//! methods for tensors and views alike. The preferred way to import them is
//! via the prelude:
//!
//! ```
//! use corten::prelude::*;
//! use corten::Tensor;
//!
//! let mut tensor = Tensor::increasing_from([4, 3], 0);
//! assert_eq!(tensor.element(1).units(), &[3, 4, 5]);
//!
//! // Mutations through a view act on the owner's units.
//! tensor.slice_mut(2..).element_mut(0).fill(-1);
//! assert_eq!(tensor.element(2).units(), &[-1, -1, -1]);
//! ```
//!
//! Views borrow the tensor they were created from, so the borrow checker
//! ensures a view never outlives its owner and that a mutable view has
//! exclusive access to it.
//!
//! # Static rank
//!
//! [RankedTensor] and [RankedSlice] fix the rank at compile time (1 to 4).
//! Indexing the leading dimension of a ranked tensor yields a ranked view of
//! the next-lower rank.
//!
//! # Serialization
//!
//! Tensors can be serialized and deserialized using [serde](https://serde.rs)
//! if the `serde` feature is enabled. The serialized representation of a
//! tensor includes its shape and units in row-major order:
//!
//! ```json
//! {
//!   "shape": [2, 2],
//!   "data": [0.5, 1.0, 1.5, 2.0]
//! }
//! ```

pub mod errors;
mod impl_display;
#[cfg(feature = "serde")]
mod impl_serialize;
mod index;
mod index_iterator;
pub mod iterators;
mod macros;
mod ranked;
mod shape;
pub mod slice;
pub mod storage;
mod tensor;
pub mod unit;

// Re-exports for convenience.
pub use impl_display::{format_debug, FormatOptions, FormatTensor};
pub use index::Index;
pub use index_iterator::Indices;
pub use ranked::{RankedSlice, RankedTensor, Tensor1D, Tensor2D, Tensor3D, Tensor4D};
pub use shape::{is_valid_permutation, Shape};
pub use slice::{TensorSlice, TensorSliceBase, TensorSliceMut};
pub use storage::{Storage, StorageMut};
pub use tensor::{AsView, AsViewMut, Tensor, TensorBase};

/// This module provides a convenient way to import the most common traits
/// from this library via a glob import.
pub mod prelude {
    pub use super::{AsView, AsViewMut};
}

// This module is public for use by tests in dependent crates, but is
// considered internal to the project.
#[doc(hidden)]
pub mod test_util;
