//! Error types that are reported by various tensor operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::shape::Shape;

/// Error in a tensor operation if the dimension count is incorrect.
#[derive(Debug, PartialEq)]
pub struct DimensionError {
    /// Dimension count that was required.
    pub expected: usize,

    /// Dimension count that was found.
    pub actual: usize,
}

impl Display for DimensionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dim count is incorrect (expected {}, got {})",
            self.expected, self.actual
        )
    }
}

impl Error for DimensionError {}

/// Errors that can occur when constructing a tensor from existing units.
#[derive(Clone, Debug, PartialEq)]
pub enum FromDataError {
    /// Fewer units were supplied than the shape requires, and there was no
    /// supplier to fill the vacancies.
    StorageTooShort,

    /// The unit count was expected to exactly match the contiguous size of
    /// the shape, and it did not.
    StorageLengthMismatch,
}

impl Display for FromDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FromDataError::StorageTooShort => write!(f, "data too short"),
            FromDataError::StorageLengthMismatch => write!(f, "data length mismatch"),
        }
    }
}

impl Error for FromDataError {}

/// Errors that can occur when indexing or slicing a tensor or view.
#[derive(Clone, Debug, PartialEq)]
pub enum SliceError {
    /// A scalar was indexed with a non-empty index.
    InvalidRankAccess,

    /// The index has more coordinates than the tensor has dimensions.
    TooManyDims,

    /// A coordinate is out of bounds for the corresponding dimension.
    InvalidIndex,

    /// A range is out of bounds for the leading dimension.
    InvalidRange,
}

impl Display for SliceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SliceError::InvalidRankAccess => write!(f, "cannot index into a scalar"),
            SliceError::TooManyDims => write!(f, "index has too many dims"),
            SliceError::InvalidIndex => write!(f, "index is invalid"),
            SliceError::InvalidRange => write!(f, "slice range is invalid"),
        }
    }
}

impl Error for SliceError {}

/// Error when a replacement tensor does not have the shape of the region it
/// is assigned to.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeMismatch {
    pub expected: Shape,
    pub actual: Shape,
}

impl Display for ShapeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "shape mismatch: expected {}, got {}",
            self.expected, self.actual
        )
    }
}

impl Error for ShapeMismatch {}

/// Errors that can occur while reshaping a tensor in place.
#[derive(Clone, Debug, PartialEq)]
pub enum ReshapeError {
    /// The new shape has a different contiguous size than the current one.
    LengthMismatch,
}

impl Display for ReshapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReshapeError::LengthMismatch => write!(f, "new shape has a different length"),
        }
    }
}

impl Error for ReshapeError {}

/// Errors that can occur while growing or splicing the leading dimension of
/// a tensor.
#[derive(Clone, Debug, PartialEq)]
pub enum ExpandError {
    /// The element shape of the new elements does not match the element
    /// shape of the tensor.
    ShapeMismatch,

    /// The tensor is a scalar and has no leading dimension to grow.
    ScalarTensor,
}

impl Display for ExpandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpandError::ShapeMismatch => {
                write!(f, "element shapes of source and destination do not match")
            }
            ExpandError::ScalarTensor => write!(f, "cannot grow a scalar tensor"),
        }
    }
}

impl Error for ExpandError {}
