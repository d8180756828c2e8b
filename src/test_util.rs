use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::iter::zip;

use crate::index_iterator::Indices;
use crate::tensor::AsView;

/// Trait that tests whether two values are approximately equal.
///
/// The comparison takes into account both the absolute difference of the
/// values and the relative difference, as NumPy's `np.allclose` does.
pub trait ApproxEq: Sized {
    /// Return the default absolute tolerance value.
    fn default_abs_tolerance() -> Self;

    /// Return the default relative tolerance value.
    fn default_rel_tolerance() -> Self;

    /// Test whether `self` is "close" to `other` according to the formula:
    ///
    /// ```text
    /// (self - other).abs() <= atol + rtol * other.abs()
    /// ```
    fn approx_eq_with_atol_rtol(&self, other: &Self, atol: Self, rtol: Self) -> bool;

    /// Test if `other` is approximately equal to `self` with the default
    /// tolerances for this type.
    fn approx_eq(&self, other: &Self) -> bool {
        self.approx_eq_with_atol_rtol(
            other,
            Self::default_abs_tolerance(),
            Self::default_rel_tolerance(),
        )
    }
}

macro_rules! impl_approx_eq_float {
    ($($type:ty),*) => {
        $(
            impl ApproxEq for $type {
                #[inline]
                fn default_abs_tolerance() -> $type {
                    1e-8
                }

                #[inline]
                fn default_rel_tolerance() -> $type {
                    1e-5
                }

                #[inline]
                fn approx_eq_with_atol_rtol(&self, other: &$type, atol: $type, rtol: $type) -> bool {
                    (self - other).abs() <= atol + rtol * other.abs()
                }
            }
        )*
    };
}

impl_approx_eq_float!(f32, f64);

impl ApproxEq for i32 {
    #[inline]
    fn default_abs_tolerance() -> i32 {
        0
    }

    #[inline]
    fn default_rel_tolerance() -> i32 {
        0
    }

    #[inline]
    fn approx_eq_with_atol_rtol(&self, other: &i32, atol: i32, rtol: i32) -> bool {
        (self - other).abs() <= atol + rtol * other.abs()
    }
}

#[derive(Debug)]
pub enum ExpectEqualError {
    ShapeMismatch(String),
    ValueMismatch(String),
}

impl Display for ExpectEqualError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectEqualError::ShapeMismatch(details) => write!(f, "{}", details),
            ExpectEqualError::ValueMismatch(details) => write!(f, "{}", details),
        }
    }
}

impl Error for ExpectEqualError {}

/// Check that the shapes of two tensors or views are equal and that their
/// units are approximately equal.
///
/// If there are mismatches, this returns an `Err` with a message indicating
/// the count of mismatches and details of the first few.
pub fn expect_equal<A, B>(x: &A, y: &B) -> Result<(), ExpectEqualError>
where
    A: AsView + ?Sized,
    B: AsView<Unit = A::Unit> + ?Sized,
    A::Unit: Debug + ApproxEq,
{
    if x.shape() != y.shape() {
        return Err(ExpectEqualError::ShapeMismatch(format!(
            "Tensors have different shapes. {} vs. {}",
            x.shape(),
            y.shape()
        )));
    }

    let mismatches: Vec<_> = zip(Indices::from_shape(x.shape()), zip(x.units(), y.units()))
        .filter(|(_, (xi, yi))| !xi.approx_eq(yi))
        .collect();

    if mismatches.is_empty() {
        return Ok(());
    }

    let max_examples = 16;
    Err(ExpectEqualError::ValueMismatch(format!(
        "Tensor values differ at {} of {} indexes: {:?}{}",
        mismatches.len(),
        x.unit_count(),
        &mismatches[..mismatches.len().min(max_examples)],
        if mismatches.len() > max_examples {
            "..."
        } else {
            ""
        }
    )))
}
