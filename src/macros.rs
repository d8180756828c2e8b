/// Construct a [`Tensor`](crate::Tensor) from literal units.
///
/// ```
/// use corten::{tensor, Tensor};
///
/// // Create a scalar
/// let scalar = tensor!(2.);
/// assert_eq!(scalar, Tensor::scalar(2.));
///
/// // Create a vector
/// let vector = tensor!([1, 2, 3]);
/// assert_eq!(vector, Tensor::from_vec(vec![1, 2, 3]));
///
/// // Create a tensor with shape [1, 2, 2] and units [1, 2, 3, 4].
/// let tensor = tensor!((1, 2, 2); [1, 2, 3, 4]);
/// assert_eq!(tensor, Tensor::increasing_from([1, 2, 2], 1));
/// ```
///
/// Panics if the number of units does not match the shape.
#[macro_export]
macro_rules! tensor {
    [[$($unit:expr),*]] => {
        {
            use $crate::Tensor;
            Tensor::from_vec(vec![$($unit),*])
        }
    };

    // As above, but with trailing comma.
    [[$($unit:expr),*,]] => {
        $crate::tensor!([$($unit),*])
    };

    (($($dim:expr),+); [$($unit:expr),*]) => {
        {
            use $crate::Tensor;
            match Tensor::from_data([$($dim),+], vec![$($unit),*]) {
                Ok(tensor) => tensor,
                Err(err) => panic!("{}", err),
            }
        }
    };

    // As above, but with trailing comma.
    (($($dim:expr),+); [$($unit:expr),*,]) => {
        $crate::tensor!(($($dim),+); [$($unit),*])
    };

    ($unit:expr) => {
        {
            use $crate::Tensor;
            Tensor::scalar($unit)
        }
    };
}
