use std::fmt::{Debug, Display, Error, Formatter};

use crate::slice::{TensorSlice, TensorSliceBase};
use crate::storage::Storage;
use crate::tensor::{AsView, TensorBase};

/// Entry in the formatted representation of a tensor's data.
enum Entry<T: Debug> {
    Value(T),

    /// "..." used to elide long dimensions.
    Ellipsis,
}

impl<T: Debug> Debug for Entry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Entry::Value(val) => write!(f, "{:?}", val),
            Entry::Ellipsis => write!(f, "..."),
        }
    }
}

/// Configuration for debug formatting of a tensor.
#[derive(Clone, Debug)]
pub struct FormatOptions {
    /// Maximum number of units to print in the innermost dimension before
    /// eliding.
    pub max_columns: usize,

    /// Maximum number of elements to print in each outer dimension before
    /// eliding.
    pub max_elements: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            max_columns: 10,
            max_elements: 10,
        }
    }
}

/// A [`Debug`]-implementing wrapper around a view with custom formatting
/// options.
///
/// Use [`format_debug`] to create one.
pub struct FormatTensor<'a, T> {
    view: TensorSlice<'a, T>,
    opts: FormatOptions,
}

/// Return a [`Debug`] formatter for `tensor` which uses custom options.
///
/// ```
/// use corten::{format_debug, FormatOptions, Tensor};
///
/// let tensor = Tensor::increasing_from([20], 0);
/// let opts = FormatOptions { max_columns: 4, ..Default::default() };
/// assert_eq!(
///     format!("{:?}", format_debug(&tensor, opts)),
///     "[0, 1, ..., 18, 19], shape=[20]"
/// );
/// ```
pub fn format_debug<V: AsView + ?Sized>(tensor: &V, opts: FormatOptions) -> FormatTensor<'_, V::Unit> {
    FormatTensor {
        view: tensor.view(),
        opts,
    }
}

impl<T: Debug> FormatTensor<'_, T> {
    /// Format a vector as a list (`[0, 1, 2, ... n]`).
    fn write_vector(&self, f: &mut Formatter<'_>, row: &[T]) -> Result<(), Error> {
        let len = row.len();
        let max = self.opts.max_columns;

        let head = row.iter().take(max / 2);
        let tail = row.iter().skip(max / 2).skip(len.saturating_sub(max));

        let mut data_fmt = f.debug_list();
        data_fmt.entries(head.map(Entry::Value));
        if len > max {
            data_fmt.entry(&Entry::<&T>::Ellipsis);
        }
        data_fmt.entries(tail.map(Entry::Value));
        data_fmt.finish()
    }

    /// Format a view with two or more dimensions as a list of its elements,
    /// one per line.
    ///
    /// `depth` is the nesting level of `view`, which determines the
    /// indentation of lines after the first.
    fn write_nested(
        &self,
        f: &mut Formatter<'_>,
        view: &TensorSlice<'_, T>,
        depth: usize,
    ) -> Result<(), Error> {
        if view.rank() < 2 {
            return self.write_vector(f, view.units());
        }

        let indent = " ".repeat(depth + 1);
        let count = view.element_count();
        let shown = count.min(self.opts.max_elements);

        write!(f, "[")?;
        for (i, element) in view.elements().take(shown).enumerate() {
            if i > 0 {
                write!(f, ",\n{}", indent)?;
            }
            self.write_nested(f, &element, depth + 1)?;
        }
        if count > shown {
            write!(f, ",\n{}...", indent)?;
        }
        write!(f, "]")
    }
}

impl<T: Debug> Debug for FormatTensor<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self.view.item() {
            Some(item) => write!(f, "({:?})", item)?,
            None => self.write_nested(f, &self.view, 0)?,
        }
        write!(f, ", shape={}", self.view.shape())
    }
}

/// Render `view` as nested bracketed lists, or as its unit if it is a
/// scalar.
fn write_display<T: Display>(f: &mut Formatter<'_>, view: &TensorSlice<'_, T>) -> Result<(), Error> {
    if let Some(item) = view.item() {
        return write!(f, "{}", item);
    }
    write!(f, "[")?;
    for (i, element) in view.elements().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_display(f, &element)?;
    }
    write!(f, "]")
}

impl<T: Debug> Debug for TensorBase<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:?}", format_debug(self, FormatOptions::default()))
    }
}

impl<S: Storage> Debug for TensorSliceBase<S>
where
    S::Unit: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:?}", format_debug(self, FormatOptions::default()))
    }
}

impl<T: Display> Display for TensorBase<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write_display(f, &self.view())
    }
}

impl<S: Storage> Display for TensorSliceBase<S>
where
    S::Unit: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write_display(f, &self.view())
    }
}

#[cfg(test)]
mod tests {
    use super::{format_debug, FormatOptions};
    use crate::prelude::*;
    use crate::Tensor;

    #[test]
    fn test_debug() {
        struct Case<'a> {
            tensor: Tensor,
            opts: FormatOptions,
            expected: &'a str,
        }

        let cases = [
            // Scalar
            Case {
                tensor: Tensor::scalar(2.),
                opts: FormatOptions::default(),
                expected: "(2.0), shape=[]",
            },
            // Empty vector
            Case {
                tensor: Tensor::from_vec(vec![]),
                opts: FormatOptions::default(),
                expected: "[], shape=[0]",
            },
            // Short vector
            Case {
                tensor: Tensor::from([1., 2., 3., 4.]),
                opts: FormatOptions::default(),
                expected: "[1.0, 2.0, 3.0, 4.0], shape=[4]",
            },
            // Long vector
            Case {
                tensor: Tensor::increasing_from([21], 1.),
                opts: FormatOptions {
                    max_columns: 10,
                    ..Default::default()
                },
                expected: "[1.0, 2.0, 3.0, 4.0, 5.0, ..., 17.0, 18.0, 19.0, 20.0, 21.0], shape=[21]",
            },
            // Matrix
            Case {
                tensor: Tensor::increasing_from([2, 2], 1.),
                opts: FormatOptions::default(),
                expected: "
[[1.0, 2.0],
 [3.0, 4.0]], shape=[2, 2]"
                    .trim(),
            },
            // Matrix with elided rows
            Case {
                tensor: Tensor::increasing_from([3, 2], 1.),
                opts: FormatOptions {
                    max_elements: 2,
                    ..Default::default()
                },
                expected: "
[[1.0, 2.0],
 [3.0, 4.0],
 ...], shape=[3, 2]"
                    .trim(),
            },
            // 3D
            Case {
                tensor: Tensor::increasing_from([1, 2, 2], 1.),
                opts: FormatOptions::default(),
                expected: "
[[[1.0, 2.0],
  [3.0, 4.0]]], shape=[1, 2, 2]"
                    .trim(),
            },
        ];

        for Case {
            tensor,
            opts,
            expected,
        } in cases
        {
            let debug_str = format!("{:?}", format_debug(&tensor, opts));
            assert_eq!(debug_str, expected);
        }
    }

    #[test]
    fn test_debug_view() {
        let tensor = Tensor::increasing_from([3, 2], 0);
        assert_eq!(format!("{:?}", tensor.element(2)), "[4, 5], shape=[2]");
        assert_eq!(format!("{:?}", tensor.at([2, 1])), "(5), shape=[]");
    }

    #[test]
    fn test_display() {
        let scalar = Tensor::scalar(7);
        assert_eq!(scalar.to_string(), "7");

        let tensor = Tensor::increasing_from([2, 2, 2], 0);
        assert_eq!(tensor.to_string(), "[[[0, 1], [2, 3]], [[4, 5], [6, 7]]]");
        assert_eq!(tensor.element(1).to_string(), "[[4, 5], [6, 7]]");
        assert_eq!(tensor.slice(1..).element(0).element(1).to_string(), "[6, 7]");

        let empty = Tensor::<i32>::empty([3]);
        assert_eq!(empty.to_string(), "[]");
    }
}
