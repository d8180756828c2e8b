//! Coordinates into a tensor and their mapping to row-major storage offsets.

use std::fmt;
use std::iter::zip;
use std::ops;

use smallvec::SmallVec;

use crate::shape::Shape;

/// A list of coordinates, one per addressed dimension, outermost first.
///
/// An index may have fewer coordinates than the shape it is used with, in
/// which case it addresses a sub-tensor and the unaddressed trailing
/// dimensions are preserved. Indices are ordered lexicographically, most
/// significant dimension first.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Index {
    coords: SmallVec<[usize; 4]>,
}

impl Index {
    /// Create an index from a slice of coordinates.
    pub fn from_slice(coords: &[usize]) -> Index {
        Index {
            coords: SmallVec::from_slice(coords),
        }
    }

    /// Return the full index of the unit at `offset` in contiguous storage
    /// with shape `shape`.
    ///
    /// This is the inverse of [`contiguous_index`](Index::contiguous_index)
    /// for full indices.
    ///
    /// Panics if `offset` is not less than the contiguous size of `shape`.
    pub fn from_contiguous_index(offset: usize, shape: &Shape) -> Index {
        assert!(
            offset < shape.contiguous_size(),
            "offset {} out of bounds for shape {}",
            offset,
            shape
        );
        let mut rem = offset;
        shape
            .contiguous_strides()
            .into_iter()
            .map(|stride| {
                let coord = rem / stride;
                rem %= stride;
                coord
            })
            .collect()
    }

    /// Return the coordinates as a slice.
    #[inline]
    pub fn coords(&self) -> &[usize] {
        &self.coords
    }

    /// Return the number of coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Return true if this index has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Return the position of this index within the row-major ordering of
    /// the first `self.len()` dimensions of `shape`.
    ///
    /// The stride of each coordinate is the product of the sizes of the
    /// dimensions after it, within the prefix of `shape` that this index
    /// addresses. For a full index this is the unit offset. For a partial
    /// index it counts whole sub-tensors, see
    /// [`unit_offset`](Index::unit_offset).
    ///
    /// Panics if the index has more coordinates than `shape` has dimensions.
    pub fn contiguous_index(&self, shape: &Shape) -> usize {
        assert!(
            self.len() <= shape.rank(),
            "index {} has too many dims for shape {}",
            self,
            shape
        );
        let prefix = &shape.dims()[..self.len()];
        let mut offset = 0;
        let mut stride = 1;
        for (&coord, &size) in zip(self.coords.iter(), prefix.iter()).rev() {
            offset += coord * stride;
            stride *= size;
        }
        offset
    }

    /// Return the offset of the first unit of the sub-tensor this index
    /// addresses in contiguous storage with shape `shape`.
    pub fn unit_offset(&self, shape: &Shape) -> usize {
        let inner_size: usize = shape.dims()[self.len().min(shape.rank())..]
            .iter()
            .product();
        self.contiguous_index(shape) * inner_size
    }

    /// Return true if every coordinate is within the bounds of the
    /// corresponding dimension of `shape`.
    pub fn is_valid_in(&self, shape: &Shape) -> bool {
        self.len() <= shape.rank() && zip(self.coords.iter(), shape.iter()).all(|(&c, s)| c < s)
    }

    /// Return a copy of this index with the last coordinate increased by `n`.
    ///
    /// An empty index is returned unchanged.
    pub fn advanced(&self, n: usize) -> Index {
        let mut advanced = self.clone();
        if let Some(last) = advanced.coords.last_mut() {
            *last += n;
        }
        advanced
    }

    /// Return a copy of this index with an extra innermost coordinate.
    pub fn appending(&self, coord: usize) -> Index {
        let mut coords = self.coords.clone();
        coords.push(coord);
        Index { coords }
    }

    /// Return the index formed by addressing `other` within the sub-tensor
    /// that `self` addresses.
    pub fn concatenating(&self, other: &Index) -> Index {
        let mut coords = self.coords.clone();
        coords.extend_from_slice(&other.coords);
        Index { coords }
    }
}

impl AsRef<[usize]> for Index {
    fn as_ref(&self) -> &[usize] {
        &self.coords
    }
}

impl ops::Index<usize> for Index {
    type Output = usize;

    fn index(&self, dim: usize) -> &usize {
        &self.coords[dim]
    }
}

impl ops::IndexMut<usize> for Index {
    fn index_mut(&mut self, dim: usize) -> &mut usize {
        &mut self.coords[dim]
    }
}

impl FromIterator<usize> for Index {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Index {
        Index {
            coords: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[usize; N]> for Index {
    fn from(coords: [usize; N]) -> Index {
        Index::from_slice(&coords)
    }
}

impl From<&[usize]> for Index {
    fn from(coords: &[usize]) -> Index {
        Index::from_slice(coords)
    }
}

impl From<Vec<usize>> for Index {
    fn from(coords: Vec<usize>) -> Index {
        Index {
            coords: SmallVec::from_vec(coords),
        }
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Index {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.coords.as_slice() == other.as_slice()
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.coords.as_slice())
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
