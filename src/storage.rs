use crate::tensor::Tensor;

/// Trait for the borrow of an owning tensor that backs a view.
///
/// Views never own units. They hold either a shared borrow of the owning
/// [`Tensor`] (read-only views) or an exclusive borrow (mutable views, which
/// also implement [`StorageMut`]). The borrow checker therefore guarantees
/// that a view cannot outlive its owner, and that while a mutable view
/// exists no other view of the same owner can be used.
pub trait Storage {
    /// The unit type of the owning tensor.
    type Unit;

    /// Return the owning tensor.
    fn tensor(&self) -> &Tensor<Self::Unit>;
}

/// Trait for storage through which the owning tensor can be mutated.
pub trait StorageMut: Storage {
    /// Return the owning tensor for mutation.
    fn tensor_mut(&mut self) -> &mut Tensor<Self::Unit>;
}

impl<T> Storage for &Tensor<T> {
    type Unit = T;

    #[inline]
    fn tensor(&self) -> &Tensor<T> {
        self
    }
}

impl<T> Storage for &mut Tensor<T> {
    type Unit = T;

    #[inline]
    fn tensor(&self) -> &Tensor<T> {
        self
    }
}

impl<T> StorageMut for &mut Tensor<T> {
    #[inline]
    fn tensor_mut(&mut self) -> &mut Tensor<T> {
        self
    }
}
