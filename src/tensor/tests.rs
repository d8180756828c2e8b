use corten_testing::TestCases;

use super::{AsView, AsViewMut, Tensor};
use crate::errors::{ExpandError, FromDataError, ReshapeError, ShapeMismatch};
use crate::index::Index;
use crate::shape::Shape;
use crate::test_util::expect_equal;

#[test]
fn test_full() {
    let cases = [
        (Shape::from([2, 3]), 7),
        (Shape::scalar(), 1),
        (Shape::from([4, 0]), 3),
        (Shape::from([1, 1, 5]), -2),
    ];

    cases.test_each_clone(|(shape, value)| {
        let tensor = Tensor::full(shape.clone(), value);
        assert_eq!(*tensor.shape(), shape);
        assert_eq!(tensor.unit_count(), shape.contiguous_size());
        assert!(tensor.units().iter().all(|&unit| unit == value));
    })
}

#[test]
fn test_scalar() {
    let tensor = Tensor::scalar(3.5);
    assert!(tensor.is_scalar());
    assert_eq!(tensor.rank(), 0);
    assert_eq!(tensor.item(), Some(&3.5));
    assert_eq!(tensor.element_count(), 0);
    assert_eq!(tensor.element_shape(), None);
    assert_eq!(tensor.unit_count(), 1);
    assert_eq!(Tensor::<f32>::default(), Tensor::scalar(0.));
}

#[test]
fn test_from_supplier_and_fn() {
    let mut next = 0;
    let tensor = Tensor::from_supplier([2, 2], || {
        next += 10;
        next
    });
    assert_eq!(tensor.units(), &[10, 20, 30, 40]);

    let tensor = Tensor::from_fn([2, 3], |index: &Index| index[0] * 10 + index[1]);
    assert_eq!(tensor.units(), &[0, 1, 2, 10, 11, 12]);
}

#[test]
fn test_from_units() {
    let tensor = Tensor::from_units([2, 2], 1..).unwrap();
    assert_eq!(tensor.units(), &[1, 2, 3, 4]);

    assert_eq!(
        Tensor::from_units([2, 2], [1, 2, 3]).err(),
        Some(FromDataError::StorageTooShort)
    );

    let padded = Tensor::from_units_or_else([2, 3], [1, 2], || 0);
    assert_eq!(padded.units(), &[1, 2, 0, 0, 0, 0]);

    let truncated = Tensor::from_units_or_else([2], [1, 2, 3], || 0);
    assert_eq!(truncated.units(), &[1, 2]);
}

#[test]
fn test_from_data() {
    let tensor = Tensor::from_data([2, 2], vec![1, 2, 3, 4]).unwrap();
    assert_eq!(tensor.shape(), &[2, 2]);

    assert_eq!(
        Tensor::from_data([2, 2], vec![1, 2, 3]).err(),
        Some(FromDataError::StorageLengthMismatch)
    );
    assert_eq!(
        Tensor::from_data([2, 2], vec![1, 2, 3, 4, 5]).err(),
        Some(FromDataError::StorageLengthMismatch)
    );
}

#[test]
fn test_from_vec_and_array() {
    let tensor = Tensor::from([1, 2, 3]);
    assert_eq!(tensor.shape(), &[3]);
    assert_eq!(tensor, Tensor::from_vec(vec![1, 2, 3]));
    assert_eq!(Tensor::from(vec![4]).into_units(), vec![4]);
}

#[test]
fn test_element_of_increasing() {
    let tensor = Tensor::increasing_from([4, 3], 0);
    let row = tensor.element(1);
    assert_eq!(row.rank(), 1);
    assert_eq!(row.units(), &[3, 4, 5]);
    assert_eq!(row.indexing_depth(), 1);
    assert!(std::ptr::eq(row.base(), &tensor));
}

#[test]
fn test_increasing_from_full_unit_range() {
    let tensor = Tensor::<u8>::increasing_from([256], 0);
    assert_eq!(tensor.units()[255], u8::MAX);
    assert!(tensor.units().iter().zip(0..=255u8).all(|(&x, y)| x == y));

    let tensor = Tensor::<i8>::increasing_from([2, 2], 124);
    assert_eq!(tensor.units(), &[124, 125, 126, 127]);

    assert_eq!(Tensor::<u8>::increasing_from([0], u8::MAX).unit_count(), 0);
}

#[test]
fn test_at_partial_and_full_index() {
    let tensor = Tensor::increasing_from([2, 3, 4], 0);

    let sub = tensor.at([1, 2]);
    assert_eq!(sub.shape(), &[4]);
    assert_eq!(sub.units(), &[20, 21, 22, 23]);

    let unit = tensor.at(Index::from([1, 0, 3]));
    assert!(unit.is_scalar());
    assert_eq!(unit.item(), Some(&15));

    let whole = tensor.at([]);
    assert_eq!(whole, tensor);
}

#[test]
fn test_slice_halves() {
    let tensor = Tensor::increasing_from([4, 2], 0);
    let first_half = tensor.slice(..2);
    let second_half = tensor.slice(2..);
    assert_eq!(first_half.shape(), &[2, 2]);
    assert_eq!(first_half.units(), &[0, 1, 2, 3]);
    assert_eq!(second_half.units(), &[4, 5, 6, 7]);
    assert_eq!(second_half.element(1).units(), &[6, 7]);
}

#[test]
fn test_unit_accessors() {
    let mut tensor = Tensor::from([10, 20, 30]);
    assert_eq!(*tensor.unit(1), 20);
    assert_eq!(tensor.get_unit(3), None);

    tensor.set_unit(0, 11);
    tensor.increment_unit(1, 5);
    tensor.decrement_unit(2, 10);
    assert_eq!(tensor.units(), &[11, 25, 20]);

    tensor.multiply_unit(0, 2);
    tensor.divide_unit(1, 2);
    assert_eq!(tensor.units(), &[22, 12, 20]);

    let mut floats = Tensor::from([5.0f32, 0.3, 1.]);
    floats.divide_unit(0, 2.);
    floats.multiply_unit(1, 3.);
    floats.increment_unit(2, 0.1);
    expect_equal(&floats, &Tensor::from([2.5, 0.9, 1.1])).unwrap();
}

#[test]
#[should_panic(expected = "unit position 3 out of bounds for 3 units")]
fn test_unit_out_of_bounds() {
    let tensor = Tensor::from([1, 2, 3]);
    tensor.unit(3);
}

#[test]
fn test_mutation_through_view_is_shared() {
    let mut tensor = Tensor::<i32>::zeros([3, 2]);
    tensor.element_mut(1).set_unit(1, 9);
    assert_eq!(tensor.units(), &[0, 0, 0, 9, 0, 0]);

    // Overlapping views observe the same units.
    let row = tensor.element(1);
    let column = tensor.at([1, 1]);
    let rows = tensor.slice(1..);
    assert_eq!(row.units()[1], 9);
    assert_eq!(column.item(), Some(&9));
    assert_eq!(rows.units()[1], 9);

    tensor.at_mut([2, 0]).apply(|x| x + 4);
    assert_eq!(tensor.slice(2..).units(), &[4, 0]);
}

#[test]
fn test_assign() {
    let mut tensor = Tensor::<i32>::zeros([2, 3]);
    tensor.set_element(1, &Tensor::from([1, 2, 3]));
    assert_eq!(tensor.units(), &[0, 0, 0, 1, 2, 3]);

    tensor.set_at([0, 2], &Tensor::scalar(8));
    assert_eq!(tensor.units(), &[0, 0, 8, 1, 2, 3]);

    let source = Tensor::increasing_from([2, 3], 100);
    tensor.set_slice(.., &source.view());
    assert_eq!(tensor, source);

    let err = tensor.element_mut(0).try_assign(&Tensor::from([1, 2]));
    assert_eq!(
        err,
        Err(ShapeMismatch {
            expected: Shape::from([3]),
            actual: Shape::from([2]),
        })
    );
}

#[test]
#[should_panic(expected = "shape mismatch: expected [3], got [1, 3]")]
fn test_set_element_requires_exact_shape() {
    let mut tensor = Tensor::<i32>::zeros([2, 3]);
    tensor.set_element(0, &Tensor::<i32>::zeros([1, 3]));
}

#[test]
fn test_reshape() {
    let mut tensor = Tensor::increasing_from([2, 3], 0);

    let same = tensor.reshaped(tensor.shape().clone()).unwrap();
    assert_eq!(same, tensor);

    let reshaped = tensor.reshaped([3, 2]).unwrap();
    assert_eq!(reshaped.element(2).units(), &[4, 5]);
    assert_eq!(tensor.reshaped([4, 2]), None);

    tensor.reshape([6]).unwrap();
    assert_eq!(tensor.shape(), &[6]);
    assert_eq!(tensor.reshape([5]), Err(ReshapeError::LengthMismatch));
}

#[test]
fn test_append() {
    let mut tensor = Tensor::<i32>::with_capacity([3], 3);
    assert_eq!(tensor.shape(), &[0, 3]);

    assert_eq!(
        tensor.append(&Tensor::from([1, 2, 3])),
        Err(ExpandError::ShapeMismatch)
    );

    tensor
        .append(&Tensor::from_data([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap())
        .unwrap();
    tensor.push_element(&Tensor::from([7, 8, 9])).unwrap();
    assert_eq!(tensor.shape(), &[3, 3]);
    assert_eq!(tensor, Tensor::increasing_from([3, 3], 1));

    assert_eq!(
        tensor.push_element(&Tensor::from([1, 2])),
        Err(ExpandError::ShapeMismatch)
    );
    assert_eq!(
        Tensor::scalar(1).push_element(&Tensor::scalar(2)),
        Err(ExpandError::ScalarTensor)
    );
}

#[test]
fn test_replace_elements() {
    let mut tensor = Tensor::increasing_from([4, 2], 0);
    let replacement = Tensor::full([1, 2], -1);
    tensor.replace_elements(1..3, &replacement).unwrap();
    assert_eq!(tensor.shape(), &[3, 2]);
    assert_eq!(tensor.units(), &[0, 1, -1, -1, 6, 7]);

    let insertion = Tensor::full([2, 2], 9);
    tensor.replace_elements(3.., &insertion).unwrap();
    assert_eq!(tensor.element_count(), 5);
    assert_eq!(tensor.element(4).units(), &[9, 9]);

    assert_eq!(
        tensor.replace_elements(.., &Tensor::full([1, 3], 0)),
        Err(ExpandError::ShapeMismatch)
    );
}

#[test]
fn test_remove_element() {
    let mut tensor = Tensor::increasing_from([3, 2], 0);
    let removed = tensor.remove_element(1);
    assert_eq!(removed, Tensor::from([2, 3]));
    assert_eq!(tensor.shape(), &[2, 2]);
    assert_eq!(tensor.units(), &[0, 1, 4, 5]);
}

#[test]
fn test_concatenating() {
    let a = Tensor::full([1, 8], 1);
    let b = Tensor::full([1, 8], 2);
    let joined = a.concatenating(&b, 0).unwrap();
    assert_eq!(joined.shape(), &[2, 8]);
    assert_eq!(joined.element(1).units(), &[2; 8]);

    let lhs = Tensor::increasing_from([2, 2], 0);
    let rhs = Tensor::increasing_from([2, 1], 10);
    let joined = lhs.concatenating(&rhs, 1).unwrap();
    assert_eq!(joined.units(), &[0, 1, 10, 2, 3, 11]);

    let mismatched = Tensor::<i32>::zeros([2, 4]);
    assert_eq!(Tensor::<i32>::zeros([2, 3]).concatenating(&mismatched, 0), None);
}

#[test]
fn test_map_and_to_tensor() {
    let tensor = Tensor::increasing_from([2, 2], 1);
    let doubled = tensor.map(|x| *x as f32 * 2.);
    assert_eq!(doubled.units(), &[2., 4., 6., 8.]);

    let copy = tensor.element(1).to_tensor();
    assert_eq!(copy, Tensor::from([3, 4]));
}

#[test]
fn test_scoped_unit_access() {
    let mut tensor = Tensor::increasing_from([2, 3], 0);
    let sum: i32 = tensor.with_units(|units| units.iter().sum());
    assert_eq!(sum, 15);

    tensor.element_mut(1).with_units_mut(|units| units.reverse());
    assert_eq!(tensor.units(), &[0, 1, 2, 5, 4, 3]);
}

#[test]
fn test_equality_kinds() {
    let a = Tensor::increasing_from([1, 1, 4], 0);
    let b = Tensor::increasing_from([4], 0);
    let c = Tensor::increasing_from([1, 1, 4], 0);

    assert_ne!(a, b);
    assert!(!a.is_isomorphic_to(&b));
    assert!(a.is_similar_to(&b));
    assert!(a.eq_similar(&b));
    assert!(a.is_isomorphic_to(&c));
    assert_eq!(a, c);

    let d = Tensor::increasing_from([4], 1);
    assert!(!b.eq_similar(&d));
}

#[test]
fn test_indices() {
    let tensor = Tensor::<f32>::zeros([2, 2]);
    let indices: Vec<_> = tensor.indices().collect();
    assert_eq!(indices, [[0, 0], [0, 1], [1, 0], [1, 1]].map(Index::from));
}
