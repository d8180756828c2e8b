//! Capability traits for the atomic values ("units") stored in tensors.
//!
//! Any `Clone` type can be stored in a tensor. Unit-level arithmetic is gated
//! on the capabilities below, which are implemented for the primitive integer
//! and float types.

use std::ops::{Add, Mul, Sub};

/// Trait providing additive and multiplicative identities.
pub trait Identities {
    fn one() -> Self;
    fn zero() -> Self;
}

macro_rules! impl_float_identities {
    ($($type:ty),*) => {
        $(
            impl Identities for $type {
                fn one() -> Self {
                    1.
                }

                fn zero() -> Self {
                    0.
                }
            }
        )*
    };
}

macro_rules! impl_int_identities {
    ($($type:ty),*) => {
        $(
            impl Identities for $type {
                fn one() -> Self {
                    1
                }

                fn zero() -> Self {
                    0
                }
            }
        )*
    };
}

impl_float_identities!(f32, f64);
impl_int_identities!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Units which support addition, subtraction and multiplication.
///
/// This enables the increment, decrement and multiply unit accessors on
/// tensors and views.
pub trait NumericUnit:
    Copy + PartialEq + Identities + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
}

impl<T> NumericUnit for T where
    T: Copy
        + PartialEq
        + Identities
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
{
}

/// Units which support division.
///
/// Integer units divide with truncation towards zero and panic on a zero
/// divisor. Float units follow IEEE 754 division.
pub trait DivisionUnit: NumericUnit {
    /// True if division truncates (integer units).
    const TRUNCATES: bool;

    fn divide(self, rhs: Self) -> Self;
}

macro_rules! impl_int_division {
    ($($type:ty),*) => {
        $(
            impl DivisionUnit for $type {
                const TRUNCATES: bool = true;

                #[inline]
                fn divide(self, rhs: Self) -> Self {
                    self / rhs
                }
            }
        )*
    };
}

macro_rules! impl_float_division {
    ($($type:ty),*) => {
        $(
            impl DivisionUnit for $type {
                const TRUNCATES: bool = false;

                #[inline]
                fn divide(self, rhs: Self) -> Self {
                    self / rhs
                }
            }
        )*
    };
}

impl_int_division!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_float_division!(f32, f64);
