//! Table-driven testing helpers shared by the corten crates.

use std::fmt::Debug;
use std::panic::{catch_unwind, RefUnwindSafe, UnwindSafe};

/// Run a test function over a table of cases.
///
/// Each case is run in isolation: a panic in one case is caught and recorded,
/// and the remaining cases still run. Once every case has been evaluated the
/// call returns if all of them passed, or panics with the number of failures
/// and the debug representation of each failing case.
///
/// By convention the case type is a local struct named `Case` and the table
/// is an array named `cases`:
///
/// ```
/// use corten_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     dims: Vec<usize>,
///     len: usize,
/// }
///
/// let cases = [
///     Case { dims: vec![2, 3], len: 6 },
///     Case { dims: vec![], len: 1 },
/// ];
///
/// cases.test_each(|case| {
///     assert_eq!(case.dims.iter().product::<usize>(), case.len);
/// });
/// ```
///
/// Cases and any values captured by the test closure must be unwind safe.
/// Values that are not (eg. because they use interior mutability) can either
/// be constructed inside the closure or wrapped in
/// [`AssertUnwindSafe`](std::panic::AssertUnwindSafe).
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Call `test` with a reference to each case.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Call `test` with a clone of each case.
    ///
    /// Useful when the test needs to consume the case and cloning is cheap.
    fn test_each_clone(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + Clone + UnwindSafe;

    /// Call `test` with each case by value.
    ///
    /// The debug representation of each case is captured before the test
    /// runs, so that it can be reported if the test panics.
    fn test_each_value(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe;
}

/// Panic with a summary of `failures` if it is non-empty.
fn report_failures<F: Debug>(failures: &[F]) {
    assert!(
        failures.is_empty(),
        "{} test cases failed: {:?}",
        failures.len(),
        failures
    );
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let failures: Vec<I::Item> = self
            .into_iter()
            .filter(|case| catch_unwind(|| test(case)).is_err())
            .collect();
        report_failures(&failures);
    }

    fn test_each_clone(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Clone + Debug + UnwindSafe,
    {
        let failures: Vec<I::Item> = self
            .into_iter()
            .filter(|case| {
                let value = case.clone();
                let test = &test;
                catch_unwind(move || test(value)).is_err()
            })
            .collect();
        report_failures(&failures);
    }

    fn test_each_value(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe,
    {
        let mut failures = Vec::new();
        for case in self {
            let description = format!("{:?}", case);
            let test = &test;
            if catch_unwind(move || test(case)).is_err() {
                failures.push(description);
            }
        }
        report_failures(&failures);
    }
}

#[cfg(test)]
mod tests {
    use super::TestCases;

    #[derive(Clone, Debug)]
    struct Case {
        rank: usize,
    }

    #[test]
    fn test_all_cases_pass() {
        let cases = [Case { rank: 1 }, Case { rank: 2 }];
        cases.clone().test_each(|case| assert!(case.rank > 0));
        cases.clone().test_each_clone(|case| assert!(case.rank > 0));
        cases.test_each_value(|case| assert!(case.rank > 0));
    }

    #[test]
    #[should_panic(expected = "1 test cases failed")]
    fn test_each_reports_failures() {
        let cases = [Case { rank: 0 }, Case { rank: 2 }];
        cases.test_each(|case| assert!(case.rank > 0));
    }

    #[test]
    #[should_panic(expected = "2 test cases failed")]
    fn test_each_clone_reports_failures() {
        let cases = [Case { rank: 0 }, Case { rank: 3 }];
        cases.test_each_clone(|case| assert_eq!(case.rank, 1));
    }

    #[test]
    #[should_panic(expected = "test cases failed: [\"Case { rank: 4 }\"]")]
    fn test_each_value_reports_case_description() {
        let cases = [Case { rank: 4 }];
        cases.test_each_value(|case| assert!(case.rank < 4));
    }
}
