//! Typed assertion helpers that also record evidence.
//!
//! Every check forwards its label, expected value and actual value to the
//! configured [`EvidenceSink`] before deciding the outcome, so reports carry
//! the comparison whether or not it passed. A mismatch returns
//! [`HarnessError::Assertion`]; a match returns `Ok(())` silently.
//!
//! ```rust
//! use petstore_bdd::evidence::MemorySink;
//! use petstore_bdd::verify::Verifier;
//!
//! let sink = MemorySink::default();
//! let verify = Verifier::new(&sink);
//! // A 32-bit count and a 64-bit identifier compare by value.
//! verify.number_equals("Pet ID", 12_i32, 12_i64).expect("same value");
//! assert!(verify.string_equals("Pet Name", "Rex", "Max").is_err());
//! assert_eq!(sink.entries().len(), 2);
//! ```

mod numeric;

pub use numeric::Numeric;

use crate::error::{AssertionFailure, HarnessError, Result};
use crate::evidence::EvidenceSink;
use regex::Regex;
use std::fmt::Debug;

/// Rendering used for values the service omitted.
pub const ABSENT: &str = "<absent>";

/// Assertion front-end bound to one evidence sink.
#[derive(Clone, Copy)]
pub struct Verifier<'a> {
    sink: &'a dyn EvidenceSink,
}

impl<'a> Verifier<'a> {
    /// Bind assertions to `sink`.
    #[must_use]
    pub const fn new(sink: &'a dyn EvidenceSink) -> Self {
        Self { sink }
    }

    /// Record the comparison, then fail unless `passed`.
    fn conclude(self, label: &str, expected: String, actual: String, passed: bool) -> Result<()> {
        self.sink.compare(label, &expected, &actual);
        if passed {
            Ok(())
        } else {
            tracing::debug!(label, %expected, %actual, "assertion failed");
            Err(HarnessError::Assertion(AssertionFailure {
                label: label.to_owned(),
                expected,
                actual,
            }))
        }
    }

    /// Check two optional strings for equality.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when the values differ.
    pub fn string_equals<'s>(
        self,
        label: &str,
        actual: impl Into<Option<&'s str>>,
        expected: impl Into<Option<&'s str>>,
    ) -> Result<()> {
        let actual_value = actual.into();
        let expected_value = expected.into();
        self.conclude(
            label,
            render_str(expected_value),
            render_str(actual_value),
            actual_value == expected_value,
        )
    }

    /// Check two numbers for equality regardless of their integer width.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when the values differ.
    pub fn number_equals(
        self,
        label: &str,
        actual: impl Into<Numeric>,
        expected: impl Into<Numeric>,
    ) -> Result<()> {
        let actual_value = actual.into();
        let expected_value = expected.into();
        self.conclude(
            label,
            expected_value.to_string(),
            actual_value.to_string(),
            actual_value == expected_value,
        )
    }

    /// Check that a number differs from a value the scenario expects to avoid.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when the values are equal.
    pub fn number_differs(
        self,
        label: &str,
        actual: impl Into<Numeric>,
        unexpected: impl Into<Numeric>,
    ) -> Result<()> {
        let actual_value = actual.into();
        let unexpected_value = unexpected.into();
        self.conclude(
            label,
            format!("not {unexpected_value}"),
            actual_value.to_string(),
            actual_value != unexpected_value,
        )
    }

    /// Check that a present number exceeds `bound`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when the value is absent or not
    /// greater than `bound`.
    pub fn number_greater_than(
        self,
        label: &str,
        actual: impl Into<Numeric>,
        bound: impl Into<Numeric>,
    ) -> Result<()> {
        let actual_value = actual.into();
        let bound_value = bound.into();
        let passed = matches!(
            (actual_value.value(), bound_value.value()),
            (Some(a), Some(b)) if a > b
        );
        self.conclude(
            label,
            format!("greater than {bound_value}"),
            actual_value.to_string(),
            passed,
        )
    }

    /// Check an HTTP status code.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when the codes differ.
    pub fn status_code(self, actual: u16, expected: u16) -> Result<()> {
        self.number_equals("Status code", actual, expected)
    }

    /// Check two optional booleans for equality.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when the values differ.
    pub fn bool_equals(
        self,
        label: &str,
        actual: impl Into<Option<bool>>,
        expected: impl Into<Option<bool>>,
    ) -> Result<()> {
        let actual_value = actual.into();
        let expected_value = expected.into();
        self.conclude(
            label,
            render_debug(expected_value),
            render_debug(actual_value),
            actual_value == expected_value,
        )
    }

    /// Check two values of any comparable type for equality.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when the values differ.
    pub fn object_equals<T>(self, label: &str, actual: &T, expected: &T) -> Result<()>
    where
        T: PartialEq + Debug + ?Sized,
    {
        self.conclude(
            label,
            format!("{expected:?}"),
            format!("{actual:?}"),
            actual == expected,
        )
    }

    /// Check that `actual` contains `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when no element equals `expected`.
    pub fn collection_contains<T>(self, label: &str, actual: &[T], expected: &T) -> Result<()>
    where
        T: PartialEq + Debug,
    {
        self.conclude(
            label,
            format!("contains {expected:?}"),
            format!("{actual:?}"),
            actual.contains(expected),
        )
    }

    /// Check that a present string contains `part`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when the value is absent or does
    /// not contain `part`.
    pub fn string_contains<'s>(
        self,
        label: &str,
        actual: impl Into<Option<&'s str>>,
        part: &str,
    ) -> Result<()> {
        let actual_value = actual.into();
        self.conclude(
            label,
            format!("contains '{part}'"),
            render_str(actual_value),
            actual_value.is_some_and(|text| text.contains(part)),
        )
    }

    /// Check that `actual` contains at least one of `parts`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Assertion`] when none of the parts occur.
    pub fn contains_any(self, label: &str, actual: &str, parts: &[&str]) -> Result<()> {
        let haystack = actual.to_lowercase();
        let passed = parts
            .iter()
            .any(|part| haystack.contains(&part.to_lowercase()));
        self.conclude(
            label,
            format!("contains any of {parts:?}"),
            actual.to_owned(),
            passed,
        )
    }

    /// Check that a present string matches `pattern` in its entirety.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidPattern`] when `pattern` is not a valid
    /// regular expression, or [`HarnessError::Assertion`] when the value is
    /// absent or does not match.
    pub fn string_matches<'s>(
        self,
        label: &str,
        actual: impl Into<Option<&'s str>>,
        pattern: &str,
    ) -> Result<()> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|err| {
            HarnessError::InvalidPattern {
                pattern: pattern.to_owned(),
                source: Box::new(err),
            }
        })?;
        let actual_value = actual.into();
        self.conclude(
            label,
            format!("matches /{pattern}/"),
            render_str(actual_value),
            actual_value.is_some_and(|text| regex.is_match(text)),
        )
    }
}

fn render_str(value: Option<&str>) -> String {
    value.map_or_else(|| ABSENT.to_owned(), str::to_owned)
}

fn render_debug<T: Debug>(value: Option<T>) -> String {
    value.map_or_else(|| ABSENT.to_owned(), |inner| format!("{inner:?}"))
}
