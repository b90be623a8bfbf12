//! Width-independent numeric values for assertions.

use std::fmt;

/// Optional integer widened to `i128`.
///
/// Identifiers arrive as `i64`, counts as `i32` and status codes as `u16`.
/// Widening all of them means a comparison never fails because of the
/// integer type each side happened to be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numeric(Option<i128>);

impl Numeric {
    /// Widened value, or `None` when the number was absent.
    #[must_use]
    pub const fn value(self) -> Option<i128> {
        self.0
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str(super::ABSENT),
        }
    }
}

macro_rules! widen_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Numeric {
                fn from(value: $ty) -> Self {
                    Self(Some(i128::from(value)))
                }
            }

            impl From<Option<$ty>> for Numeric {
                fn from(value: Option<$ty>) -> Self {
                    Self(value.map(i128::from))
                }
            }
        )*
    };
}

widen_from!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<usize> for Numeric {
    fn from(value: usize) -> Self {
        Self(i128::try_from(value).ok())
    }
}
