// We need to refer to these types in the documentation
#[allow(unused_imports)]
use crate::{Decimal, Graph};

/// Problems when materializing a computable number from a [`Graph`]
/// also can occur when trying to make or convert to a [`Decimal`]

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Problem {
    /// A divisor's approximation was exactly zero at the evaluation precision
    DivisionByZero,
    /// When parsing a decimal there were non-digits, a misplaced point or a bad exponent
    BadDecimal,
    /// Tried to convert a floating point NaN, which has no equivalent
    NotANumber,
    /// Tried to convert a floating point Infinity which has no equivalent
    Infinity,
    /// A decimal exponent or scale was outside the range this crate can represent
    OutOfRange,
}

use std::fmt;

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for Problem {}
