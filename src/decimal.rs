use crate::{Precision, Problem, Rounding};
use core::cmp::Ordering;
use num::bigint::Sign::{self, *};
use num::{BigInt, Integer, Signed};
use num::{One, Zero};
use std::sync::LazyLock;

pub(crate) mod convert;

/// Arbitrary precision decimal number
///
/// This type is functionally a [`BigInt`] mantissa together with a count of
/// decimal digits after the point (the scale). The value is exact, nothing is
/// ever rounded unless a method says so.
///
/// Equality and ordering are numeric, `0.50` equals `0.5`.
///
/// # Examples
///
/// Parsing a decimal
/// ```
/// use computable::Decimal;
/// let quarter: Decimal = "0.25".parse().unwrap();
/// assert_eq!(quarter.to_string(), "0.25");
/// ```
///
/// Scientific notation
/// ```
/// use computable::Decimal;
/// let small: Decimal = "1.5e-3".parse().unwrap();
/// assert_eq!(small.to_string(), "0.0015");
/// ```
///
/// Simple arithmetic is exact
/// ```
/// use computable::Decimal;
/// let a: Decimal = "0.1".parse().unwrap();
/// let b: Decimal = "0.2".parse().unwrap();
/// let c: Decimal = "0.3".parse().unwrap();
/// assert_eq!(a + b, c);
/// ```
#[derive(Clone, Debug)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

static TEN: LazyLock<BigInt> = LazyLock::new(|| BigInt::from(10));

// Exponents in parsed text beyond this would need absurd amounts of memory
const MAX_EXPONENT: i64 = 1_000_000;

fn ten_pow(n: u32) -> BigInt {
    TEN.pow(n)
}

// Integer division num / den, rounded to a whole number as requested
fn divide_rounded(num: BigInt, den: BigInt, rounding: Rounding) -> BigInt {
    let (num, den) = if den.is_negative() {
        (-num, -den)
    } else {
        (num, den)
    };
    let (q, r) = num.div_rem(&den);
    if r.is_zero() {
        return q;
    }

    // r carries the sign of num, the exact quotient lies strictly between q and q + away
    let away = if num.is_negative() {
        q.clone() - BigInt::one()
    } else {
        q.clone() + BigInt::one()
    };

    match rounding {
        Rounding::Down => q,
        Rounding::Floor => {
            if num.is_negative() {
                away
            } else {
                q
            }
        }
        Rounding::Ceiling => {
            if num.is_negative() {
                q
            } else {
                away
            }
        }
        Rounding::HalfUp | Rounding::HalfEven => {
            let twice: BigInt = r.abs() << 1;
            match twice.cmp(&den) {
                Ordering::Less => q,
                Ordering::Greater => away,
                Ordering::Equal => {
                    if rounding == Rounding::HalfUp || q.is_odd() {
                        away
                    } else {
                        q
                    }
                }
            }
        }
    }
}

impl Decimal {
    /// Zero, the additive identity
    pub fn zero() -> Self {
        Self {
            mantissa: BigInt::zero(),
            scale: 0,
        }
    }

    /// One, the multiplicative identity
    pub fn one() -> Self {
        Self {
            mantissa: BigInt::one(),
            scale: 0,
        }
    }

    /// The Decimal corresponding to the provided [`i64`]
    pub fn new(n: i64) -> Self {
        Self::from_bigint(BigInt::from(n))
    }

    /// The Decimal corresponding to the provided [`BigInt`]
    pub fn from_bigint(n: BigInt) -> Self {
        Self {
            mantissa: n,
            scale: 0,
        }
    }

    /// The value `mantissa * 10^-scale`
    ///
    /// # Example
    ///
    /// ```
    /// use computable::Decimal;
    /// let d = Decimal::from_parts(12345.into(), 3);
    /// assert_eq!(d.to_string(), "12.345");
    /// ```
    pub fn from_parts(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// The unscaled integer
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Number of digits after the decimal point
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// The [`Sign`] of this value
    pub fn sign(&self) -> Sign {
        self.mantissa.sign()
    }

    /// Is this Decimal exactly zero?
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            scale: self.scale,
        }
    }

    /// Same value with any trailing fractional zeros removed
    ///
    /// # Example
    ///
    /// ```
    /// use computable::Decimal;
    /// let d: Decimal = "2.500".parse().unwrap();
    /// assert_eq!(d.normalized().scale(), 1);
    /// ```
    pub fn normalized(&self) -> Self {
        if self.mantissa.is_zero() {
            return Self::zero();
        }
        let mut mantissa = self.mantissa.clone();
        let mut scale = self.scale;
        while scale > 0 {
            let (q, r) = mantissa.div_rem(&*TEN);
            if !r.is_zero() {
                break;
            }
            mantissa = q;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    // Exactly this value at a scale at least as large as the current one
    fn widened(&self, scale: u32) -> BigInt {
        debug_assert!(scale >= self.scale);
        &self.mantissa * ten_pow(scale - self.scale)
    }

    fn aligned(&self, other: &Self) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(other.scale);
        (self.widened(scale), other.widened(scale), scale)
    }

    /// The exact product, unless the combined scale would not fit a [`u32`]
    ///
    /// # Example
    ///
    /// ```
    /// use computable::{Decimal, Problem};
    /// let a = Decimal::from_parts(15.into(), 1);
    /// assert_eq!(a.checked_mul(&a).unwrap().to_string(), "2.25");
    /// let huge = Decimal::from_parts(1.into(), u32::MAX);
    /// assert_eq!(huge.checked_mul(&a), Err(Problem::OutOfRange));
    /// ```
    pub fn checked_mul(&self, other: &Self) -> Result<Self, Problem> {
        let scale = self
            .scale
            .checked_add(other.scale)
            .ok_or(Problem::OutOfRange)?;
        Ok(Self {
            mantissa: &self.mantissa * &other.mantissa,
            scale,
        })
    }

    /// This value with exactly `digits` digits after the point
    ///
    /// # Example
    ///
    /// ```
    /// use computable::{Decimal, Rounding};
    /// let d: Decimal = "2.345".parse().unwrap();
    /// assert_eq!(d.round(2, Rounding::HalfEven).to_string(), "2.34");
    /// assert_eq!(d.round(2, Rounding::HalfUp).to_string(), "2.35");
    /// assert_eq!(d.round(5, Rounding::Down).to_string(), "2.34500");
    /// ```
    pub fn round(&self, digits: Precision, rounding: Rounding) -> Self {
        if digits >= self.scale {
            return Self {
                mantissa: self.widened(digits),
                scale: digits,
            };
        }
        let divisor = ten_pow(self.scale - digits);
        Self {
            mantissa: divide_rounded(self.mantissa.clone(), divisor, rounding),
            scale: digits,
        }
    }

    /// The quotient `self / divisor` with exactly `digits` digits after the point
    ///
    /// # Example
    ///
    /// ```
    /// use computable::{Decimal, Rounding};
    /// let one = Decimal::one();
    /// let seven = Decimal::new(7);
    /// let q = one.div_rounded(&seven, 6, Rounding::HalfEven).unwrap();
    /// assert_eq!(q.to_string(), "0.142857");
    /// ```
    pub fn div_rounded(
        &self,
        divisor: &Self,
        digits: Precision,
        rounding: Rounding,
    ) -> Result<Self, Problem> {
        if divisor.is_zero() {
            return Err(Problem::DivisionByZero);
        }
        // (m1 / 10^s1) / (m2 / 10^s2) * 10^d == m1 * 10^(s2 + d) / (m2 * 10^s1)
        let shift = divisor
            .scale
            .checked_add(digits)
            .ok_or(Problem::OutOfRange)?;
        let numerator = &self.mantissa * ten_pow(shift);
        let denominator = &divisor.mantissa * ten_pow(self.scale);
        Ok(Self {
            mantissa: divide_rounded(numerator, denominator, rounding),
            scale: digits,
        })
    }
}

use core::fmt;

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = match f.precision() {
            Some(digits) => {
                let digits: Precision = digits.try_into().map_err(|_| fmt::Error)?;
                self.round(digits, Rounding::HalfEven)
            }
            None => self.clone(),
        };
        let digits = shown.mantissa.magnitude().to_string();
        let scale = shown.scale as usize;
        let text = if scale == 0 {
            digits
        } else if digits.len() > scale {
            let (whole, fraction) = digits.split_at(digits.len() - scale);
            format!("{whole}.{fraction}")
        } else {
            format!("0.{digits:0>scale$}")
        };
        f.pad_integral(shown.mantissa.sign() != Minus, "", &text)
    }
}

impl std::str::FromStr for Decimal {
    type Err = Problem;

    fn from_str(s: &str) -> Result<Self, Problem> {
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (s, exponent) = match s.split_once(['e', 'E']) {
            Some((s, e)) => {
                let e: i64 = e.parse().map_err(|_| Problem::BadDecimal)?;
                if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&e) {
                    return Err(Problem::OutOfRange);
                }
                (s, e)
            }
            None => (s, 0),
        };
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(Problem::BadDecimal);
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(Problem::BadDecimal);
        }

        let digits = format!("{whole}{fraction}");
        let mut mantissa =
            BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(Problem::BadDecimal)?;
        if negative {
            mantissa = -mantissa;
        }

        let fraction_len: i64 = fraction.len().try_into().map_err(|_| Problem::OutOfRange)?;
        let scale = fraction_len - exponent;
        if scale >= 0 {
            let scale: u32 = scale.try_into().map_err(|_| Problem::OutOfRange)?;
            Ok(Self { mantissa, scale })
        } else {
            let shift: u32 = (-scale).try_into().map_err(|_| Problem::OutOfRange)?;
            Ok(Self {
                mantissa: mantissa * ten_pow(shift),
                scale: 0,
            })
        }
    }
}

use core::ops::*;

impl Add for Decimal {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let (a, b, scale) = self.aligned(&other);
        Self {
            mantissa: a + b,
            scale,
        }
    }
}

impl Neg for Decimal {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            mantissa: -self.mantissa,
            ..self
        }
    }
}

impl Sub for Decimal {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + -other
    }
}

/// # Panics
///
/// If the combined scale does not fit, see [`Decimal::checked_mul`]
impl Mul for Decimal {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        match self.checked_mul(&other) {
            Ok(product) => product,
            Err(_) => panic!("scale overflow multiplying decimals"),
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        if self.scale == other.scale {
            return self.mantissa == other.mantissa;
        }
        let (a, b, _) = self.aligned(other);
        a == b
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let many: Decimal = "12345".parse().unwrap();
        assert_eq!(format!("{many}"), "12345");
        let small: Decimal = "0.00042".parse().unwrap();
        assert_eq!(format!("{small}"), "0.00042");
        let negative: Decimal = "-3.5".parse().unwrap();
        assert_eq!(format!("{negative}"), "-3.5");
        let tiny: Decimal = "-0.05".parse().unwrap();
        assert_eq!(format!("{tiny}"), "-0.05");
        assert_eq!(format!("{tiny:+}"), "-0.05");
        assert_eq!(format!("{:+}", Decimal::one()), "+1");
    }

    #[test]
    fn display_precision() {
        let third = Decimal::one()
            .div_rounded(&Decimal::new(3), 20, Rounding::HalfEven)
            .unwrap();
        assert_eq!(format!("{third:.4}"), "0.3333");
        let two = Decimal::new(2);
        assert_eq!(format!("{two:.3}"), "2.000");
    }

    #[test]
    fn parse() {
        let big: Decimal = "288230376151711743".parse().unwrap();
        let small: Decimal = "45".parse().unwrap();
        let expected: Decimal = "12970366926827028435".parse().unwrap();
        assert_eq!(big * small, expected);
    }

    #[test]
    fn parse_forms() {
        assert_eq!("+7".parse::<Decimal>().unwrap(), Decimal::new(7));
        assert_eq!(".5".parse::<Decimal>().unwrap(), "0.5".parse::<Decimal>().unwrap());
        assert_eq!("5.".parse::<Decimal>().unwrap(), Decimal::new(5));
        assert_eq!("2.5E2".parse::<Decimal>().unwrap(), Decimal::new(250));
        assert_eq!("-0".parse::<Decimal>().unwrap(), Decimal::zero());
        let d: Decimal = "125e-2".parse().unwrap();
        assert_eq!(d.to_string(), "1.25");
    }

    #[test]
    fn parse_failures() {
        assert_eq!("".parse::<Decimal>(), Err(Problem::BadDecimal));
        assert_eq!(".".parse::<Decimal>(), Err(Problem::BadDecimal));
        assert_eq!("1.2.3".parse::<Decimal>(), Err(Problem::BadDecimal));
        assert_eq!("12a".parse::<Decimal>(), Err(Problem::BadDecimal));
        assert_eq!("1_000".parse::<Decimal>(), Err(Problem::BadDecimal));
        assert_eq!("1e".parse::<Decimal>(), Err(Problem::BadDecimal));
        assert_eq!("--1".parse::<Decimal>(), Err(Problem::BadDecimal));
        assert_eq!("1e9999999".parse::<Decimal>(), Err(Problem::OutOfRange));
        assert_eq!(
            "1e-9223372036854775808".parse::<Decimal>(),
            Err(Problem::OutOfRange)
        );
        assert_eq!(
            "1e9223372036854775807".parse::<Decimal>(),
            Err(Problem::OutOfRange)
        );
    }

    #[test]
    fn decimals() {
        let a: Decimal = "0.4".parse().unwrap();
        let b: Decimal = "2.5".parse().unwrap();
        assert_eq!(a * b, Decimal::one());
    }

    #[test]
    fn signs() {
        let half: Decimal = "0.5".parse().unwrap();
        let minus_half = half - Decimal::one();
        assert_eq!(minus_half.sign(), Minus);
        assert_eq!(minus_half.abs().to_string(), "0.5");
        assert_eq!(-minus_half, "0.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn compare() {
        assert!(Decimal::one() > Decimal::zero());
        assert!(Decimal::new(5) > Decimal::new(4));
        assert!(Decimal::new(-10) < Decimal::new(5));
        let a: Decimal = "0.25".parse().unwrap();
        let b: Decimal = "0.3".parse().unwrap();
        assert!(a < b);
        let c: Decimal = "0.250".parse().unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn normalized() {
        let d: Decimal = "100.0100".parse().unwrap();
        let n = d.normalized();
        assert_eq!(n.scale(), 2);
        assert_eq!(n.to_string(), "100.01");
        assert_eq!(Decimal::from_parts(0.into(), 9).normalized().scale(), 0);
    }

    #[test]
    fn rounding_modes() {
        let plus: Decimal = "2.5".parse().unwrap();
        let minus: Decimal = "-2.5".parse().unwrap();
        let cases = [
            (Rounding::HalfEven, "2", "-2"),
            (Rounding::HalfUp, "3", "-3"),
            (Rounding::Down, "2", "-2"),
            (Rounding::Floor, "2", "-3"),
            (Rounding::Ceiling, "3", "-2"),
        ];
        for (rounding, up, down) in cases {
            assert_eq!(plus.round(0, rounding).to_string(), up, "{rounding:?}");
            assert_eq!(minus.round(0, rounding).to_string(), down, "{rounding:?}");
        }
        let odd: Decimal = "3.5".parse().unwrap();
        assert_eq!(odd.round(0, Rounding::HalfEven).to_string(), "4");
    }

    #[test]
    fn divide() {
        let two = Decimal::new(2);
        let three = Decimal::new(3);
        let q = two.div_rounded(&three, 5, Rounding::HalfEven).unwrap();
        assert_eq!(q.to_string(), "0.66667");
        let q = two.div_rounded(&-three, 5, Rounding::Down).unwrap();
        assert_eq!(q.to_string(), "-0.66666");
        let a: Decimal = "0.75".parse().unwrap();
        let b: Decimal = "0.025".parse().unwrap();
        let q = a.div_rounded(&b, 0, Rounding::Down).unwrap();
        assert_eq!(q, Decimal::new(30));
    }

    #[test]
    fn scale_overflow() {
        let wide = Decimal::from_parts(1.into(), 3_000_000_000);
        assert_eq!(wide.checked_mul(&wide), Err(Problem::OutOfRange));
        let narrow = Decimal::from_parts(7.into(), 2);
        assert_eq!(narrow.checked_mul(&narrow).unwrap().to_string(), "0.0049");
        let edge = Decimal::from_parts(1.into(), u32::MAX);
        let err = Decimal::one()
            .div_rounded(&edge, 1, Rounding::HalfEven)
            .unwrap_err();
        assert_eq!(err, Problem::OutOfRange);
    }

    #[test]
    #[should_panic(expected = "scale overflow")]
    fn mul_operator_overflow() {
        let wide = Decimal::from_parts(1.into(), 3_000_000_000);
        let _ = wide.clone() * wide;
    }

    #[test]
    fn divide_by_zero() {
        let err = Decimal::one()
            .div_rounded(&Decimal::zero(), 3, Rounding::HalfEven)
            .unwrap_err();
        assert_eq!(err, Problem::DivisionByZero);
    }
}
