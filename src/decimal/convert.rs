use crate::{Decimal, Problem};
use num::BigInt;

impl From<i64> for Decimal {
    fn from(n: i64) -> Decimal {
        Decimal::new(n)
    }
}

impl From<i32> for Decimal {
    fn from(n: i32) -> Decimal {
        Decimal::new(n.into())
    }
}

impl From<u64> for Decimal {
    fn from(n: u64) -> Decimal {
        Decimal::from_bigint(n.into())
    }
}

impl From<u32> for Decimal {
    fn from(n: u32) -> Decimal {
        Decimal::new(n.into())
    }
}

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Decimal {
        Decimal::from_bigint(n)
    }
}

// Rust prints floats as the shortest decimal text which reads back as the same
// float, so 0.1 becomes exactly 0.1 rather than its binary expansion
fn shortest(text: String, nan: bool, infinite: bool) -> Result<Decimal, Problem> {
    if nan {
        return Err(Problem::NotANumber);
    }
    if infinite {
        return Err(Problem::Infinity);
    }
    text.parse()
}

impl TryFrom<f32> for Decimal {
    type Error = Problem;

    fn try_from(n: f32) -> Result<Decimal, Self::Error> {
        shortest(n.to_string(), n.is_nan(), n.is_infinite())
    }
}

impl TryFrom<f64> for Decimal {
    type Error = Problem;

    fn try_from(n: f64) -> Result<Decimal, Self::Error> {
        shortest(n.to_string(), n.is_nan(), n.is_infinite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        let f: f32 = 0.0;
        let d: f64 = -0.0;
        let a: Decimal = f.try_into().unwrap();
        let b: Decimal = d.try_into().unwrap();
        assert_eq!(a, Decimal::zero());
        assert_eq!(b, Decimal::zero());
    }

    #[test]
    fn tenth_from_float() {
        let correct: Decimal = "0.1".parse().unwrap();
        let answer: Decimal = 0.1_f64.try_into().unwrap();
        assert_eq!(answer, correct);
        let answer: Decimal = 0.1_f32.try_into().unwrap();
        assert_eq!(answer, correct);
    }

    #[test]
    fn repr_f64() {
        let f: f64 = 1.23456789;
        let a: Decimal = f.try_into().unwrap();
        assert_eq!(a.to_string(), "1.23456789");
        let tiny: Decimal = 1e-7_f64.try_into().unwrap();
        assert_eq!(tiny.to_string(), "0.0000001");
        let huge: Decimal = 1e21_f64.try_into().unwrap();
        assert_eq!(huge, "1e21".parse::<Decimal>().unwrap());
    }

    #[test]
    fn special() {
        assert_eq!(Decimal::try_from(f64::NAN), Err(Problem::NotANumber));
        assert_eq!(Decimal::try_from(f64::INFINITY), Err(Problem::Infinity));
        assert_eq!(Decimal::try_from(f32::NEG_INFINITY), Err(Problem::Infinity));
    }

    #[test]
    fn integers() {
        assert_eq!(Decimal::from(-4_i32), Decimal::new(-4));
        assert_eq!(Decimal::from(u64::MAX).to_string(), "18446744073709551615");
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(Decimal::from(big).to_string(), "123456789012345678901234567890");
    }
}
