//! Integer vs float classification for JSON numbers

use serde::{Serialize, Serializer};
use serde_json::Number;

/// How a number is re-emitted
///
/// Integers are kept only when the decoded value fits in an `i64`. Anything
/// else, including literals with a fraction or exponent and integers beyond
/// the `i64` range, is written from its decoded double.
///
/// The parser decodes `-0` as a negative-zero double; it is classified as
/// `Integer(0)`. A `-0.0` literal decodes to the same double and collapses to
/// `0` as well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberRepr {
    /// Exact 64-bit signed integer
    Integer(i64),
    /// Double-precision float
    Float(f64),
}

impl NumberRepr {
    /// Classify a parsed number
    pub fn classify(number: &Number) -> Self {
        if let Some(int) = number.as_i64() {
            return NumberRepr::Integer(int);
        }
        if let Some(unsigned) = number.as_u64() {
            return NumberRepr::Float(unsigned as f64);
        }
        match number.as_f64().unwrap_or_default() {
            zero if zero == 0.0 && zero.is_sign_negative() => NumberRepr::Integer(0),
            float => NumberRepr::Float(float),
        }
    }

    /// Convert back into a `serde_json::Number`
    ///
    /// Returns `None` for non-finite floats, which JSON cannot represent.
    pub fn to_number(self) -> Option<Number> {
        match self {
            NumberRepr::Integer(int) => Some(Number::from(int)),
            NumberRepr::Float(float) => Number::from_f64(float),
        }
    }

    /// True for the integer form
    pub fn is_integer(&self) -> bool {
        matches!(self, NumberRepr::Integer(_))
    }
}

impl Serialize for NumberRepr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            NumberRepr::Integer(int) => serializer.serialize_i64(int),
            NumberRepr::Float(float) => serializer.serialize_f64(float),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse_number(text: &str) -> Number {
        match serde_json::from_str::<Value>(text).unwrap() {
            Value::Number(n) => n,
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn integers_stay_integers() {
        assert_eq!(NumberRepr::classify(&parse_number("42")), NumberRepr::Integer(42));
        assert_eq!(NumberRepr::classify(&parse_number("-7")), NumberRepr::Integer(-7));
        assert_eq!(
            NumberRepr::classify(&parse_number("9223372036854775807")),
            NumberRepr::Integer(i64::MAX)
        );
    }

    #[test]
    fn negative_zero_is_an_integer() {
        let negative_zero = NumberRepr::classify(&parse_number("-0"));
        assert_eq!(negative_zero, NumberRepr::Integer(0));
        assert_eq!(serde_json::to_string(&negative_zero).unwrap(), "0");
        assert_eq!(NumberRepr::classify(&parse_number("0")), NumberRepr::Integer(0));
        assert_eq!(NumberRepr::classify(&parse_number("0.0")), NumberRepr::Float(0.0));
    }

    #[test]
    fn fractional_and_exponent_literals_are_floats() {
        assert_eq!(NumberRepr::classify(&parse_number("2.5")), NumberRepr::Float(2.5));
        assert_eq!(NumberRepr::classify(&parse_number("1.0")), NumberRepr::Float(1.0));
        assert_eq!(NumberRepr::classify(&parse_number("1e10")), NumberRepr::Float(1e10));
    }

    #[test]
    fn integers_beyond_i64_fall_back_to_float() {
        let repr = NumberRepr::classify(&parse_number("18446744073709551615"));
        assert_eq!(repr, NumberRepr::Float(18446744073709551615u64 as f64));
        assert!(!repr.is_integer());
    }

    #[test]
    fn serializes_in_its_own_class() {
        assert_eq!(serde_json::to_string(&NumberRepr::Integer(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&NumberRepr::Float(1.0)).unwrap(), "1.0");
    }

    #[test]
    fn to_number_rejects_non_finite() {
        assert!(NumberRepr::Float(f64::NAN).to_number().is_none());
        assert_eq!(NumberRepr::Integer(3).to_number(), Some(Number::from(3)));
    }
}
