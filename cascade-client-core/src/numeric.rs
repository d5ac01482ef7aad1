//! Cross-representation numeric comparison.
//!
//! All numeric variants (`Int32`, `Int64`, `Double`, `Decimal128`) share
//! one number line. Two widening paths: whenever a `Decimal128` operand
//! is involved both sides widen to an arbitrary-precision decimal, so
//! exact comparison never loses digits through a floating intermediate;
//! otherwise both sides widen to `f64`, keeping the common int/double
//! case cheap. Both paths apply the same special rules: NaN sorts below
//! every other number including negative infinity, all NaNs are equal,
//! and the two float zeros are one value.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;

use crate::value::Value;

/// Compares two numeric values on the combined number line.
///
/// Returns `None` when either operand is not numeric; callers are
/// expected to have matched type ranks before calling.
pub fn compare_numeric(a: &Value, b: &Value) -> Option<Ordering> {
    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }
    let ord = if matches!(a, Value::Decimal128(_)) || matches!(b, Value::Decimal128(_)) {
        widen_decimal(a).cmp(&widen_decimal(b))
    } else {
        cmp_doubles(widen_double(a), widen_double(b))
    };
    Some(ord)
}

/// Total order on doubles: NaN lowest, all NaNs equal, +0 == -0.
///
/// Every float comparison in the crate goes through here: the numeric
/// double path, `GeoPoint` components, and `Vector` elements.
pub(crate) fn cmp_doubles(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Parsed form of a `Decimal128` literal. Derived `Ord` gives the
/// NaN-lowest, infinity-bracketed order directly.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ParsedDecimal {
    Nan,
    NegInfinity,
    Finite(BigDecimal),
    PosInfinity,
}

impl ParsedDecimal {
    /// Parses a decimal literal. `NaN`, `Infinity`/`Inf` (optionally
    /// signed), and anything `BigDecimal` accepts are recognized.
    /// Unparseable input reads as NaN so the comparator stays total over
    /// user-constructed values.
    pub(crate) fn parse(literal: &str) -> ParsedDecimal {
        let trimmed = literal.trim();
        let (negative, magnitude) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if magnitude.eq_ignore_ascii_case("nan") {
            return ParsedDecimal::Nan;
        }
        if magnitude.eq_ignore_ascii_case("infinity") || magnitude.eq_ignore_ascii_case("inf") {
            return if negative {
                ParsedDecimal::NegInfinity
            } else {
                ParsedDecimal::PosInfinity
            };
        }
        match trimmed.parse::<BigDecimal>() {
            Ok(decimal) => ParsedDecimal::Finite(decimal),
            Err(_) => ParsedDecimal::Nan,
        }
    }

    /// Widens a double through its shortest round-trip decimal form:
    /// `Double(1.1)` must land on the same decimal as the literal
    /// `"1.1"`, not on the full binary expansion of the nearest f64.
    pub(crate) fn from_double(value: f64) -> ParsedDecimal {
        if value.is_nan() {
            return ParsedDecimal::Nan;
        }
        if value == f64::INFINITY {
            return ParsedDecimal::PosInfinity;
        }
        if value == f64::NEG_INFINITY {
            return ParsedDecimal::NegInfinity;
        }
        match format!("{value}").parse::<BigDecimal>() {
            Ok(decimal) => ParsedDecimal::Finite(decimal),
            Err(_) => ParsedDecimal::Nan,
        }
    }
}

fn widen_decimal(value: &Value) -> ParsedDecimal {
    match value {
        Value::Int32(i) => ParsedDecimal::Finite(BigDecimal::from(*i)),
        Value::Int64(i) => ParsedDecimal::Finite(BigDecimal::from(*i)),
        Value::Double(d) => ParsedDecimal::from_double(*d),
        Value::Decimal128(d) => ParsedDecimal::parse(d.as_str()),
        other => {
            debug_assert!(false, "non-numeric operand in decimal widening: {other:?}");
            ParsedDecimal::Nan
        }
    }
}

fn widen_double(value: &Value) -> f64 {
    match value {
        Value::Int32(i) => f64::from(*i),
        Value::Int64(i) => *i as f64,
        Value::Double(d) => *d,
        other => {
            debug_assert!(false, "non-numeric operand in double widening: {other:?}");
            f64::NAN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Decimal128;

    fn dec(literal: &str) -> Value {
        Value::Decimal128(Decimal128::new(literal))
    }

    #[test]
    fn test_nan_sorts_below_everything() {
        assert_eq!(
            compare_numeric(&Value::Double(f64::NAN), &Value::Double(f64::NEG_INFINITY)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_numeric(&Value::Double(f64::NAN), &Value::Int64(i64::MIN)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_numeric(&Value::Double(f64::NAN), &Value::Double(f64::NAN)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_zeros_are_one_value() {
        assert_eq!(
            compare_numeric(&Value::Double(0.0), &Value::Double(-0.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            compare_numeric(&Value::Int64(0), &Value::Double(-0.0)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_cross_width_on_one_line() {
        assert_eq!(
            compare_numeric(&Value::Int32(2), &Value::Double(1.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_numeric(&Value::Int64(1), &Value::Double(1.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            compare_numeric(&Value::Int32(-3), &Value::Int64(7)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_decimal_widening_is_exact() {
        assert_eq!(
            compare_numeric(&dec("1.10"), &Value::Double(1.1)),
            Some(Ordering::Equal)
        );
        // One above 2^53: indistinguishable as f64, distinct as decimals.
        assert_eq!(
            compare_numeric(&dec("9007199254740993"), &Value::Int64(9007199254740992)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_numeric(&dec("0.1"), &dec("0.1000")),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_decimal_specials() {
        assert_eq!(
            compare_numeric(&dec("NaN"), &Value::Int64(5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_numeric(&dec("-Infinity"), &dec("-999e30")),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_numeric(&dec("Infinity"), &Value::Double(f64::MAX)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_numeric(&dec("NaN"), &Value::Double(f64::NAN)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_decimal_exponent_forms() {
        assert_eq!(compare_numeric(&dec("1e3"), &Value::Int64(1000)), Some(Ordering::Equal));
        assert_eq!(compare_numeric(&dec("2.5E+2"), &Value::Int64(251)), Some(Ordering::Less));
    }

    #[test]
    fn test_unparseable_decimal_reads_as_nan() {
        assert_eq!(
            compare_numeric(&dec("not a number"), &Value::Double(f64::NAN)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            compare_numeric(&dec("garbage"), &Value::Int64(0)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_non_numeric_operand() {
        assert_eq!(compare_numeric(&Value::Null, &Value::Int64(1)), None);
        assert_eq!(compare_numeric(&Value::Int64(1), &Value::Bool(true)), None);
    }

    #[test]
    fn test_int_pairs_follow_double_widening() {
        // Non-decimal operands widen to f64 by contract, so two i64
        // values one apart above 2^53 land on the same double.
        assert_eq!(
            compare_numeric(&Value::Int64(9007199254740993), &Value::Int64(9007199254740992)),
            Some(Ordering::Equal)
        );
    }
}
