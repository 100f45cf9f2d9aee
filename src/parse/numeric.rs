//! Lenient numeric coercion shared by the row normalizers.
//!
//! Spreadsheet pastes carry values such as `59.50%`, `1,234` or a stray
//! trailing space. A field is read by its leading numeric prefix: leading
//! whitespace is skipped, the longest numeric prefix is parsed and whatever
//! follows it is ignored. Anything that yields no prefix, or a value outside
//! the non-negative domain, coerces to zero instead of failing.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Prefix patterns
// ---------------------------------------------------------------------------

/// Optional sign followed by decimal digits: `79`, `+12`, `-3`.
static INTEGER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("integer prefix regex must compile"));

/// Decimal with optional fraction and exponent: `59.50`, `.5`, `7.`, `1e3`.
static FLOAT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("float prefix regex must compile")
});

// ---------------------------------------------------------------------------
// Lenient number types
// ---------------------------------------------------------------------------

/// A numeric type that can be read from a spreadsheet cell by prefix.
pub trait LenientNumber: FromStr + Default + Copy {
    /// Pattern matching the longest acceptable prefix for this type.
    fn prefix_pattern() -> &'static Regex;

    /// Whether a successfully parsed value is inside the accepted domain.
    fn in_domain(&self) -> bool;
}

impl LenientNumber for u64 {
    fn prefix_pattern() -> &'static Regex {
        &INTEGER_PREFIX_RE
    }

    fn in_domain(&self) -> bool {
        true
    }
}

impl LenientNumber for f64 {
    fn prefix_pattern() -> &'static Regex {
        &FLOAT_PREFIX_RE
    }

    fn in_domain(&self) -> bool {
        self.is_finite() && *self >= 0.0
    }
}

/// Parse a tab field by its leading numeric prefix, defaulting to zero.
///
/// `None` stands for a field missing from a short row. Negative integers
/// fail to parse as `u64` and therefore also land on zero.
pub fn parse_numeric_or_default<T: LenientNumber>(field: Option<&str>) -> T {
    let Some(text) = field else {
        return T::default();
    };

    let Some(prefix) = T::prefix_pattern().find(text.trim_start()) else {
        return T::default();
    };

    match prefix.as_str().parse::<T>() {
        Ok(value) if value.in_domain() => value,
        _ => T::default(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn int(field: &str) -> u64 {
        parse_numeric_or_default(Some(field))
    }

    fn float(field: &str) -> f64 {
        parse_numeric_or_default(Some(field))
    }

    #[test]
    fn integer_plain_and_signed() {
        assert_eq!(int("79"), 79);
        assert_eq!(int("+12"), 12);
        assert_eq!(int("  266"), 266);
    }

    #[test]
    fn integer_ignores_trailing_text() {
        assert_eq!(int("79 searches"), 79);
        assert_eq!(int("1,234"), 1);
        assert_eq!(int("12.9"), 12);
    }

    #[test]
    fn integer_failures_become_zero() {
        assert_eq!(int("abc"), 0);
        assert_eq!(int(""), 0);
        assert_eq!(int("-5"), 0);
        assert_eq!(int("99999999999999999999999"), 0);
        assert_eq!(parse_numeric_or_default::<u64>(None), 0);
    }

    #[test]
    fn float_reads_percent_prefix() {
        assert!((float("59.50%") - 59.5).abs() < f64::EPSILON);
        assert!((float("58%") - 58.0).abs() < f64::EPSILON);
        assert!((float(" 36.80%") - 36.8).abs() < f64::EPSILON);
    }

    #[test]
    fn float_accepts_partial_forms() {
        assert!((float(".5") - 0.5).abs() < f64::EPSILON);
        assert!((float("7.") - 7.0).abs() < f64::EPSILON);
        assert!((float("1e3") - 1000.0).abs() < f64::EPSILON);
        assert!((float("2e") - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn float_failures_become_zero() {
        assert_eq!(float("n/a"), 0.0);
        assert_eq!(float("%"), 0.0);
        assert_eq!(float("-3.5"), 0.0);
        assert_eq!(float("1e999"), 0.0);
        assert_eq!(parse_numeric_or_default::<f64>(None), 0.0);
    }
}
