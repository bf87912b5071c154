//! Grouped number rendering and parsing of comma-decimal input.

use std::sync::LazyLock;

use num_traits::ToPrimitive;

use crate::membership::parse_script_number;
use crate::pattern::{Pattern, PatternError};
use crate::{Error, Result};

/// Precision is clamped to this many fraction digits.
pub const MAX_DECIMALS: usize = 100;

// 2^53: above this, scaling by a power of ten no longer keeps the fraction.
const MAX_EXACT_SCALED: f64 = 9_007_199_254_740_992.0;

static PLAIN_DECIMAL: LazyLock<std::result::Result<Pattern, PatternError>> =
    LazyLock::new(|| Pattern::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    decimals: usize,
    decimal_separator: String,
    thousands_separator: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimals: 0,
            decimal_separator: ".".to_string(),
            thousands_separator: ",".to_string(),
        }
    }
}

impl NumberFormat {
    /// Negative, non-finite or non-numeric `decimals` mean zero; fractional
    /// values are truncated.
    pub fn new<D: ToPrimitive>(decimals: D) -> Self {
        Self {
            decimals: normalize_decimals(decimals),
            ..Self::default()
        }
    }

    pub fn decimal_separator(mut self, separator: &str) -> Self {
        self.decimal_separator = separator.to_string();
        self
    }

    pub fn thousands_separator(mut self, separator: &str) -> Self {
        self.thousands_separator = separator.to_string();
        self
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    /// Non-finite or non-numeric values render as zero.
    pub fn format<N: ToPrimitive>(&self, value: N) -> String {
        let n = value
            .to_f64()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        let (integer, fraction) = fixed_digits(n.abs(), self.decimals);
        let rounds_to_zero =
            integer.bytes().all(|b| b == b'0') && fraction.bytes().all(|b| b == b'0');

        let mut out = String::with_capacity(integer.len() + fraction.len() + 8);
        if n < 0.0 && !rounds_to_zero {
            out.push('-');
        }
        out.push_str(&group_thousands(&integer, &self.thousands_separator));
        if self.decimals > 0 {
            out.push_str(&self.decimal_separator);
            out.push_str(&fraction);
        }
        out
    }

    /// Formats text holding a number; anything non-numeric renders as zero.
    pub fn format_str(&self, text: &str) -> String {
        self.format(parse_script_number(text))
    }
}

fn normalize_decimals<D: ToPrimitive>(decimals: D) -> usize {
    match decimals.to_f64() {
        Some(d) if d.is_finite() && d > 0.0 => (d.trunc() as usize).min(MAX_DECIMALS),
        _ => 0,
    }
}

/// Integer digits and exactly `decimals` fraction digits of `abs`, rounded
/// half away from zero.
fn fixed_digits(abs: f64, decimals: usize) -> (String, String) {
    let rendered = match scaled_round(abs, decimals) {
        Some(rounded) => format!("{rounded}"),
        None => format!("{abs:.decimals$}"),
    };
    let (integer, fraction) = rendered
        .split_once('.')
        .unwrap_or((rendered.as_str(), ""));
    let mut fraction = fraction.to_string();
    fraction.truncate(decimals);
    while fraction.len() < decimals {
        fraction.push('0');
    }
    (integer.to_string(), fraction)
}

fn scaled_round(abs: f64, decimals: usize) -> Option<f64> {
    let exponent = i32::try_from(decimals).ok()?;
    let k = 10f64.powi(exponent);
    let scaled = abs * k;
    if !k.is_finite() || !scaled.is_finite() || scaled >= MAX_EXACT_SCALED {
        return None;
    }
    Some(scaled.round() / k)
}

fn group_thousands(digits: &str, separator: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let lead = match digits.len() % 3 {
        0 => 3,
        rest => rest,
    };
    let mut out = String::with_capacity(digits.len() + separator.len() * (digits.len() / 3));
    out.push_str(&digits[..lead]);
    for group in digits.as_bytes()[lead..].chunks(3) {
        out.push_str(separator);
        out.extend(group.iter().map(|b| char::from(*b)));
    }
    out
}

/// `number_format(value, decimals, decimal_separator, thousands_separator)`.
pub fn number_format<N: ToPrimitive, D: ToPrimitive>(
    value: N,
    decimals: D,
    decimal_separator: &str,
    thousands_separator: &str,
) -> String {
    NumberFormat::new(decimals)
        .decimal_separator(decimal_separator)
        .thousands_separator(thousands_separator)
        .format(value)
}

/// Formats with `.` as decimal and `,` as thousands separator.
pub fn format_number<N: ToPrimitive, D: ToPrimitive>(value: N, decimals: D) -> String {
    NumberFormat::new(decimals).format(value)
}

pub fn number_format_str<D: ToPrimitive>(
    text: &str,
    decimals: D,
    decimal_separator: &str,
    thousands_separator: &str,
) -> String {
    NumberFormat::new(decimals)
        .decimal_separator(decimal_separator)
        .thousands_separator(thousands_separator)
        .format_str(text)
}

/// Parses text written with `.` grouping and `,` decimals (`"1.234,56"`).
///
/// Every `.` is dropped, the first `,` becomes the decimal point, and the rest
/// must be a plain decimal number. Anything else is [`Error::NotANumber`].
pub fn parse_locale_float(text: &str) -> Result<f64> {
    let cleaned = text
        .trim()
        .chars()
        .filter(|ch| *ch != '.')
        .collect::<String>()
        .replacen(',', ".", 1);

    let plain = PLAIN_DECIMAL.as_ref().map_err(|err| Error::from(err.clone()))?;
    if !plain.is_match(&cleaned)? {
        return Err(Error::NotANumber(text.to_string()));
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| Error::NotANumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_outputs() {
        assert_eq!(format_number(1234.56, 0), "1,235");
        assert_eq!(number_format(1234.56, 2, ",", " "), "1 234,56");
        assert_eq!(number_format(1234.5678, 2, ".", ""), "1234.57");
        assert_eq!(number_format(67, 2, ",", "."), "67,00");
        assert_eq!(format_number(1000, 0), "1,000");
        assert_eq!(format_number(67.311, 2), "67.31");
        assert_eq!(format_number(1000.55, 1), "1,000.6");
        assert_eq!(number_format(67000, 5, ",", "."), "67.000,00000");
        assert_eq!(format_number(0.9, 0), "1");
        assert_eq!(format_number(1234.5678, 2), "1,234.57");
    }

    #[test]
    fn text_input_is_coerced() {
        assert_eq!(number_format_str("1.20", 2, ".", ","), "1.20");
        assert_eq!(number_format_str("1.20", 4, ".", ","), "1.2000");
        assert_eq!(number_format_str("1.2000", 3, ".", ","), "1.200");
        assert_eq!(number_format_str("abc", 2, ".", ","), "0.00");
        assert_eq!(number_format_str("", 0, ".", ","), "0");
    }

    #[test]
    fn non_finite_values_and_decimals_fall_back_to_zero() {
        assert_eq!(format_number(f64::NAN, 2), "0.00");
        assert_eq!(format_number(f64::INFINITY, 0), "0");
        assert_eq!(format_number(1234.5, -2), "1,235");
        assert_eq!(format_number(1234.5, f64::NAN), "1,235");
        assert_eq!(format_number(1.23456, 2.9), "1.23");
    }

    #[test]
    fn sign_precedes_grouped_digits() {
        assert_eq!(format_number(-1234567.891, 2), "-1,234,567.89");
        assert_eq!(format_number(-999.5, 0), "-1,000");
        assert_eq!(format_number(-0.4, 0), "0");
        assert_eq!(format_number(-0.004, 2), "0.00");
        assert_eq!(format_number(-2.5, 0), "-3");
    }

    #[test]
    fn large_values_keep_every_digit() {
        assert_eq!(format_number(1e21, 0), "1,000,000,000,000,000,000,000");
        assert_eq!(format_number(123456789012.0, 1), "123,456,789,012.0");
        assert_eq!(NumberFormat::new(1000).decimals(), MAX_DECIMALS);
    }

    #[test]
    fn multi_character_separators() {
        let format = NumberFormat::new(3)
            .decimal_separator(" dec ")
            .thousands_separator("'");
        assert_eq!(format.format(9876543.21), "9'876'543 dec 210");
    }

    #[test]
    fn locale_float_parses_grouped_comma_decimals() -> Result<()> {
        assert_eq!(parse_locale_float("1.234,56")?, 1234.56);
        assert_eq!(parse_locale_float("1.234.567")?, 1234567.0);
        assert_eq!(parse_locale_float(" -0,5 ")?, -0.5);
        assert_eq!(parse_locale_float("12")?, 12.0);
        Ok(())
    }

    #[test]
    fn locale_float_surfaces_not_a_number() {
        for bad in ["abc", "", "1,2,3", "12abc", "inf", "NaN", "1 234"] {
            match parse_locale_float(bad) {
                Err(Error::NotANumber(text)) => assert_eq!(text, bad),
                other => panic!("expected NotANumber for {bad:?}, got {other:?}"),
            }
        }
    }
}
