//! Culture- and style-aware parsing of numeric text.
//!
//! The parser splits text into a sign, a run of decimal digits and a
//! power-of-ten exponent ([`ParsedNumber`]); each numeric target then decides
//! whether that value fits. Hex styles are parsed separately into raw bits.

use thiserror::Error;

use crate::policy::{Culture, NumberStyles};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberParseError {
    #[error("input string was not in a correct format")]
    Format,

    #[error("value was either too large or too small for {0}")]
    Overflow(&'static str),

    #[error("hexadecimal number styles are not supported for {0}")]
    HexNotSupported(&'static str),
}

/// A decimal number as `digits × 10^exponent`.
///
/// `digits` has no leading or trailing zeros; zero is the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNumber {
    pub negative: bool,
    pub digits: String,
    pub exponent: i64,
}

// Exponents beyond this are clamped; every target overflows or underflows
// long before.
const EXPONENT_LIMIT: i64 = 100_000;

impl ParsedNumber {
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Exact integral value, `None` if fractional or wider than 128 bits.
    pub fn to_i128(&self) -> Option<i128> {
        if self.is_zero() {
            return Some(0);
        }
        if self.exponent < 0 || self.digits.len() as i64 + self.exponent > 39 {
            return None;
        }
        let mut magnitude: u128 = self.digits.parse().ok()?;
        for _ in 0..self.exponent {
            magnitude = magnitude.checked_mul(10)?;
        }
        let magnitude = i128::try_from(magnitude).ok()?;
        Some(if self.negative { -magnitude } else { magnitude })
    }

    /// Scientific form understood by Rust's float parsers, e.g. `-123e-2`.
    pub fn to_scientific(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        if self.is_zero() {
            format!("{}0", sign)
        } else {
            format!("{}{}e{}", sign, self.digits, self.exponent)
        }
    }

    /// Positional form, e.g. `-1.23`; `None` when too large to be useful.
    ///
    /// Values with more than 40 leading fractional zeros collapse to zero.
    pub fn to_plain(&self) -> Option<String> {
        if self.is_zero() {
            return Some("0".to_string());
        }
        let sign = if self.negative { "-" } else { "" };
        let len = self.digits.len() as i64;
        if self.exponent >= 0 {
            if len + self.exponent > 40 {
                return None;
            }
            return Some(format!(
                "{}{}{}",
                sign,
                self.digits,
                "0".repeat(self.exponent as usize)
            ));
        }

        let frac_len = -self.exponent;
        if frac_len - len > 40 {
            return Some("0".to_string());
        }
        if len > frac_len {
            let split = (len - frac_len) as usize;
            Some(format!(
                "{}{}.{}",
                sign,
                &self.digits[..split],
                &self.digits[split..]
            ))
        } else {
            Some(format!(
                "{}0.{}{}",
                sign,
                "0".repeat((frac_len - len) as usize),
                self.digits
            ))
        }
    }
}

/// Parse decimal text under `styles` and `culture`.
pub fn parse_decimal(
    text: &str,
    styles: NumberStyles,
    culture: &Culture,
) -> Result<ParsedNumber, NumberParseError> {
    let chars: Vec<char> = text.chars().collect();
    let currency: Vec<char> = culture.currency_symbol.chars().collect();
    let n = chars.len();
    let mut i = 0;

    let mut negative = false;
    let mut signed = false;
    let mut open_paren = false;
    let mut seen_currency = false;

    if styles.contains(NumberStyles::ALLOW_LEADING_WHITE) {
        while i < n && chars[i].is_whitespace() {
            i += 1;
        }
    }

    while i < n {
        let c = chars[i];
        if !signed
            && !open_paren
            && styles.contains(NumberStyles::ALLOW_LEADING_SIGN)
            && (c == culture.negative_sign || c == culture.positive_sign)
        {
            negative = c == culture.negative_sign;
            signed = true;
            i += 1;
        } else if !signed && !open_paren && styles.contains(NumberStyles::ALLOW_PARENTHESES) && c == '(' {
            negative = true;
            open_paren = true;
            i += 1;
        } else if !seen_currency
            && styles.contains(NumberStyles::ALLOW_CURRENCY_SYMBOL)
            && !currency.is_empty()
            && chars[i..].starts_with(&currency)
        {
            seen_currency = true;
            i += currency.len();
        } else if seen_currency
            && !signed
            && !open_paren
            && styles.contains(NumberStyles::ALLOW_LEADING_WHITE)
            && c.is_whitespace()
        {
            i += 1;
        } else {
            break;
        }
    }

    let mut int_digits = String::new();
    let mut frac_digits = String::new();
    let mut seen_digit = false;
    let mut in_fraction = false;
    while i < n {
        let c = chars[i];
        if c.is_ascii_digit() {
            if in_fraction {
                frac_digits.push(c);
            } else {
                int_digits.push(c);
            }
            seen_digit = true;
        } else if !in_fraction
            && styles.contains(NumberStyles::ALLOW_DECIMAL_POINT)
            && c == culture.decimal_separator
        {
            in_fraction = true;
        } else if !in_fraction
            && seen_digit
            && styles.contains(NumberStyles::ALLOW_THOUSANDS)
            && culture.is_group_separator(c)
        {
            // grouping is cosmetic
        } else {
            break;
        }
        i += 1;
    }
    if !seen_digit {
        return Err(NumberParseError::Format);
    }

    let mut exponent: i64 = 0;
    if styles.contains(NumberStyles::ALLOW_EXPONENT) && i < n && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        let mut exp_negative = false;
        if j < n && (chars[j] == culture.negative_sign || chars[j] == culture.positive_sign) {
            exp_negative = chars[j] == culture.negative_sign;
            j += 1;
        }
        let start = j;
        while j < n && chars[j].is_ascii_digit() {
            let digit = i64::from(chars[j] as u8 - b'0');
            exponent = (exponent * 10 + digit).min(EXPONENT_LIMIT);
            j += 1;
        }
        if j == start {
            return Err(NumberParseError::Format);
        }
        if exp_negative {
            exponent = -exponent;
        }
        i = j;
    }

    while i < n {
        let c = chars[i];
        if styles.contains(NumberStyles::ALLOW_TRAILING_WHITE) && c.is_whitespace() {
            i += 1;
        } else if !signed
            && !open_paren
            && styles.contains(NumberStyles::ALLOW_TRAILING_SIGN)
            && (c == culture.negative_sign || c == culture.positive_sign)
        {
            negative = c == culture.negative_sign;
            signed = true;
            i += 1;
        } else if open_paren && c == ')' {
            open_paren = false;
            i += 1;
        } else if !seen_currency
            && styles.contains(NumberStyles::ALLOW_CURRENCY_SYMBOL)
            && !currency.is_empty()
            && chars[i..].starts_with(&currency)
        {
            seen_currency = true;
            i += currency.len();
        } else {
            break;
        }
    }
    if i != n || open_paren {
        return Err(NumberParseError::Format);
    }

    let mut digits = int_digits;
    digits.push_str(&frac_digits);
    exponent -= frac_digits.len() as i64;

    let digits = digits.trim_start_matches('0');
    let trimmed = digits.trim_end_matches('0');
    exponent += (digits.len() - trimmed.len()) as i64;

    Ok(ParsedNumber {
        negative,
        exponent: if trimmed.is_empty() { 0 } else { exponent },
        digits: trimmed.to_string(),
    })
}

/// Parse hexadecimal digits (no sign, no `0x` prefix) into raw bits.
pub fn parse_hex(text: &str, styles: NumberStyles) -> Result<u128, NumberParseError> {
    let mut text = text;
    if styles.contains(NumberStyles::ALLOW_LEADING_WHITE) {
        text = text.trim_start();
    }
    if styles.contains(NumberStyles::ALLOW_TRAILING_WHITE) {
        text = text.trim_end();
    }
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(NumberParseError::Format);
    }
    let significant = text.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err(NumberParseError::Overflow("u128"));
    }
    u128::from_str_radix(significant, 16).map_err(|_| NumberParseError::Format)
}
