//! Floating point and decimal targets
//!
//! Same flow as the integer family. Text defaults to float style with
//! thousands separators; decimal coercion uses number style (no exponent).
//! `f32` and `decimal` failures read "invalid conversion", `f64` failures
//! read "value is not a number".

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::policy::{Culture, NumberStyles};
use crate::types::{TypeTag, TypedValue};

use super::numeric::{NumericConverter, NumericTarget, INVALID_CONVERSION, NOT_A_NUMBER};
use super::numeric_text::{NumberParseError, ParsedNumber};

pub type SingleConverter = NumericConverter<f32>;
pub type DoubleConverter = NumericConverter<f64>;
pub type DecimalConverter = NumericConverter<Decimal>;

/// NaN and the infinities, in the culture's spelling or as `∞`.
fn float_symbol(text: &str, culture: &Culture) -> Option<f64> {
    let text = text.trim();
    let lowered = text.to_lowercase();
    let is = |symbol: &str| lowered == symbol.to_lowercase();
    if is(culture.nan_symbol) {
        Some(f64::NAN)
    } else if is(culture.positive_infinity_symbol) || text == "∞" || text == "+∞" {
        Some(f64::INFINITY)
    } else if is(culture.negative_infinity_symbol) || text == "-∞" {
        Some(f64::NEG_INFINITY)
    } else {
        None
    }
}

impl NumericTarget for f64 {
    const TAG: TypeTag = TypeTag::F64;
    const PARSE_STYLE: NumberStyles = NumberStyles::FLOAT_AND_THOUSANDS;
    const COERCE_STYLE: NumberStyles = NumberStyles::FLOAT_AND_THOUSANDS;
    const FAILURE: &'static str = NOT_A_NUMBER;

    fn type_name() -> &'static str {
        "f64"
    }

    fn zero() -> Self {
        0.0
    }

    fn from_parsed(number: &ParsedNumber) -> Option<Self> {
        number.to_scientific().parse().ok()
    }

    fn from_hex(_bits: u128) -> Result<Self, NumberParseError> {
        Err(NumberParseError::HexNotSupported("f64"))
    }

    fn from_f64(value: f64) -> Option<Self> {
        Some(value)
    }

    fn from_symbol(text: &str, culture: &Culture) -> Option<Self> {
        float_symbol(text, culture)
    }

    fn into_value(self) -> TypedValue {
        TypedValue::F64(self)
    }
}

impl NumericTarget for f32 {
    const TAG: TypeTag = TypeTag::F32;
    const PARSE_STYLE: NumberStyles = NumberStyles::FLOAT_AND_THOUSANDS;
    const COERCE_STYLE: NumberStyles = NumberStyles::FLOAT_AND_THOUSANDS;
    const FAILURE: &'static str = INVALID_CONVERSION;

    fn type_name() -> &'static str {
        "f32"
    }

    fn zero() -> Self {
        0.0
    }

    fn from_parsed(number: &ParsedNumber) -> Option<Self> {
        number.to_scientific().parse().ok()
    }

    fn from_hex(_bits: u128) -> Result<Self, NumberParseError> {
        Err(NumberParseError::HexNotSupported("f32"))
    }

    fn from_f64(value: f64) -> Option<Self> {
        Some(value as f32)
    }

    fn from_symbol(text: &str, culture: &Culture) -> Option<Self> {
        float_symbol(text, culture).map(|v| v as f32)
    }

    fn into_value(self) -> TypedValue {
        TypedValue::F32(self)
    }
}

impl NumericTarget for Decimal {
    const TAG: TypeTag = TypeTag::Decimal;
    const PARSE_STYLE: NumberStyles = NumberStyles::FLOAT_AND_THOUSANDS;
    const COERCE_STYLE: NumberStyles = NumberStyles::NUMBER;
    const FAILURE: &'static str = INVALID_CONVERSION;

    fn type_name() -> &'static str {
        "decimal"
    }

    fn zero() -> Self {
        Decimal::ZERO
    }

    fn from_parsed(number: &ParsedNumber) -> Option<Self> {
        Decimal::from_str(&number.to_plain()?).ok()
    }

    fn from_hex(_bits: u128) -> Result<Self, NumberParseError> {
        Err(NumberParseError::HexNotSupported("decimal"))
    }

    // Go through the shortest round-trip text so 12.3 stays 12.3.
    fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_str(&value.to_string())
            .ok()
            .or_else(|| <Decimal as FromPrimitive>::from_f64(value))
    }

    fn into_value(self) -> TypedValue {
        TypedValue::Decimal(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Converter;
    use crate::error::ConversionErrorKind;
    use crate::policy::{ConversionPolicy, DE_DE};
    use crate::types::CellValue;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_double_text_and_numbers() {
        let policy = ConversionPolicy::default();
        let converter = DoubleConverter::new();
        assert_eq!(
            converter.convert_from_external(&policy, &"1,234.5".into()).unwrap(),
            TypedValue::F64(1234.5)
        );
        assert_eq!(
            converter.convert_from_external(&policy, &"1.5e3".into()).unwrap(),
            TypedValue::F64(1500.0)
        );
        assert_eq!(
            converter.convert_from_external(&policy, &CellValue::Number(0.25)).unwrap(),
            TypedValue::F64(0.25)
        );
        assert_eq!(
            converter.convert_from_external(&policy, &CellValue::Empty).unwrap(),
            TypedValue::F64(0.0)
        );
    }

    #[test]
    fn test_double_symbols() {
        let policy = ConversionPolicy::default();
        let converter = DoubleConverter::new();
        match converter.convert_from_external(&policy, &"NaN".into()).unwrap() {
            TypedValue::F64(v) => assert!(v.is_nan()),
            other => panic!("expected f64, got {:?}", other),
        }
        assert_eq!(
            converter.convert_from_external(&policy, &"-Infinity".into()).unwrap(),
            TypedValue::F64(f64::NEG_INFINITY)
        );
    }

    #[test]
    fn test_double_failure_wording() {
        let policy = ConversionPolicy::default();
        let err = DoubleConverter::new()
            .convert_from_external(&policy, &"abc".into())
            .unwrap_err();
        assert!(err.message().starts_with(NOT_A_NUMBER));

        let err = SingleConverter::new()
            .convert_from_external(&policy, &"abc".into())
            .unwrap_err();
        assert!(err.message().starts_with(INVALID_CONVERSION));
        assert_eq!(err.kind(), ConversionErrorKind::InvalidValue);
    }

    #[test]
    fn test_single_zero_fills_null() {
        let policy = ConversionPolicy::default();
        assert_eq!(
            SingleConverter::new()
                .convert_from_external(&policy, &CellValue::Empty)
                .unwrap(),
            TypedValue::F32(0.0)
        );
    }

    #[test]
    fn test_decimal_from_text_and_double() {
        let policy = ConversionPolicy::default();
        let converter = DecimalConverter::new();
        assert_eq!(
            converter.convert_from_external(&policy, &"12.3".into()).unwrap(),
            TypedValue::Decimal(dec("12.3"))
        );
        assert_eq!(
            converter.convert_from_external(&policy, &CellValue::Number(12.3)).unwrap(),
            TypedValue::Decimal(dec("12.3"))
        );
        assert_eq!(
            converter.convert_from_external(&policy, &"-1e-3".into()).unwrap(),
            TypedValue::Decimal(dec("-0.001"))
        );
    }

    #[test]
    fn test_decimal_culture() {
        let policy = ConversionPolicy::default().with_culture(&DE_DE);
        assert_eq!(
            DecimalConverter::new()
                .convert_from_external(&policy, &"1.234,56".into())
                .unwrap(),
            TypedValue::Decimal(dec("1234.56"))
        );
    }

    #[test]
    fn test_decimal_rejects_hex_and_infinity() {
        let hex = ConversionPolicy::default().with_number_styles(NumberStyles::HEX_NUMBER);
        // hex is unsupported; the default coercion still reads "12" as decimal
        assert_eq!(
            DecimalConverter::new()
                .convert_from_external(&hex, &"12".into())
                .unwrap(),
            TypedValue::Decimal(dec("12"))
        );

        let policy = ConversionPolicy::default();
        let err = DecimalConverter::new()
            .convert_from_external(&policy, &CellValue::Number(f64::INFINITY))
            .unwrap_err();
        assert_eq!(err.kind(), ConversionErrorKind::Overflow);
    }
}
