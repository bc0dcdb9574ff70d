//! Numeric converters
//!
//! One generic [`NumericConverter`] serves every numeric type; the per-type
//! facts (default styles, range, failure wording) live in [`NumericTarget`].
//!
//! Reading a cell:
//! 1. Text is parsed with the policy's number style (or the type default)
//!    under the policy culture.
//! 2. Otherwise, or when that fails, the raw value is coerced: empty → zero,
//!    number → rounded half-to-even and range-checked, boolean → 0/1, text →
//!    parsed with the type's default style.

use std::marker::PhantomData;

use crate::error::{ConversionError, ConversionResult};
use crate::policy::{ConversionPolicy, Culture, NumberStyles};
use crate::types::{CellValue, TypeTag, TypedValue};

use super::numeric_text::{parse_decimal, parse_hex, NumberParseError, ParsedNumber};
use super::{default_to_external, render_cell_text, Converter};

pub const NOT_A_NUMBER: &str = "value is not a number";
pub const INVALID_CONVERSION: &str = "invalid conversion";

/// Per-type behaviour of a numeric target.
pub trait NumericTarget: Copy + Send + Sync + std::fmt::Debug + 'static {
    const TAG: TypeTag;
    /// Style used for text when the policy sets none
    const PARSE_STYLE: NumberStyles;
    /// Style used by the generic coercion fallback
    const COERCE_STYLE: NumberStyles;
    /// Leading phrase of conversion failures
    const FAILURE: &'static str;

    fn type_name() -> &'static str;

    fn zero() -> Self;

    fn from_parsed(number: &ParsedNumber) -> Option<Self>;

    fn from_hex(bits: u128) -> Result<Self, NumberParseError>;

    fn from_f64(value: f64) -> Option<Self>;

    /// Culture symbols such as NaN or infinity.
    fn from_symbol(_text: &str, _culture: &Culture) -> Option<Self> {
        None
    }

    fn into_value(self) -> TypedValue;
}

/// Parse `text` into `T` under `styles` and `culture`.
pub fn parse_number<T: NumericTarget>(
    text: &str,
    styles: NumberStyles,
    culture: &Culture,
) -> Result<T, NumberParseError> {
    if styles.is_hex() {
        return T::from_hex(parse_hex(text, styles)?);
    }
    if let Some(value) = T::from_symbol(text, culture) {
        return Ok(value);
    }
    let parsed = parse_decimal(text, styles, culture)?;
    T::from_parsed(&parsed).ok_or(NumberParseError::Overflow(T::type_name()))
}

/// Generic coercion of any raw value into `T`.
pub fn coerce_number<T: NumericTarget>(raw: &CellValue, culture: &Culture) -> ConversionResult<T> {
    match raw {
        CellValue::Empty => Ok(T::zero()),
        CellValue::Number(value) => T::from_f64(*value).ok_or_else(|| {
            ConversionError::overflow(format!(
                "{}: {} is outside the range of {}",
                T::FAILURE,
                value,
                T::type_name()
            ))
        }),
        CellValue::Bool(flag) => {
            let value = if *flag { 1.0 } else { 0.0 };
            T::from_f64(value).ok_or_else(|| failure::<T>(raw, culture))
        }
        CellValue::String(text) => parse_number::<T>(text, T::COERCE_STYLE, culture)
            .map_err(|e| parse_failure::<T>(raw, culture, e)),
        CellValue::DateTime(_) | CellValue::Duration(_) => Err(failure::<T>(raw, culture)),
    }
}

fn failure<T: NumericTarget>(raw: &CellValue, culture: &Culture) -> ConversionError {
    ConversionError::invalid(describe::<T>(raw, culture))
}

fn parse_failure<T: NumericTarget>(
    raw: &CellValue,
    culture: &Culture,
    error: NumberParseError,
) -> ConversionError {
    let message = describe::<T>(raw, culture);
    let err = match error {
        NumberParseError::Overflow(_) => ConversionError::overflow(message),
        _ => ConversionError::invalid(message),
    };
    err.with_source(error)
}

fn describe<T: NumericTarget>(raw: &CellValue, culture: &Culture) -> String {
    format!(
        "{}: cannot convert {} '{}' to {}",
        T::FAILURE,
        raw.type_name(),
        render_cell_text(raw, culture).unwrap_or_default(),
        T::type_name()
    )
}

/// Converter for any [`NumericTarget`].
#[derive(Debug)]
pub struct NumericConverter<T> {
    ty: TypeTag,
    _target: PhantomData<fn() -> T>,
}

impl<T: NumericTarget> NumericConverter<T> {
    pub fn new() -> Self {
        Self {
            ty: T::TAG,
            _target: PhantomData,
        }
    }
}

impl<T: NumericTarget> Default for NumericConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NumericTarget> Converter for NumericConverter<T> {
    fn converted_type(&self) -> &TypeTag {
        &self.ty
    }

    fn accepts_native_type(&self) -> bool {
        true
    }

    fn convert_to_external(
        &self,
        policy: &ConversionPolicy,
        value: &TypedValue,
    ) -> ConversionResult<CellValue> {
        default_to_external(policy, value)
    }

    fn convert_from_external(
        &self,
        policy: &ConversionPolicy,
        raw: &CellValue,
    ) -> ConversionResult<TypedValue> {
        if let CellValue::String(text) = raw {
            let styles = policy.number_styles_or(T::PARSE_STYLE);
            match parse_number::<T>(text, styles, policy.culture) {
                Ok(value) => return Ok(value.into_value()),
                Err(e) => tracing::trace!(
                    target_type = %self.ty,
                    error = %e,
                    "styled parse failed, falling back to coercion"
                ),
            }
        }
        coerce_number::<T>(raw, policy.culture).map(T::into_value)
    }

    fn display_format<'p>(&self, policy: &'p ConversionPolicy) -> Option<&'p str> {
        policy.number_format.as_deref()
    }
}

macro_rules! integer_target {
    ($ty:ty, $bits:ty, $tag:ident) => {
        impl NumericTarget for $ty {
            const TAG: TypeTag = TypeTag::$tag;
            const PARSE_STYLE: NumberStyles = NumberStyles::INTEGER;
            const COERCE_STYLE: NumberStyles = NumberStyles::INTEGER;
            const FAILURE: &'static str = NOT_A_NUMBER;

            fn type_name() -> &'static str {
                stringify!($ty)
            }

            fn zero() -> Self {
                0
            }

            fn from_parsed(number: &ParsedNumber) -> Option<Self> {
                number.to_i128().and_then(|v| <$ty>::try_from(v).ok())
            }

            // Signed targets reinterpret the bits as two's complement.
            fn from_hex(bits: u128) -> Result<Self, NumberParseError> {
                <$bits>::try_from(bits)
                    .map(|v| v as $ty)
                    .map_err(|_| NumberParseError::Overflow(stringify!($ty)))
            }

            fn from_f64(value: f64) -> Option<Self> {
                let rounded = value.round_ties_even();
                (rounded >= <$ty>::MIN as f64 && rounded < <$ty>::MAX as f64 + 1.0)
                    .then(|| rounded as $ty)
            }

            fn into_value(self) -> TypedValue {
                TypedValue::$tag(self)
            }
        }
    };
}

integer_target!(u8, u8, U8);
integer_target!(i8, u8, I8);
integer_target!(i16, u16, I16);
integer_target!(u16, u16, U16);
integer_target!(i32, u32, I32);
integer_target!(u32, u32, U32);
integer_target!(i64, u64, I64);
integer_target!(u64, u64, U64);

pub type ByteConverter = NumericConverter<u8>;
pub type SByteConverter = NumericConverter<i8>;
pub type Int16Converter = NumericConverter<i16>;
pub type UInt16Converter = NumericConverter<u16>;
pub type Int32Converter = NumericConverter<i32>;
pub type UInt32Converter = NumericConverter<u32>;
pub type Int64Converter = NumericConverter<i64>;
pub type UInt64Converter = NumericConverter<u64>;
