//! Converters between raw cell values and typed property values
//!
//! Every supported type has one [`Converter`]. The mapping layer asks the
//! [`crate::registry::ConverterRegistry`] for the converter of a property
//! type, then calls:
//! - [`Converter::convert_from_external`] when reading a cell
//! - [`Converter::convert_to_external`] when writing one, unless
//!   [`Converter::accepts_native_type`] lets it store the value directly
//!
//! Converters hold no mutable state and are shared across threads.

pub mod boolean;
pub mod character;
pub mod datetime;
pub mod enumerable;
pub mod enumeration;
pub mod floating;
pub mod guid;
pub mod nullable;
pub mod numeric;
pub mod numeric_text;
pub mod string;
mod text;
pub mod timespan;

pub use boolean::BooleanConverter;
pub use character::CharConverter;
pub use datetime::DateTimeConverter;
pub use enumerable::EnumerableConverter;
pub use enumeration::EnumConverter;
pub use floating::{DecimalConverter, DoubleConverter, SingleConverter};
pub use guid::GuidConverter;
pub use nullable::NullableConverter;
pub use numeric::{
    ByteConverter, Int16Converter, Int32Converter, Int64Converter, NumericConverter,
    NumericTarget, SByteConverter, UInt16Converter, UInt32Converter, UInt64Converter,
};
pub use string::StringConverter;
pub use text::{render_cell_text, render_text};
pub use timespan::TimeSpanConverter;

use std::fmt;

use crate::error::{ConversionError, ConversionResult};
use crate::policy::ConversionPolicy;
use crate::types::{CellValue, TypeTag, TypedValue};

/// Converts one property type to and from raw cell values.
pub trait Converter: fmt::Debug + Send + Sync {
    /// The type this converter produces and consumes.
    fn converted_type(&self) -> &TypeTag;

    /// True if cells can hold the typed value directly, so the I/O layer
    /// may skip [`Converter::convert_to_external`].
    fn accepts_native_type(&self) -> bool;

    /// Typed value → value safe to store in a cell.
    fn convert_to_external(
        &self,
        policy: &ConversionPolicy,
        value: &TypedValue,
    ) -> ConversionResult<CellValue>;

    /// Raw cell value → typed value.
    fn convert_from_external(
        &self,
        policy: &ConversionPolicy,
        raw: &CellValue,
    ) -> ConversionResult<TypedValue>;

    /// Display format hint for natively stored columns.
    fn display_format<'p>(&self, _policy: &'p ConversionPolicy) -> Option<&'p str> {
        None
    }
}

/// Shared "to external" behaviour: null stays empty, everything else
/// becomes its textual form.
pub fn default_to_external(
    policy: &ConversionPolicy,
    value: &TypedValue,
) -> ConversionResult<CellValue> {
    Ok(render_text(value, policy.culture).map_or(CellValue::Empty, CellValue::String))
}

/// Shared "from external" behaviour: no interpretation applies.
pub fn default_from_external(ty: &TypeTag, raw: &CellValue) -> ConversionResult<TypedValue> {
    Err(ConversionError::invalid(format!(
        "Unable to convert {} value '{}' to {}",
        raw.type_name(),
        raw,
        ty
    )))
}

/// Error for a typed value handed to the wrong converter.
pub(crate) fn type_mismatch(ty: &TypeTag, value: &TypedValue) -> ConversionError {
    ConversionError::invalid(format!(
        "Expected a {} value, got {}",
        ty,
        value.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionErrorKind;

    #[test]
    fn test_default_to_external_stringifies() {
        let policy = ConversionPolicy::default();
        assert_eq!(
            default_to_external(&policy, &TypedValue::I32(7)).unwrap(),
            CellValue::String("7".to_string())
        );
        assert_eq!(
            default_to_external(&policy, &TypedValue::Null).unwrap(),
            CellValue::Empty
        );
    }

    #[test]
    fn test_default_from_external_always_fails() {
        let err = default_from_external(&TypeTag::Guid, &CellValue::Number(1.0)).unwrap_err();
        assert_eq!(err.kind(), ConversionErrorKind::InvalidValue);
        assert!(err.message().contains("guid"));
    }
}
