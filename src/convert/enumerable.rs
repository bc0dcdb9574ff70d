use crate::error::{ConversionError, ConversionResult};
use crate::policy::ConversionPolicy;
use crate::types::{CellValue, TypeTag, TypedValue};

use super::Converter;

/// Placeholder for collection-typed properties.
///
/// A sequence never fits in one cell, so both directions fail with a message
/// pointing at [`crate::registry::ConverterRegistry::register`]. The registry
/// hands this out for any `T[]` tag that has no registered converter, which
/// keeps such properties from failing with a vague "unsupported type" error.
#[derive(Debug)]
pub struct EnumerableConverter {
    ty: TypeTag,
}

impl EnumerableConverter {
    pub fn new(ty: TypeTag) -> Self {
        Self { ty }
    }

    fn unsupported(&self) -> ConversionError {
        ConversionError::unsupported(format!(
            "{} is a collection type and cannot be converted to a single cell. \
             Register a custom converter for {} to read or write it.",
            self.ty, self.ty
        ))
    }
}

impl Converter for EnumerableConverter {
    fn converted_type(&self) -> &TypeTag {
        &self.ty
    }

    fn accepts_native_type(&self) -> bool {
        false
    }

    fn convert_to_external(
        &self,
        _policy: &ConversionPolicy,
        _value: &TypedValue,
    ) -> ConversionResult<CellValue> {
        Err(self.unsupported())
    }

    fn convert_from_external(
        &self,
        _policy: &ConversionPolicy,
        _raw: &CellValue,
    ) -> ConversionResult<TypedValue> {
        Err(self.unsupported())
    }
}
