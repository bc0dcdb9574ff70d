use uuid::Uuid;

use crate::error::{ConversionError, ConversionResult};
use crate::policy::ConversionPolicy;
use crate::types::{CellValue, TypeTag, TypedValue};

use super::{type_mismatch, Converter};

/// 128-bit identifiers, stored as lowercase hyphenated text.
#[derive(Debug)]
pub struct GuidConverter {
    ty: TypeTag,
}

impl GuidConverter {
    pub fn new() -> Self {
        Self { ty: TypeTag::Guid }
    }
}

impl Default for GuidConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for GuidConverter {
    fn converted_type(&self) -> &TypeTag {
        &self.ty
    }

    fn accepts_native_type(&self) -> bool {
        false
    }

    fn convert_to_external(
        &self,
        _policy: &ConversionPolicy,
        value: &TypedValue,
    ) -> ConversionResult<CellValue> {
        match value {
            TypedValue::Null => Ok(CellValue::Empty),
            TypedValue::Guid(id) => Ok(CellValue::String(id.hyphenated().to_string())),
            other => Err(type_mismatch(&self.ty, other)),
        }
    }

    fn convert_from_external(
        &self,
        _policy: &ConversionPolicy,
        raw: &CellValue,
    ) -> ConversionResult<TypedValue> {
        let text = match raw {
            CellValue::String(text) => text.trim(),
            CellValue::Empty => {
                return Err(ConversionError::invalid("Unable to convert an empty cell to guid"))
            }
            other => {
                return Err(ConversionError::invalid(format!(
                    "Unable to convert {} value '{}' to guid",
                    other.type_name(),
                    other
                )))
            }
        };
        Uuid::parse_str(text).map(TypedValue::Guid).map_err(|e| {
            ConversionError::invalid(format!("'{}' is not a valid guid", text)).with_source(e)
        })
    }
}
