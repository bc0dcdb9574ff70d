use crate::error::ConversionResult;
use crate::policy::ConversionPolicy;
use crate::types::{CellValue, TypeTag, TypedValue};

use super::{default_to_external, render_cell_text, Converter};

/// Text properties. Any cell renders to trimmed text; empty cells become `""`.
#[derive(Debug)]
pub struct StringConverter {
    ty: TypeTag,
}

impl StringConverter {
    pub fn new() -> Self {
        Self {
            ty: TypeTag::String,
        }
    }
}

impl Default for StringConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for StringConverter {
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
        let text = render_cell_text(raw, policy.culture).unwrap_or_default();
        Ok(TypedValue::String(text.trim().to_string()))
    }
}
