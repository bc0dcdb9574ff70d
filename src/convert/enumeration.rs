//! Enum converter
//!
//! Enums are written by member name. Reading accepts a member name in any
//! case or the underlying ordinal; flags enums also accept comma-separated
//! combinations such as `"Read, Write"`. Non-text cells are rendered to
//! text first, so a numeric `1.0` resolves ordinal 1.

use std::sync::Arc;

use thiserror::Error;

use crate::error::{ArgumentError, ConversionError, ConversionResult};
use crate::policy::ConversionPolicy;
use crate::types::{CellValue, EnumType, EnumValue, TypeTag, TypedValue};

use super::{render_cell_text, type_mismatch, Converter};

/// Why a text did not name a member of an enum.
#[derive(Debug, Error)]
pub enum EnumParseError {
    #[error("a value for enum {0} must not be empty")]
    Empty(String),

    #[error("requested value '{value}' was not found in enum {enum_name}")]
    NotFound { enum_name: String, value: String },
}

/// Resolve `text` to an ordinal of `ty`.
pub fn parse_enum(ty: &EnumType, text: &str) -> Result<i64, EnumParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(EnumParseError::Empty(ty.name().to_string()));
    }
    if !ty.is_flags() {
        return parse_member(ty, text);
    }

    let mut combined = 0;
    for part in text.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(not_found(ty, text));
        }
        combined |= parse_member(ty, part).map_err(|_| not_found(ty, text))?;
    }
    Ok(combined)
}

fn parse_member(ty: &EnumType, text: &str) -> Result<i64, EnumParseError> {
    let numeric = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+');
    let value = if numeric {
        text.parse::<i64>().ok()
    } else {
        ty.value_of(text)
    };
    value.ok_or_else(|| not_found(ty, text))
}

fn not_found(ty: &EnumType, text: &str) -> EnumParseError {
    EnumParseError::NotFound {
        enum_name: ty.name().to_string(),
        value: text.to_string(),
    }
}

#[derive(Debug)]
pub struct EnumConverter {
    ty: TypeTag,
    enum_type: Arc<EnumType>,
}

impl EnumConverter {
    /// Fails if `ty` is not an enum tag.
    pub fn new(ty: TypeTag) -> Result<Self, ArgumentError> {
        let TypeTag::Enum(enum_type) = &ty else {
            return Err(ArgumentError::new(format!("Type {} is not an enum", ty)));
        };
        let enum_type = Arc::clone(enum_type);
        Ok(Self { ty, enum_type })
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }
}

impl Converter for EnumConverter {
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
            TypedValue::Enum(member) if *member.ty == *self.enum_type => {
                Ok(CellValue::String(member.name()))
            }
            other => Err(type_mismatch(&self.ty, other)),
        }
    }

    fn convert_from_external(
        &self,
        policy: &ConversionPolicy,
        raw: &CellValue,
    ) -> ConversionResult<TypedValue> {
        let text = render_cell_text(raw, policy.culture).unwrap_or_default();
        parse_enum(&self.enum_type, &text)
            .map(|value| TypedValue::Enum(EnumValue::new(Arc::clone(&self.enum_type), value)))
            .map_err(|e| {
                ConversionError::invalid(format!(
                    "Unable to convert '{}' to enum {}",
                    text.trim(),
                    self.enum_type.name()
                ))
                .with_source(e)
            })
    }
}
