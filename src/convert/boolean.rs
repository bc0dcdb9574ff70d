//! Boolean converter
//!
//! Spreadsheets often hold booleans as text ("yes", "Y", "1") or numbers, so
//! reading tries, in order: a native boolean, a number (non-zero is true),
//! the literals `true`/`false`, the integers `0`/`1`, then the policy's true
//! and false token lists. An empty cell is false only when the false tokens
//! contain `""`.

use crate::error::{ConversionError, ConversionResult};
use crate::policy::ConversionPolicy;
use crate::types::{CellValue, TypeTag, TypedValue};

use super::{type_mismatch, Converter};

#[derive(Debug)]
pub struct BooleanConverter {
    ty: TypeTag,
}

impl BooleanConverter {
    pub fn new() -> Self {
        Self { ty: TypeTag::Bool }
    }

    fn from_text(&self, policy: &ConversionPolicy, text: &str) -> Option<bool> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Some(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Some(false);
        }
        match trimmed.parse::<i32>() {
            Ok(1) => return Some(true),
            Ok(0) => return Some(false),
            _ => {}
        }

        let lowered = trimmed.to_lowercase();
        let matches = |tokens: Vec<&str>| tokens.iter().any(|t| t.trim().to_lowercase() == lowered);
        if matches(policy.true_values()) {
            Some(true)
        } else if matches(policy.false_values()) {
            Some(false)
        } else {
            None
        }
    }
}

impl Default for BooleanConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for BooleanConverter {
    fn converted_type(&self) -> &TypeTag {
        &self.ty
    }

    fn accepts_native_type(&self) -> bool {
        false
    }

    /// Writes the first true/false token; `"1"`/`"0"` become numbers.
    fn convert_to_external(
        &self,
        policy: &ConversionPolicy,
        value: &TypedValue,
    ) -> ConversionResult<CellValue> {
        let flag = match value {
            TypedValue::Null => return Ok(CellValue::Empty),
            TypedValue::Bool(flag) => *flag,
            other => return Err(type_mismatch(&self.ty, other)),
        };
        let tokens = if flag {
            policy.true_values()
        } else {
            policy.false_values()
        };
        let canonical = tokens.first().copied().unwrap_or(if flag { "true" } else { "false" });
        Ok(match canonical {
            "1" => CellValue::Number(1.0),
            "0" => CellValue::Number(0.0),
            token => CellValue::String(token.to_string()),
        })
    }

    fn convert_from_external(
        &self,
        policy: &ConversionPolicy,
        raw: &CellValue,
    ) -> ConversionResult<TypedValue> {
        let parsed = match raw {
            CellValue::Bool(flag) => Some(*flag),
            CellValue::Number(value) => Some(*value != 0.0),
            CellValue::String(text) => self.from_text(policy, text),
            CellValue::Empty => policy
                .false_values()
                .iter()
                .any(|t| t.is_empty())
                .then_some(false),
            CellValue::DateTime(_) | CellValue::Duration(_) => None,
        };

        parsed.map(TypedValue::Bool).ok_or_else(|| {
            ConversionError::invalid(format!(
                "Unable to convert {} value '{}' to bool; expected one of [{}] or [{}]",
                raw.type_name(),
                raw,
                policy.true_values().join(", "),
                policy.false_values().join(", ")
            ))
        })
    }
}
