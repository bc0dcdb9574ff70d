use crate::error::ConversionResult;
use crate::policy::ConversionPolicy;
use crate::types::{CellValue, TypeTag, TypedValue};

use super::{default_from_external, default_to_external, Converter};

/// Single characters: text that is exactly one character once trimmed.
#[derive(Debug)]
pub struct CharConverter {
    ty: TypeTag,
}

impl CharConverter {
    pub fn new() -> Self {
        Self { ty: TypeTag::Char }
    }
}

impl Default for CharConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for CharConverter {
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
        _policy: &ConversionPolicy,
        raw: &CellValue,
    ) -> ConversionResult<TypedValue> {
        if let CellValue::String(text) = raw {
            let mut chars = text.trim().chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Ok(TypedValue::Char(c));
            }
        }
        default_from_external(&self.ty, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_character_after_trim() {
        let policy = ConversionPolicy::default();
        let converter = CharConverter::new();
        assert_eq!(
            converter.convert_from_external(&policy, &" x ".into()).unwrap(),
            TypedValue::Char('x')
        );
        assert_eq!(
            converter.convert_from_external(&policy, &"é".into()).unwrap(),
            TypedValue::Char('é')
        );
    }

    #[test]
    fn test_rejects_everything_else() {
        let policy = ConversionPolicy::default();
        let converter = CharConverter::new();
        for raw in [
            CellValue::from("xy"),
            CellValue::from("   "),
            CellValue::Empty,
            CellValue::Number(1.0),
        ] {
            assert!(converter.convert_from_external(&policy, &raw).is_err(), "{:?}", raw);
        }
    }

    #[test]
    fn test_to_external() {
        let policy = ConversionPolicy::default();
        assert_eq!(
            CharConverter::new()
                .convert_to_external(&policy, &TypedValue::Char('z'))
                .unwrap(),
            CellValue::String("z".to_string())
        );
    }
}
