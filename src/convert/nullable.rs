//! Nullable wrapper
//!
//! Wraps the converter of a value type `T` to serve `T?`. Empty cells and
//! empty text read as null; everything else goes to the inner converter.

use std::sync::Arc;

use crate::error::{ArgumentError, CellbindResult, ConversionResult};
use crate::policy::ConversionPolicy;
use crate::registry::ConverterRegistry;
use crate::types::{CellValue, TypeTag, TypedValue};

use super::Converter;

#[derive(Debug)]
pub struct NullableConverter {
    ty: TypeTag,
    inner: Arc<dyn Converter>,
}

impl NullableConverter {
    /// Build a converter for `ty` (`T?`), resolving `T` through the global registry.
    pub fn new(ty: TypeTag) -> CellbindResult<Self> {
        Self::with_registry(ty, ConverterRegistry::global())
    }

    /// Same as [`NullableConverter::new`], resolving `T` through `registry`.
    pub fn with_registry(ty: TypeTag, registry: &ConverterRegistry) -> CellbindResult<Self> {
        let inner_ty = Self::inner_type(&ty)?;
        let inner = registry.get_converter(inner_ty)?;
        Ok(Self::with_inner(ty, inner)?)
    }

    /// Wrap an already resolved converter for `T`.
    pub fn with_inner(ty: TypeTag, inner: Arc<dyn Converter>) -> Result<Self, ArgumentError> {
        let inner_ty = Self::inner_type(&ty)?;
        if inner.converted_type() != inner_ty {
            return Err(ArgumentError::new(format!(
                "Converter for {} cannot serve {}",
                inner.converted_type(),
                ty
            )));
        }
        Ok(Self { ty, inner })
    }

    fn inner_type(ty: &TypeTag) -> Result<&TypeTag, ArgumentError> {
        match ty {
            TypeTag::Nullable(inner) if ty.is_nullable() => Ok(inner),
            _ => Err(ArgumentError::new(format!(
                "Type {} is not a nullable value type",
                ty
            ))),
        }
    }

    pub fn inner(&self) -> &Arc<dyn Converter> {
        &self.inner
    }
}

impl Converter for NullableConverter {
    fn converted_type(&self) -> &TypeTag {
        &self.ty
    }

    fn accepts_native_type(&self) -> bool {
        self.inner.accepts_native_type()
    }

    fn convert_to_external(
        &self,
        policy: &ConversionPolicy,
        value: &TypedValue,
    ) -> ConversionResult<CellValue> {
        match value {
            TypedValue::Null => Ok(CellValue::Empty),
            value if self.inner.accepts_native_type() => Ok(value.to_native_cell()),
            value => self.inner.convert_to_external(policy, value),
        }
    }

    fn convert_from_external(
        &self,
        policy: &ConversionPolicy,
        raw: &CellValue,
    ) -> ConversionResult<TypedValue> {
        match raw {
            CellValue::Empty => Ok(TypedValue::Null),
            CellValue::String(text) if text.is_empty() => Ok(TypedValue::Null),
            raw => self.inner.convert_from_external(policy, raw),
        }
    }

    fn display_format<'p>(&self, policy: &'p ConversionPolicy) -> Option<&'p str> {
        self.inner.display_format(policy)
    }
}
