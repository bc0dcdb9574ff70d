//! Converter registry
//!
//! Maps a [`TypeTag`] to the converter serving it. A fresh registry holds
//! the built-in scalars. Enum and nullable converters are synthesized on
//! first request and cached for the life of the registry; sequence tags
//! without a registered converter get an [`EnumerableConverter`].
//!
//! Lookups take a read lock. Synthesis resolves the inner converter first,
//! without holding any lock (nullable-of-enum recurses), then takes the
//! write lock only for the check-and-insert, so racing threads all end up
//! with the instance that won.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::convert::{
    BooleanConverter, ByteConverter, CharConverter, Converter, DateTimeConverter,
    DecimalConverter, DoubleConverter, EnumConverter, EnumerableConverter, GuidConverter,
    Int16Converter, Int32Converter, Int64Converter, NullableConverter, SByteConverter,
    SingleConverter, StringConverter, TimeSpanConverter, UInt16Converter, UInt32Converter,
    UInt64Converter,
};
use crate::error::{ConversionError, ConversionResult};
use crate::types::{TypeTag, SCALAR_TYPES};

static GLOBAL: Lazy<ConverterRegistry> = Lazy::new(ConverterRegistry::new);

/// Thread-safe map from type tags to converters.
#[derive(Debug)]
pub struct ConverterRegistry {
    converters: RwLock<HashMap<TypeTag, Arc<dyn Converter>>>,
}

impl ConverterRegistry {
    /// A registry pre-populated with the built-in scalar converters.
    pub fn new() -> Self {
        let converters = SCALAR_TYPES
            .iter()
            .filter_map(|ty| builtin(ty).map(|converter| (ty.clone(), converter)))
            .collect();
        Self {
            converters: RwLock::new(converters),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static ConverterRegistry {
        &GLOBAL
    }

    /// Resolve the converter for `ty`.
    ///
    /// Order: cached entry, sequence placeholder, enum, nullable. Anything
    /// else (such as an unregistered [`TypeTag::Named`]) is an
    /// [`UnsupportedType`](crate::error::ConversionErrorKind::UnsupportedType) error.
    pub fn get_converter(&self, ty: &TypeTag) -> ConversionResult<Arc<dyn Converter>> {
        if let Some(converter) = self.converters.read().get(ty) {
            return Ok(Arc::clone(converter));
        }

        let synthesized: Arc<dyn Converter> = match ty {
            TypeTag::Sequence(_) => return Ok(Arc::new(EnumerableConverter::new(ty.clone()))),
            TypeTag::Enum(_) => Arc::new(EnumConverter::new(ty.clone()).map_err(unresolvable)?),
            TypeTag::Nullable(inner) if ty.is_nullable() => {
                let inner = self.get_converter(inner)?;
                Arc::new(NullableConverter::with_inner(ty.clone(), inner).map_err(unresolvable)?)
            }
            _ => {
                return Err(ConversionError::unsupported(format!(
                    "Unable to convert type {}",
                    ty
                )))
            }
        };

        let mut converters = self.converters.write();
        let converter = converters.entry(ty.clone()).or_insert_with(|| {
            tracing::debug!(target_type = %ty, "synthesized converter");
            synthesized
        });
        Ok(Arc::clone(converter))
    }

    /// Register `converter` for `ty`, replacing any previous entry.
    pub fn register(&self, ty: TypeTag, converter: Arc<dyn Converter>) {
        tracing::debug!(target_type = %ty, "registered converter");
        self.converters.write().insert(ty, converter);
    }

    pub fn contains(&self, ty: &TypeTag) -> bool {
        self.converters.read().contains_key(ty)
    }

    /// Every tag with a cached converter, sorted by name.
    pub fn registered_types(&self) -> Vec<TypeTag> {
        let mut types: Vec<TypeTag> = self.converters.read().keys().cloned().collect();
        types.sort_by_cached_key(|ty| ty.to_string());
        types
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn unresolvable(err: crate::error::ArgumentError) -> ConversionError {
    ConversionError::unsupported(err.to_string())
}

fn builtin(ty: &TypeTag) -> Option<Arc<dyn Converter>> {
    let converter: Arc<dyn Converter> = match ty {
        TypeTag::Bool => Arc::new(BooleanConverter::new()),
        TypeTag::U8 => Arc::new(ByteConverter::new()),
        TypeTag::I8 => Arc::new(SByteConverter::new()),
        TypeTag::I16 => Arc::new(Int16Converter::new()),
        TypeTag::U16 => Arc::new(UInt16Converter::new()),
        TypeTag::I32 => Arc::new(Int32Converter::new()),
        TypeTag::U32 => Arc::new(UInt32Converter::new()),
        TypeTag::I64 => Arc::new(Int64Converter::new()),
        TypeTag::U64 => Arc::new(UInt64Converter::new()),
        TypeTag::F32 => Arc::new(SingleConverter::new()),
        TypeTag::F64 => Arc::new(DoubleConverter::new()),
        TypeTag::Decimal => Arc::new(DecimalConverter::new()),
        TypeTag::Char => Arc::new(CharConverter::new()),
        TypeTag::String => Arc::new(StringConverter::new()),
        TypeTag::DateTime => Arc::new(DateTimeConverter::new()),
        TypeTag::TimeSpan => Arc::new(TimeSpanConverter::new()),
        TypeTag::Guid => Arc::new(GuidConverter::new()),
        _ => return None,
    };
    Some(converter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionErrorKind;
    use crate::types::EnumType;

    fn color() -> TypeTag {
        TypeTag::enumeration(EnumType::new("Color", [("Red", 1), ("Green", 2)]))
    }

    #[test]
    fn test_scalars_are_prepopulated() {
        let registry = ConverterRegistry::new();
        for ty in SCALAR_TYPES.iter() {
            assert!(registry.contains(ty), "{}", ty);
            assert_eq!(registry.get_converter(ty).unwrap().converted_type(), ty);
        }
        assert_eq!(registry.registered_types().len(), SCALAR_TYPES.len());
    }

    #[test]
    fn test_enum_converter_is_cached() {
        let registry = ConverterRegistry::new();
        let first = registry.get_converter(&color()).unwrap();
        let second = registry.get_converter(&color()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.contains(&color()));
    }

    #[test]
    fn test_nullable_int_is_native() {
        let registry = ConverterRegistry::new();
        let converter = registry
            .get_converter(&TypeTag::nullable(TypeTag::I32))
            .unwrap();
        assert!(converter.accepts_native_type());
        assert_eq!(converter.converted_type(), &TypeTag::nullable(TypeTag::I32));
    }

    #[test]
    fn test_nullable_enum_caches_both_levels() {
        let registry = ConverterRegistry::new();
        let nullable = TypeTag::nullable(color());
        let first = registry.get_converter(&nullable).unwrap();
        assert!(registry.contains(&color()));
        assert!(Arc::ptr_eq(&first, &registry.get_converter(&nullable).unwrap()));
    }

    #[test]
    fn test_unknown_types_fail() {
        let registry = ConverterRegistry::new();
        for ty in [
            TypeTag::Named("Customer".into()),
            TypeTag::nullable(TypeTag::String),
            TypeTag::nullable(TypeTag::Named("Customer".into())),
        ] {
            let err = registry.get_converter(&ty).unwrap_err();
            assert_eq!(err.kind(), ConversionErrorKind::UnsupportedType, "{}", ty);
        }
    }

    #[test]
    fn test_sequences_get_the_placeholder() {
        let registry = ConverterRegistry::new();
        let ty = TypeTag::sequence(TypeTag::String);
        let converter = registry.get_converter(&ty).unwrap();
        let err = converter
            .convert_from_external(&Default::default(), &"a".into())
            .unwrap_err();
        assert_eq!(err.kind(), ConversionErrorKind::UnsupportedType);
        assert!(!registry.contains(&ty));
    }

    #[test]
    fn test_register_replaces_and_serves_named_types() {
        let registry = ConverterRegistry::new();
        let ty = TypeTag::Named("Tags".into());
        registry.register(ty.clone(), Arc::new(StringConverter::new()));
        assert!(registry.get_converter(&ty).is_ok());

        let seq = TypeTag::sequence(TypeTag::String);
        let custom: Arc<dyn Converter> = Arc::new(StringConverter::new());
        registry.register(seq.clone(), Arc::clone(&custom));
        assert!(Arc::ptr_eq(&registry.get_converter(&seq).unwrap(), &custom));
    }

    #[test]
    fn test_concurrent_synthesis_yields_one_instance() {
        let registry = ConverterRegistry::new();
        let ty = TypeTag::nullable(color());
        let resolved: Vec<Arc<dyn Converter>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.get_converter(&ty).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for converter in &resolved[1..] {
            assert!(Arc::ptr_eq(&resolved[0], converter));
        }
    }

    #[test]
    fn test_global_is_shared() {
        let ty = TypeTag::enumeration(EnumType::new("GlobalProbe", [("A", 0)]));
        let first = ConverterRegistry::global().get_converter(&ty).unwrap();
        let second = ConverterRegistry::global().get_converter(&ty).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
