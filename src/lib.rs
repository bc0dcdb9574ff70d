//! Cellbind - typed spreadsheet cell binding
//!
//! This library converts between raw spreadsheet cell values and strongly
//! typed property values, honouring a per-column conversion policy
//! (culture, number and date styles, boolean tokens).
//!
//! # Features
//!
//! - Converters for booleans, every integer width, floats, decimals, chars,
//!   strings, dates (including spreadsheet serials), durations and GUIDs
//! - Enum and nullable converters synthesized on demand
//! - A thread-safe, process-wide converter registry
//! - Culture-aware number and date parsing
//! - Layered policies loaded from YAML binding configurations
//!
//! # Example
//!
//! ```
//! use cellbind::policy::{ConversionPolicy, DE_DE};
//! use cellbind::registry::ConverterRegistry;
//! use cellbind::types::{CellValue, TypeTag, TypedValue};
//!
//! let policy = ConversionPolicy::default().with_culture(&DE_DE);
//! let converter = ConverterRegistry::global().get_converter(&TypeTag::nullable(TypeTag::F64))?;
//!
//! let value = converter.convert_from_external(&policy, &CellValue::from("1.234,5"))?;
//! assert_eq!(value, TypedValue::F64(1234.5));
//!
//! let empty = converter.convert_from_external(&policy, &CellValue::Empty)?;
//! assert!(empty.is_null());
//! # Ok::<(), cellbind::error::ConversionError>(())
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod policy;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use config::BindingConfig;
pub use convert::Converter;
pub use error::{
    ArgumentError, CellbindError, CellbindResult, ConversionError, ConversionErrorKind,
    ConversionResult,
};
pub use policy::{ConversionPolicy, Culture, DateTimeStyles, NumberStyles, PolicyLayer};
pub use registry::ConverterRegistry;
pub use types::{CellValue, EnumType, EnumValue, TypeTag, TypedValue};
