//! CLI command handlers

pub mod commands;

pub use commands::{convert, convert_value, types, ConversionReport, ConvertOptions, RawKind};
