use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

pub type CellbindResult<T> = Result<T, CellbindError>;

/// Result of a single converter call.
pub type ConversionResult<T> = Result<T, ConversionError>;

#[derive(Error, Debug)]
pub enum CellbindError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

/// What went wrong during a conversion.
///
/// Every kind is a conversion failure; the kind only lets callers tell a
/// malformed date string apart from, say, an out-of-range number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionErrorKind {
    /// The raw value has no interpretation as the target type.
    InvalidValue,
    /// Text did not match any accepted format (date/time strings).
    Format,
    /// The value is numeric but does not fit the target type.
    Overflow,
    /// No converter exists for the requested type.
    UnsupportedType,
}

impl fmt::Display for ConversionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionErrorKind::InvalidValue => "invalid value",
            ConversionErrorKind::Format => "format",
            ConversionErrorKind::Overflow => "overflow",
            ConversionErrorKind::UnsupportedType => "unsupported type",
        };
        f.write_str(name)
    }
}

/// A raw cell value could not be interpreted as the target type, or the
/// target type has no converter.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ConversionError {
    kind: ConversionErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ConversionError {
    pub fn new(kind: ConversionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::InvalidValue, message)
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::Format, message)
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::Overflow, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::UnsupportedType, message)
    }

    /// Attach the low-level parse error that caused this failure.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ConversionErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A converter was constructed for a type it cannot handle.
///
/// This is a programming error rather than a data error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ArgumentError(pub String);

impl ArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
