use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ArgumentError;

//==============================================================================
// Type identity
//==============================================================================

/// Identity of a property type that a converter produces and consumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    U8,
    I8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    Char,
    String,
    DateTime,
    TimeSpan,
    Guid,
    /// An enumeration with named ordinals
    Enum(Arc<EnumType>),
    /// Optional value type (`T?`)
    Nullable(Box<TypeTag>),
    /// Sequence/collection of `T` (`T[]`)
    Sequence(Box<TypeTag>),
    /// A caller-defined type; resolves only through explicit registration
    Named(String),
}

/// Built-in scalar tags, in registration order.
pub const SCALAR_TYPES: [TypeTag; 17] = [
    TypeTag::Bool,
    TypeTag::U8,
    TypeTag::I8,
    TypeTag::I16,
    TypeTag::U16,
    TypeTag::I32,
    TypeTag::U32,
    TypeTag::I64,
    TypeTag::U64,
    TypeTag::F32,
    TypeTag::F64,
    TypeTag::Decimal,
    TypeTag::Char,
    TypeTag::String,
    TypeTag::DateTime,
    TypeTag::TimeSpan,
    TypeTag::Guid,
];

impl TypeTag {
    pub fn nullable(inner: TypeTag) -> Self {
        TypeTag::Nullable(Box::new(inner))
    }

    pub fn sequence(item: TypeTag) -> Self {
        TypeTag::Sequence(Box::new(item))
    }

    pub fn enumeration(ty: EnumType) -> Self {
        TypeTag::Enum(Arc::new(ty))
    }

    /// Value types can be wrapped in `Nullable`.
    pub fn is_value_type(&self) -> bool {
        !matches!(
            self,
            TypeTag::String | TypeTag::Nullable(_) | TypeTag::Sequence(_) | TypeTag::Named(_)
        )
    }

    /// True for `Nullable(T)` where `T` is a value type.
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeTag::Nullable(inner) => inner.is_value_type(),
            _ => false,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, TypeTag::Enum(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, TypeTag::Sequence(_))
    }

    pub fn is_scalar(&self) -> bool {
        SCALAR_TYPES.contains(self)
    }

    /// Parse a type name, resolving non-builtin identifiers through `lookup_enum`.
    ///
    /// Accepts `T?`, `Option<T>`, `T[]` and `Vec<T>` wrappers. Identifiers that
    /// are neither builtin nor a known enum become [`TypeTag::Named`].
    pub fn parse_with<F>(name: &str, lookup_enum: &F) -> Result<Self, ArgumentError>
    where
        F: Fn(&str) -> Option<Arc<EnumType>>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(ArgumentError::new("type name is empty"));
        }

        if let Some(inner) = name.strip_suffix('?') {
            return Ok(TypeTag::nullable(Self::parse_with(inner, lookup_enum)?));
        }
        if let Some(inner) = name.strip_suffix("[]") {
            return Ok(TypeTag::sequence(Self::parse_with(inner, lookup_enum)?));
        }
        if let Some(inner) = strip_generic(name, "Option") {
            return Ok(TypeTag::nullable(Self::parse_with(inner, lookup_enum)?));
        }
        if let Some(inner) = strip_generic(name, "Vec") {
            return Ok(TypeTag::sequence(Self::parse_with(inner, lookup_enum)?));
        }

        if let Some(tag) = builtin_alias(name) {
            return Ok(tag);
        }
        if let Some(ty) = lookup_enum(name) {
            return Ok(TypeTag::Enum(ty));
        }
        if name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
            return Ok(TypeTag::Named(name.to_string()));
        }
        Err(ArgumentError::new(format!("'{}' is not a valid type name", name)))
    }
}

fn strip_generic<'a>(name: &'a str, wrapper: &str) -> Option<&'a str> {
    name.strip_prefix(wrapper)?
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

fn builtin_alias(name: &str) -> Option<TypeTag> {
    let tag = match name.to_ascii_lowercase().as_str() {
        "bool" | "boolean" => TypeTag::Bool,
        "u8" | "byte" => TypeTag::U8,
        "i8" | "sbyte" => TypeTag::I8,
        "i16" | "short" | "int16" => TypeTag::I16,
        "u16" | "ushort" | "uint16" => TypeTag::U16,
        "i32" | "int" | "int32" => TypeTag::I32,
        "u32" | "uint" | "uint32" => TypeTag::U32,
        "i64" | "long" | "int64" => TypeTag::I64,
        "u64" | "ulong" | "uint64" => TypeTag::U64,
        "f32" | "float" | "single" => TypeTag::F32,
        "f64" | "double" => TypeTag::F64,
        "decimal" => TypeTag::Decimal,
        "char" => TypeTag::Char,
        "string" | "str" => TypeTag::String,
        "datetime" | "date" => TypeTag::DateTime,
        "timespan" | "duration" => TypeTag::TimeSpan,
        "guid" | "uuid" => TypeTag::Guid,
        _ => return None,
    };
    Some(tag)
}

impl FromStr for TypeTag {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, &|_| None)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::I8 => f.write_str("i8"),
            TypeTag::I16 => f.write_str("i16"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::I32 => f.write_str("i32"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::I64 => f.write_str("i64"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::F32 => f.write_str("f32"),
            TypeTag::F64 => f.write_str("f64"),
            TypeTag::Decimal => f.write_str("decimal"),
            TypeTag::Char => f.write_str("char"),
            TypeTag::String => f.write_str("string"),
            TypeTag::DateTime => f.write_str("datetime"),
            TypeTag::TimeSpan => f.write_str("timespan"),
            TypeTag::Guid => f.write_str("guid"),
            TypeTag::Enum(ty) => f.write_str(ty.name()),
            TypeTag::Nullable(inner) => write!(f, "{}?", inner),
            TypeTag::Sequence(item) => write!(f, "{}[]", item),
            TypeTag::Named(name) => f.write_str(name),
        }
    }
}

//==============================================================================
// Enumerations
//==============================================================================

/// Description of an enumeration: its name and `(name, ordinal)` members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: String,
    variants: Vec<(String, i64)>,
    flags: bool,
}

impl EnumType {
    pub fn new<N, I, S>(name: N, variants: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants
                .into_iter()
                .map(|(variant, value)| (variant.into(), value))
                .collect(),
            flags: false,
        }
    }

    /// Mark the enumeration as a bit-flag set (values may be combined).
    pub fn with_flags(mut self, flags: bool) -> Self {
        self.flags = flags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[(String, i64)] {
        &self.variants
    }

    pub fn is_flags(&self) -> bool {
        self.flags
    }

    /// Case-insensitive member lookup by name.
    pub fn value_of(&self, name: &str) -> Option<i64> {
        let name = name.to_lowercase();
        self.variants
            .iter()
            .find(|(variant, _)| variant.to_lowercase() == name)
            .map(|(_, value)| *value)
    }

    /// Name of the first member with exactly this ordinal.
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.variants
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(variant, _)| variant.as_str())
    }
}

/// A value of an [`EnumType`]. The ordinal does not have to name a member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub ty: Arc<EnumType>,
    pub value: i64,
}

impl EnumValue {
    pub fn new(ty: Arc<EnumType>, value: i64) -> Self {
        Self { ty, value }
    }

    /// Symbolic form: the member name, a `"A, B"` combination for flags
    /// enums, or the bare ordinal when nothing matches.
    pub fn name(&self) -> String {
        if let Some(name) = self.ty.name_of(self.value) {
            return name.to_string();
        }
        if self.ty.is_flags() && self.value > 0 {
            let mut remaining = self.value;
            let mut parts = Vec::new();
            for (variant, bits) in self.ty.variants() {
                if *bits != 0 && remaining & bits == *bits {
                    parts.push(variant.as_str());
                    remaining &= !bits;
                }
            }
            if remaining == 0 && !parts.is_empty() {
                return parts.join(", ");
            }
        }
        self.value.to_string()
    }
}

//==============================================================================
// Raw cell values
//==============================================================================

/// A value as read from, or written to, a spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent / blank cell
    #[default]
    Empty,
    String(String),
    /// Every number is stored as a double
    Number(f64),
    Bool(bool),
    /// Native date cell
    DateTime(NaiveDateTime),
    /// Native duration cell, for engines that have one
    Duration(TimeDelta),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the storage type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "Empty",
            CellValue::String(_) => "String",
            CellValue::Number(_) => "Number",
            CellValue::Bool(_) => "Boolean",
            CellValue::DateTime(_) => "DateTime",
            CellValue::Duration(_) => "Duration",
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            CellValue::Duration(d) => f.write_str(&crate::convert::timespan::format_timespan(*d)),
        }
    }
}

//==============================================================================
// Typed values
//==============================================================================

/// A strongly-typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Bool(bool),
    U8(u8),
    I8(i8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Char(char),
    String(String),
    DateTime(NaiveDateTime),
    TimeSpan(TimeDelta),
    Guid(Uuid),
    Enum(EnumValue),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Null => "null",
            TypedValue::Bool(_) => "bool",
            TypedValue::U8(_) => "u8",
            TypedValue::I8(_) => "i8",
            TypedValue::I16(_) => "i16",
            TypedValue::U16(_) => "u16",
            TypedValue::I32(_) => "i32",
            TypedValue::U32(_) => "u32",
            TypedValue::I64(_) => "i64",
            TypedValue::U64(_) => "u64",
            TypedValue::F32(_) => "f32",
            TypedValue::F64(_) => "f64",
            TypedValue::Decimal(_) => "decimal",
            TypedValue::Char(_) => "char",
            TypedValue::String(_) => "string",
            TypedValue::DateTime(_) => "datetime",
            TypedValue::TimeSpan(_) => "timespan",
            TypedValue::Guid(_) => "guid",
            TypedValue::Enum(_) => "enum",
        }
    }

    /// The value in the shape a cell stores natively, without stringification.
    pub fn to_native_cell(&self) -> CellValue {
        match self {
            TypedValue::Null => CellValue::Empty,
            TypedValue::Bool(b) => CellValue::Bool(*b),
            TypedValue::U8(v) => CellValue::Number(f64::from(*v)),
            TypedValue::I8(v) => CellValue::Number(f64::from(*v)),
            TypedValue::I16(v) => CellValue::Number(f64::from(*v)),
            TypedValue::U16(v) => CellValue::Number(f64::from(*v)),
            TypedValue::I32(v) => CellValue::Number(f64::from(*v)),
            TypedValue::U32(v) => CellValue::Number(f64::from(*v)),
            TypedValue::I64(v) => CellValue::Number(*v as f64),
            TypedValue::U64(v) => CellValue::Number(*v as f64),
            TypedValue::F32(v) => CellValue::Number(f64::from(*v)),
            TypedValue::F64(v) => CellValue::Number(*v),
            TypedValue::Decimal(d) => CellValue::Number(d.to_f64().unwrap_or(f64::NAN)),
            TypedValue::Char(c) => CellValue::String(c.to_string()),
            TypedValue::String(s) => CellValue::String(s.clone()),
            TypedValue::DateTime(dt) => CellValue::DateTime(*dt),
            TypedValue::TimeSpan(d) => CellValue::Duration(*d),
            TypedValue::Guid(g) => CellValue::String(g.hyphenated().to_string()),
            TypedValue::Enum(e) => CellValue::String(e.name()),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = crate::convert::render_text(self, crate::policy::Culture::invariant());
        f.write_str(text.as_deref().unwrap_or(""))
    }
}
