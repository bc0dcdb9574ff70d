//! Default textual forms of typed and raw values.

use crate::policy::Culture;
use crate::types::{CellValue, TypedValue};

use super::timespan::format_timespan;

/// Text form of a typed value under `culture`; `None` for null.
pub fn render_text(value: &TypedValue, culture: &Culture) -> Option<String> {
    let text = match value {
        TypedValue::Null => return None,
        TypedValue::Bool(b) => render_bool(*b).to_string(),
        TypedValue::U8(v) => v.to_string(),
        TypedValue::I8(v) => v.to_string(),
        TypedValue::I16(v) => v.to_string(),
        TypedValue::U16(v) => v.to_string(),
        TypedValue::I32(v) => v.to_string(),
        TypedValue::U32(v) => v.to_string(),
        TypedValue::I64(v) => v.to_string(),
        TypedValue::U64(v) => v.to_string(),
        TypedValue::F32(v) => render_float(f64::from(*v), v.to_string(), culture),
        TypedValue::F64(v) => render_float(*v, v.to_string(), culture),
        TypedValue::Decimal(d) => localize_point(d.to_string(), culture),
        TypedValue::Char(c) => c.to_string(),
        TypedValue::String(s) => s.clone(),
        TypedValue::DateTime(dt) => dt.format(culture.datetime_pattern).to_string(),
        TypedValue::TimeSpan(d) => format_timespan(*d),
        TypedValue::Guid(g) => g.hyphenated().to_string(),
        TypedValue::Enum(e) => e.name(),
    };
    Some(text)
}

/// Text form of a raw cell value under `culture`; `None` for an empty cell.
pub fn render_cell_text(raw: &CellValue, culture: &Culture) -> Option<String> {
    let text = match raw {
        CellValue::Empty => return None,
        CellValue::String(s) => s.clone(),
        CellValue::Number(v) => render_float(*v, v.to_string(), culture),
        CellValue::Bool(b) => render_bool(*b).to_string(),
        CellValue::DateTime(dt) => dt.format(culture.datetime_pattern).to_string(),
        CellValue::Duration(d) => format_timespan(*d),
    };
    Some(text)
}

fn render_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

// `shortest` is the shortest round-trip form at the value's own precision.
fn render_float(value: f64, shortest: String, culture: &Culture) -> String {
    if value.is_nan() {
        culture.nan_symbol.to_string()
    } else if value == f64::INFINITY {
        culture.positive_infinity_symbol.to_string()
    } else if value == f64::NEG_INFINITY {
        culture.negative_infinity_symbol.to_string()
    } else {
        localize_point(shortest, culture)
    }
}

fn localize_point(text: String, culture: &Culture) -> String {
    if culture.decimal_separator == '.' {
        text
    } else {
        text.replace('.', &culture.decimal_separator.to_string())
    }
}
