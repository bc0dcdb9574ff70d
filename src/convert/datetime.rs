//! Date/time converter
//!
//! Cells hold dates three ways: as a native date, as a spreadsheet serial
//! number (OLE Automation days since 1899-12-30, fraction = time of day), or
//! as text. Text is tried as ISO-8601 first, then through a culture-aware
//! tokenizer, and finally as a serial number written out in the culture's
//! number format. Empty cells and blank text read as [`DATE_ZERO`].

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ConversionError, ConversionResult};
use crate::policy::{ConversionPolicy, Culture, DateOrder, DateTimeStyles, NumberStyles};
use crate::types::{CellValue, TypeTag, TypedValue};

use super::numeric::parse_number;
use super::{default_from_external, default_to_external, Converter};

/// Value read from an empty date cell: 0001-01-01T00:00:00.
pub static DATE_ZERO: Lazy<NaiveDateTime> = Lazy::new(|| midnight(1, 1, 1));

static OLE_EPOCH: Lazy<NaiveDateTime> = Lazy::new(|| midnight(1899, 12, 30));

static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{1,2})(?::(\d{1,2})(?:[.,](\d{1,7}))?)?")
        .expect("valid time-of-day regex")
});

const MILLIS_PER_DAY: i64 = 86_400_000;
// Exclusive bounds of a valid serial (years 100 and 10000).
const MIN_SERIAL: f64 = -657_435.0;
const MAX_SERIAL: f64 = 2_958_466.0;

const ISO_OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];
const ISO_NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

// Fixed calendar dates are always valid.
fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_default()
        .and_time(NaiveTime::default())
}

/// Spreadsheet serial → date.
///
/// Rounds to the millisecond. For negative serials only the day part is
/// negative: `-1.25` is 1899-12-29 06:00.
pub fn from_serial(serial: f64) -> ConversionResult<NaiveDateTime> {
    if !(serial > MIN_SERIAL && serial < MAX_SERIAL) {
        return Err(ConversionError::overflow(format!(
            "{} is not a valid date serial; expected a value between {} and {}",
            serial, MIN_SERIAL, MAX_SERIAL
        )));
    }
    let half = if serial >= 0.0 { 0.5 } else { -0.5 };
    let mut millis = (serial * MILLIS_PER_DAY as f64 + half) as i64;
    if millis < 0 {
        millis -= (millis % MILLIS_PER_DAY) * 2;
    }
    Ok(*OLE_EPOCH + TimeDelta::milliseconds(millis))
}

/// Date → spreadsheet serial, the inverse of [`from_serial`].
pub fn to_serial(value: NaiveDateTime) -> f64 {
    let mut millis = (value - *OLE_EPOCH).num_milliseconds();
    if millis < 0 {
        let fraction = millis % MILLIS_PER_DAY;
        if fraction != 0 {
            millis -= (MILLIS_PER_DAY + fraction) * 2;
        }
    }
    millis as f64 / MILLIS_PER_DAY as f64
}

/// Parse date/time text under `culture` and `styles`.
pub fn parse_datetime(
    text: &str,
    culture: &Culture,
    styles: DateTimeStyles,
) -> ConversionResult<NaiveDateTime> {
    let trimmed = text.trim();
    // A plain number is a serial, ahead of the date tokenizer, so "3.5"
    // reads the same as the numeric cell 3.5.
    let value = if let Some(value) = parse_iso(trimmed, styles) {
        value
    } else if let Some(serial) = serial_text(trimmed, NumberStyles::FLOAT, culture) {
        from_serial(serial)?
    } else if let Some(value) = parse_culture_text(trimmed, culture, styles) {
        adjust_naive(value, styles)
    } else if let Some(serial) = serial_text(trimmed, NumberStyles::FLOAT_AND_THOUSANDS, culture) {
        from_serial(serial)?
    } else {
        return Err(ConversionError::format(format!(
            "String '{}' was not recognized as a valid date/time under culture '{}'",
            text,
            culture.name()
        )));
    };

    if value < *DATE_ZERO {
        return Err(ConversionError::format(format!(
            "String '{}' is before the earliest supported date {}",
            text, *DATE_ZERO
        )));
    }
    Ok(value)
}

fn serial_text(text: &str, styles: NumberStyles, culture: &Culture) -> Option<f64> {
    let serial = parse_number::<f64>(text, styles, culture)
        .ok()
        .filter(|v| v.is_finite())?;
    tracing::trace!(text, serial, "reading date text as a serial");
    Some(serial)
}

fn parse_iso(text: &str, styles: DateTimeStyles) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(adjust_offset(dt, styles));
    }
    for format in ISO_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(adjust_offset(dt, styles));
        }
    }
    ISO_NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|dt| adjust_naive(dt, styles))
}

fn adjust_offset(value: DateTime<FixedOffset>, styles: DateTimeStyles) -> NaiveDateTime {
    if styles.contains(DateTimeStyles::ADJUST_TO_UNIVERSAL) {
        value.naive_utc()
    } else {
        value.with_timezone(&Local).naive_local()
    }
}

fn adjust_naive(value: NaiveDateTime, styles: DateTimeStyles) -> NaiveDateTime {
    let adjust = styles.contains(DateTimeStyles::ADJUST_TO_UNIVERSAL);
    if styles.contains(DateTimeStyles::ASSUME_UNIVERSAL) {
        if adjust {
            value
        } else {
            value.and_utc().with_timezone(&Local).naive_local()
        }
    } else if styles.contains(DateTimeStyles::ASSUME_LOCAL) && adjust {
        Local
            .from_local_datetime(&value)
            .earliest()
            .map_or(value, |local| local.naive_utc())
    } else {
        value
    }
}

/// Date text in the culture's own shape, e.g. `05.03.2024 14:07`,
/// `March 5, 2024 2:07 PM` or `5/3/24`.
fn parse_culture_text(
    text: &str,
    culture: &Culture,
    styles: DateTimeStyles,
) -> Option<NaiveDateTime> {
    let mut work = text.to_lowercase();
    let meridiem = take_meridiem(&mut work, culture);
    let time = take_time(&mut work, meridiem)?;

    let mut numbers: Vec<&str> = Vec::new();
    let mut month = None;
    let separators = |c: char| {
        c.is_whitespace() || matches!(c, '/' | '-' | '.' | ',') || c == culture.date_separator
    };
    for token in work.split(separators).filter(|t| !t.is_empty()) {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            if token.len() > 4 {
                return None;
            }
            numbers.push(token);
        } else if let Some(m) = culture.month_from_name(token).filter(|_| month.is_none()) {
            month = Some(m);
        } else if !culture.is_day_name(token) {
            return None;
        }
    }

    let date = if numbers.is_empty() && month.is_none() {
        if time.is_none() {
            return None;
        }
        if styles.contains(DateTimeStyles::NO_CURRENT_DATE_DEFAULT) {
            DATE_ZERO.date()
        } else {
            Local::now().date_naive()
        }
    } else {
        resolve_date(&numbers, month, culture.date_order)?
    };
    Some(date.and_time(time.unwrap_or_default()))
}

// Removes the first AM/PM designator standing on its own; true means PM.
fn take_meridiem(work: &mut String, culture: &Culture) -> Option<bool> {
    for (designator, pm) in culture.meridiem_designators() {
        let needle = designator.to_lowercase();
        let mut from = 0;
        while let Some(pos) = work[from..].find(&needle) {
            let start = from + pos;
            let end = start + needle.len();
            let before = work[..start].chars().next_back();
            let after = work[end..].chars().next();
            if !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic) {
                work.replace_range(start..end, " ");
                return Some(pm);
            }
            from = end;
        }
    }
    None
}

// Outer None: malformed time. Inner None: no time in the text.
fn take_time(work: &mut String, meridiem: Option<bool>) -> Option<Option<NaiveTime>> {
    let Some(caps) = TIME_OF_DAY.captures(work.as_str()) else {
        return meridiem.is_none().then_some(None);
    };
    let field = |i: usize| caps.get(i).map_or(Some(0), |m| m.as_str().parse::<u32>().ok());
    let mut hour = field(1)?;
    let minute = field(2)?;
    let second = field(3)?;
    let nanos = match caps.get(4) {
        Some(m) => format!("{:0<9}", m.as_str()).parse::<u32>().ok()?,
        None => 0,
    };

    match meridiem {
        Some(_) if hour > 12 => return None,
        Some(true) if hour < 12 => hour += 12,
        Some(false) if hour == 12 => hour = 0,
        _ => {}
    }

    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
    let range = caps.get(0)?.range();
    work.replace_range(range, " ");
    Some(Some(time))
}

fn resolve_date(numbers: &[&str], month: Option<u32>, order: DateOrder) -> Option<NaiveDate> {
    fn value(token: &str) -> Option<u32> {
        token.parse().ok()
    }
    fn is_year(token: &str) -> bool {
        token.len() >= 3 || value(token).is_some_and(|v| v > 31)
    }
    let current_year = || Local::now().year();

    let (year, month, day) = match (numbers, month) {
        ([only], Some(m)) if is_year(only) => (year_of(only)?, m, 1),
        ([day], Some(m)) => (current_year(), m, value(day)?),
        ([a, b], Some(m)) if is_year(a) => (year_of(a)?, m, value(b)?),
        ([a, b], Some(m)) => (year_of(b)?, m, value(a)?),
        ([a, b, c], None) if a.len() >= 3 => (year_of(a)?, value(b)?, value(c)?),
        ([a, b, c], None) => match order {
            DateOrder::MonthDayYear => (year_of(c)?, value(a)?, value(b)?),
            DateOrder::DayMonthYear => (year_of(c)?, value(b)?, value(a)?),
            DateOrder::YearMonthDay => (year_of(a)?, value(b)?, value(c)?),
        },
        ([a, b], None) if is_year(a) => (year_of(a)?, value(b)?, 1),
        ([a, b], None) if is_year(b) => (year_of(b)?, value(a)?, 1),
        ([a, b], None) => match order {
            DateOrder::DayMonthYear => (current_year(), value(b)?, value(a)?),
            _ => (current_year(), value(a)?, value(b)?),
        },
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

// Two-digit years pivot at 2049.
fn year_of(token: &str) -> Option<i32> {
    let year: i32 = token.parse().ok()?;
    Some(match token.len() {
        1 | 2 if year < 50 => 2000 + year,
        1 | 2 => 1900 + year,
        _ if year < 1 => return None,
        _ => year,
    })
}

#[derive(Debug)]
pub struct DateTimeConverter {
    ty: TypeTag,
}

impl DateTimeConverter {
    pub fn new() -> Self {
        Self {
            ty: TypeTag::DateTime,
        }
    }
}

impl Default for DateTimeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for DateTimeConverter {
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
        policy: &ConversionPolicy,
        raw: &CellValue,
    ) -> ConversionResult<TypedValue> {
        let value = match raw {
            CellValue::Number(serial) => from_serial(*serial)?,
            CellValue::DateTime(dt) => *dt,
            CellValue::Empty => *DATE_ZERO,
            CellValue::String(text) if text.trim().is_empty() => *DATE_ZERO,
            CellValue::String(text) => parse_datetime(text, policy.culture, policy.date_styles)?,
            other => return default_from_external(&self.ty, other),
        };
        Ok(TypedValue::DateTime(value))
    }

    fn display_format<'p>(&self, policy: &'p ConversionPolicy) -> Option<&'p str> {
        policy.date_format.as_deref()
    }
}
