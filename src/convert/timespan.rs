//! Duration converter
//!
//! Durations are written as text in the constant `[-][d.]hh:mm:ss[.fffffff]`
//! form. Reading accepts a native duration, a date cell (day-of-year plus
//! time of day, for engines that keep durations as dates) or text.

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};

use crate::error::{ConversionError, ConversionResult};
use crate::policy::{ConversionPolicy, Culture};
use crate::types::{CellValue, TypeTag, TypedValue};

use super::{default_from_external, default_to_external, Converter};

const SECONDS_PER_DAY: i64 = 86_400;
const NANOS_PER_TICK: u32 = 100;
const MAX_DAYS: i64 = 10_675_199;

/// Render a duration as `[-][d.]hh:mm:ss[.fffffff]`.
pub fn format_timespan(duration: TimeDelta) -> String {
    let negative = duration < TimeDelta::zero();
    let magnitude = duration.abs();
    let total = magnitude.num_seconds();
    let ticks = magnitude.subsec_nanos().unsigned_abs() / NANOS_PER_TICK;

    let days = total / SECONDS_PER_DAY;
    let hours = (total % SECONDS_PER_DAY) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if ticks > 0 {
        out.push_str(&format!(".{:07}", ticks));
    }
    out
}

/// Parse duration text.
///
/// Accepted shapes: `d`, `hh:mm`, `hh:mm:ss`, `d.hh:mm[:ss]`, `d:hh:mm:ss`,
/// each with an optional leading `-` and an optional fraction of a second
/// after `.` or the culture's decimal separator.
pub fn parse_timespan(text: &str, culture: &Culture) -> ConversionResult<TimeDelta> {
    let invalid = || {
        ConversionError::format(format!(
            "'{}' is not a valid duration; expected [-][d.]hh:mm[:ss[.fffffff]]",
            text
        ))
    };

    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return Err(invalid());
    }

    let segments: Vec<&str> = body.split(':').collect();
    let (days, hours, minutes, seconds) = match segments.as_slice() {
        [days] => (number(days).ok_or_else(invalid)?, 0, 0, "0"),
        [head, minutes] => {
            let (days, hours) = split_days(head).ok_or_else(invalid)?;
            (days, hours, number(minutes).ok_or_else(invalid)?, "0")
        }
        [head, minutes, seconds] => {
            let (days, hours) = split_days(head).ok_or_else(invalid)?;
            (days, hours, number(minutes).ok_or_else(invalid)?, *seconds)
        }
        [days, hours, minutes, seconds] => (
            number(days).ok_or_else(invalid)?,
            number(hours).ok_or_else(invalid)?,
            number(minutes).ok_or_else(invalid)?,
            *seconds,
        ),
        _ => return Err(invalid()),
    };
    let (seconds, nanos) = split_fraction(seconds, culture).ok_or_else(invalid)?;

    if days > MAX_DAYS || hours >= 24 || minutes >= 60 || seconds >= 60 {
        return Err(ConversionError::overflow(format!(
            "'{}' has a duration component out of range",
            text
        )));
    }

    let total = days * SECONDS_PER_DAY + hours * 3_600 + minutes * 60 + seconds;
    let duration = TimeDelta::new(total, nanos).ok_or_else(invalid)?;
    Ok(if negative { -duration } else { duration })
}

fn number(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

// `d.hh` or `hh`
fn split_days(head: &str) -> Option<(i64, i64)> {
    match head.split_once('.') {
        Some((days, hours)) => Some((number(days)?, number(hours)?)),
        None => Some((0, number(head)?)),
    }
}

// `ss`, `ss.fffffff` or `ss,fffffff` under a comma-decimal culture
fn split_fraction(segment: &str, culture: &Culture) -> Option<(i64, u32)> {
    let split = segment
        .split_once('.')
        .or_else(|| segment.split_once(culture.decimal_separator));
    let Some((seconds, fraction)) = split else {
        return Some((number(segment)?, 0));
    };
    if fraction.is_empty() || fraction.len() > 7 || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let ticks: u32 = format!("{:0<7}", fraction).parse().ok()?;
    Some((number(seconds)?, ticks * NANOS_PER_TICK))
}

/// Day-of-year and time of day of a date cell, read as a duration.
fn from_date_cell(dt: &NaiveDateTime) -> TimeDelta {
    TimeDelta::days(i64::from(dt.ordinal()))
        + TimeDelta::hours(i64::from(dt.hour()))
        + TimeDelta::minutes(i64::from(dt.minute()))
        + TimeDelta::seconds(i64::from(dt.second()))
        + TimeDelta::milliseconds(i64::from(dt.nanosecond() / 1_000_000))
}

#[derive(Debug)]
pub struct TimeSpanConverter {
    ty: TypeTag,
}

impl TimeSpanConverter {
    pub fn new() -> Self {
        Self {
            ty: TypeTag::TimeSpan,
        }
    }
}

impl Default for TimeSpanConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for TimeSpanConverter {
    fn converted_type(&self) -> &TypeTag {
        &self.ty
    }

    fn accepts_native_type(&self) -> bool {
        false
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
        match raw {
            CellValue::Duration(duration) => Ok(TypedValue::TimeSpan(*duration)),
            CellValue::DateTime(dt) => Ok(TypedValue::TimeSpan(from_date_cell(dt))),
            CellValue::String(text) => parse_timespan(text, policy.culture).map(TypedValue::TimeSpan),
            other => default_from_external(&self.ty, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionErrorKind;
    use crate::policy::{DE_DE, INVARIANT};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn hms(h: i64, m: i64, s: i64) -> TimeDelta {
        TimeDelta::hours(h) + TimeDelta::minutes(m) + TimeDelta::seconds(s)
    }

    #[test]
    fn test_format_constant_form() {
        assert_eq!(format_timespan(hms(1, 2, 3)), "01:02:03");
        assert_eq!(format_timespan(TimeDelta::days(2) + hms(3, 0, 0)), "2.03:00:00");
        assert_eq!(format_timespan(-hms(0, 30, 0)), "-00:30:00");
        assert_eq!(
            format_timespan(TimeDelta::seconds(1) + TimeDelta::milliseconds(500)),
            "00:00:01.5000000"
        );
        assert_eq!(format_timespan(TimeDelta::zero()), "00:00:00");
    }

    #[test]
    fn test_parse_shapes() {
        assert_eq!(parse_timespan("3", &INVARIANT).unwrap(), TimeDelta::days(3));
        assert_eq!(parse_timespan("01:30", &INVARIANT).unwrap(), hms(1, 30, 0));
        assert_eq!(parse_timespan(" 01:30:15 ", &INVARIANT).unwrap(), hms(1, 30, 15));
        assert_eq!(
            parse_timespan("1.02:03:04", &INVARIANT).unwrap(),
            TimeDelta::days(1) + hms(2, 3, 4)
        );
        assert_eq!(
            parse_timespan("1:02:03:04", &INVARIANT).unwrap(),
            TimeDelta::days(1) + hms(2, 3, 4)
        );
        assert_eq!(parse_timespan("-00:00:05", &INVARIANT).unwrap(), -TimeDelta::seconds(5));
    }

    #[test]
    fn test_parse_fractions() {
        assert_eq!(
            parse_timespan("00:00:01.25", &INVARIANT).unwrap(),
            TimeDelta::milliseconds(1250)
        );
        assert_eq!(
            parse_timespan("00:00:01,5", &DE_DE).unwrap(),
            TimeDelta::milliseconds(1500)
        );
        assert!(parse_timespan("00:00:01.12345678", &INVARIANT).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_text() {
        for text in ["", "-", "abc", "1:2:3:4:5", "01:xx", "1.5"] {
            let err = parse_timespan(text, &INVARIANT).unwrap_err();
            assert_eq!(err.kind(), ConversionErrorKind::Format, "{text}");
        }
        let err = parse_timespan("25:00", &INVARIANT).unwrap_err();
        assert_eq!(err.kind(), ConversionErrorKind::Overflow);
        assert!(parse_timespan("00:60:00", &INVARIANT).is_err());
    }

    #[test]
    fn test_format_then_parse_agrees() {
        let value = TimeDelta::days(12) + hms(23, 59, 58) + TimeDelta::microseconds(1234);
        assert_eq!(parse_timespan(&format_timespan(value), &INVARIANT).unwrap(), value);
    }

    #[test]
    fn test_converter_sources() {
        let policy = ConversionPolicy::default();
        let converter = TimeSpanConverter::new();
        assert!(!converter.accepts_native_type());

        assert_eq!(
            converter
                .convert_from_external(&policy, &CellValue::Duration(hms(0, 5, 0)))
                .unwrap(),
            TypedValue::TimeSpan(hms(0, 5, 0))
        );

        let dt = NaiveDate::from_ymd_opt(1900, 1, 2)
            .unwrap()
            .and_hms_milli_opt(4, 5, 6, 7)
            .unwrap();
        assert_eq!(
            converter
                .convert_from_external(&policy, &CellValue::DateTime(dt))
                .unwrap(),
            TypedValue::TimeSpan(TimeDelta::days(2) + hms(4, 5, 6) + TimeDelta::milliseconds(7))
        );

        assert_eq!(
            converter
                .convert_from_external(&policy, &"02:00:00".into())
                .unwrap(),
            TypedValue::TimeSpan(hms(2, 0, 0))
        );
    }

    #[test]
    fn test_converter_rejects_null_and_numbers() {
        let policy = ConversionPolicy::default();
        let converter = TimeSpanConverter::new();
        assert!(converter.convert_from_external(&policy, &CellValue::Empty).is_err());
        assert!(converter
            .convert_from_external(&policy, &CellValue::Number(1.0))
            .is_err());
    }

    #[test]
    fn test_to_external_is_text() {
        let policy = ConversionPolicy::default();
        assert_eq!(
            TimeSpanConverter::new()
                .convert_to_external(&policy, &TypedValue::TimeSpan(hms(1, 0, 0)))
                .unwrap(),
            CellValue::String("01:00:00".into())
        );
    }
}
