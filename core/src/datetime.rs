//! Wire codecs for the three date formats used by RMS.
//!
//! # Design
//! RMS speaks Japan Standard Time only. Timestamps travel as
//! `YYYY-MM-DDThh:mm:ss+0900` where `+0900` is a literal suffix, not a zone
//! the codec negotiates: encoding appends it to the wall-clock fields and
//! decoding requires and strips it. Values are therefore held as
//! `NaiveDateTime` / `NaiveDate` and never converted between zones.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Literal zone suffix appended to every timestamp.
pub const JST_SUFFIX: &str = "+0900";

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

const JST_OFFSET_SECONDS: i32 = 9 * 3600;

/// A string did not match the expected wire pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {pattern}, got {input:?}")]
pub struct FormatError {
    pub pattern: &'static str,
    pub input: String,
}

impl FormatError {
    fn new(pattern: &'static str, input: &str) -> Self {
        Self {
            pattern,
            input: input.to_string(),
        }
    }
}

/// Format a wall-clock time as `YYYY-MM-DDThh:mm:ss+0900`. Sub-second
/// precision is dropped.
pub fn encode_datetime(value: &NaiveDateTime) -> String {
    format!("{}{JST_SUFFIX}", value.format(DATETIME_FORMAT))
}

/// Parse `YYYY-MM-DDThh:mm:ss+0900`. Any other suffix is rejected.
pub fn decode_datetime(input: &str) -> Result<NaiveDateTime, FormatError> {
    const PATTERN: &str = "YYYY-MM-DDThh:mm:ss+0900";
    let body = input
        .strip_suffix(JST_SUFFIX)
        .filter(|body| body.len() == 19)
        .ok_or_else(|| FormatError::new(PATTERN, input))?;
    NaiveDateTime::parse_from_str(body, DATETIME_FORMAT).map_err(|_| FormatError::new(PATTERN, input))
}

pub fn encode_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parse `YYYY-MM-DD`.
pub fn decode_date(input: &str) -> Result<NaiveDate, FormatError> {
    const PATTERN: &str = "YYYY-MM-DD";
    if input.len() != 10 {
        return Err(FormatError::new(PATTERN, input));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| FormatError::new(PATTERN, input))
}

/// Parse the separator-less `YYYYMMDD` form used inside calendar XML.
pub fn decode_compact_date(input: &str) -> Result<NaiveDate, FormatError> {
    const PATTERN: &str = "YYYYMMDD";
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::new(PATTERN, input));
    }
    NaiveDate::parse_from_str(input, COMPACT_DATE_FORMAT).map_err(|_| FormatError::new(PATTERN, input))
}

/// Timestamp in the fixed +09:00 representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonTime(NaiveDateTime);

impl JsonTime {
    /// Wrap a wall-clock value, truncated to whole seconds.
    pub fn new(value: NaiveDateTime) -> Self {
        Self(value.with_nanosecond(0).unwrap_or(value))
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// The same wall-clock time, anchored at +09:00.
    pub fn to_fixed_offset(&self) -> DateTime<FixedOffset> {
        let jst = FixedOffset::east_opt(JST_OFFSET_SECONDS).expect("+09:00 is a valid offset");
        DateTime::from_naive_utc_and_offset(self.0 - jst, jst)
    }
}

impl From<NaiveDateTime> for JsonTime {
    fn from(value: NaiveDateTime) -> Self {
        Self::new(value)
    }
}

/// Keeps the local wall-clock fields of `value`; no zone conversion happens.
impl<Tz: TimeZone> From<DateTime<Tz>> for JsonTime {
    fn from(value: DateTime<Tz>) -> Self {
        Self::new(value.naive_local())
    }
}

impl fmt::Display for JsonTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_datetime(&self.0))
    }
}

impl FromStr for JsonTime {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_datetime(s).map(Self)
    }
}

impl Serialize for JsonTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_datetime(&self.0))
    }
}

impl<'de> Deserialize<'de> for JsonTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Calendar date, `YYYY-MM-DD` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonDate(NaiveDate);

impl JsonDate {
    pub fn new(value: NaiveDate) -> Self {
        Self(value)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for JsonDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl fmt::Display for JsonDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_date(&self.0))
    }
}

impl FromStr for JsonDate {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_date(s).map(Self)
    }
}

impl Serialize for JsonDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_date(&self.0))
    }
}

impl<'de> Deserialize<'de> for JsonDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
