//! Publish date parsing and locale-aware formatting.
//!
//! Posts keep their publish date as ISO-8601 text. It is parsed only when a
//! page or card is rendered, so a malformed date surfaces as a render error
//! for the post that carries it.

use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date parsing and locale errors.
#[derive(Debug, Error)]
pub enum DateError {
    /// The input is not an ISO-8601 date or date-time.
    #[error("invalid ISO-8601 date `{input}`: {source}")]
    InvalidIso {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The locale tag is not one of the supported date locales.
    #[error("unknown date locale `{0}`")]
    UnknownLocale(String),
}

/// Result type for date operations.
pub type Result<T> = std::result::Result<T, DateError>;

/// Local date-time layouts accepted when no UTC offset is present.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO-8601 date.
///
/// Accepts RFC 3339 timestamps (`2023-05-01T00:00:00.000Z`), local
/// date-times without an offset (`2023-05-01T08:30`), and bare calendar
/// dates (`2023-05-01`). Values without an offset are taken as UTC.
pub fn parse_iso(input: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = input.trim();

    let rfc3339_err = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => return Ok(dt),
        Err(e) => e,
    };

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc().fixed_offset());
    }

    Err(DateError::InvalidIso {
        input: input.to_string(),
        source: rfc3339_err,
    })
}

/// Locale conventions for short date rendering.
///
/// The patterns follow what browsers print for `toLocaleDateString()` in
/// each locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateLocale {
    /// `5/1/2023`
    #[default]
    EnUs,
    /// `01/05/2023`
    EnGb,
    /// `1.5.2023`
    De,
    /// `01/05/2023`
    Fr,
    /// `2023/5/1`
    ZhCn,
    /// `2023/5/1`
    Ja,
    /// `2023-05-01`
    Iso,
}

impl DateLocale {
    /// All supported locales.
    pub const ALL: [DateLocale; 7] = [
        Self::EnUs,
        Self::EnGb,
        Self::De,
        Self::Fr,
        Self::ZhCn,
        Self::Ja,
        Self::Iso,
    ];

    /// Canonical BCP 47 style tag for this locale.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::De => "de-DE",
            Self::Fr => "fr-FR",
            Self::ZhCn => "zh-CN",
            Self::Ja => "ja-JP",
            Self::Iso => "iso",
        }
    }

    /// Language tag for `<html lang>` and feed metadata. The `iso` locale
    /// only changes date formatting and reads as English.
    pub fn language(&self) -> &'static str {
        match self {
            Self::Iso => "en",
            other => other.tag(),
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            Self::EnUs => "%-m/%-d/%Y",
            Self::EnGb | Self::Fr => "%d/%m/%Y",
            Self::De => "%-d.%-m.%Y",
            Self::ZhCn | Self::Ja => "%Y/%-m/%-d",
            Self::Iso => "%Y-%m-%d",
        }
    }

    /// Format the calendar date of `date` as written, in its own offset.
    pub fn format(&self, date: &DateTime<FixedOffset>) -> String {
        date.date_naive().format(self.pattern()).to_string()
    }

    /// Parse `input` as ISO-8601 and format it for this locale.
    pub fn format_iso(&self, input: &str) -> Result<String> {
        parse_iso(input).map(|date| self.format(&date))
    }
}

impl FromStr for DateLocale {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('_', "-").to_ascii_lowercase();
        match normalized.as_str() {
            "en" | "en-us" => Ok(Self::EnUs),
            "en-gb" => Ok(Self::EnGb),
            "de" | "de-de" => Ok(Self::De),
            "fr" | "fr-fr" => Ok(Self::Fr),
            "zh" | "zh-cn" | "zh-hans" => Ok(Self::ZhCn),
            "ja" | "ja-jp" => Ok(Self::Ja),
            "iso" | "iso-8601" => Ok(Self::Iso),
            _ => Err(DateError::UnknownLocale(s.to_string())),
        }
    }
}

impl TryFrom<String> for DateLocale {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DateLocale> for String {
    fn from(locale: DateLocale) -> Self {
        locale.tag().to_string()
    }
}

impl fmt::Display for DateLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
