use crate::error::ConfigError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Timelike};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Default `%d` layout; a `,mmm` millisecond suffix is always appended.
pub const ISO8601: &str = "%Y-%m-%d %H:%M:%S";

/// Alternate representations of the current instant selectable by name
/// instead of a strftime pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMethod {
    /// Unix seconds (`to_i`, `epoch`).
    Epoch,
    /// Unix seconds with a 6-digit fraction (`to_f`).
    EpochFloat,
    /// Microseconds within the current second (`usec`).
    Usec,
    /// Nanoseconds within the current second (`nsec`).
    Nsec,
    /// `2001-01-12 13:15:50 +0000` (`to_s`).
    Plain,
    /// RFC 3339 (`rfc3339`, `iso8601`).
    Rfc3339,
    /// RFC 2822 (`rfc2822`, `httpdate`).
    Rfc2822,
}

impl FromStr for DateMethod {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "to_i" | "epoch" => Ok(DateMethod::Epoch),
            "to_f" => Ok(DateMethod::EpochFloat),
            "usec" => Ok(DateMethod::Usec),
            "nsec" => Ok(DateMethod::Nsec),
            "to_s" => Ok(DateMethod::Plain),
            "rfc3339" | "iso8601" => Ok(DateMethod::Rfc3339),
            "rfc2822" | "httpdate" => Ok(DateMethod::Rfc2822),
            other => Err(ConfigError::UnknownDateMethod(other.to_string())),
        }
    }
}

/// How the `%d` directive renders the current instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFormat {
    /// strftime layout followed by `,` and three millisecond digits.
    Pattern(String),
    Method(DateMethod),
}

impl Default for DateFormat {
    fn default() -> Self {
        DateFormat::Pattern(ISO8601.to_string())
    }
}

impl DateFormat {
    /// Resolve the two mutually exclusive date options.
    pub fn resolve(
        date_pattern: Option<&str>,
        date_method: Option<&str>,
    ) -> Result<Self, ConfigError> {
        match (date_pattern, date_method) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingDateOptions),
            (Some(pattern), None) => DateFormat::pattern(pattern),
            (None, Some(method)) => Ok(DateFormat::Method(method.parse()?)),
            (None, None) => Ok(DateFormat::default()),
        }
    }

    /// Validate a strftime layout up front so rendering never meets a bad item.
    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDatePattern(pattern.to_string()));
        }
        Ok(DateFormat::Pattern(pattern.to_string()))
    }

    pub(crate) fn write(&self, now: &DateTime<FixedOffset>, out: &mut String) -> fmt::Result {
        match self {
            DateFormat::Pattern(pattern) => {
                let millis = now.nanosecond() % 1_000_000_000 / 1_000_000;
                write!(out, "{},{:03}", now.format(pattern), millis)
            }
            DateFormat::Method(method) => match method {
                DateMethod::Epoch => write!(out, "{}", now.timestamp()),
                DateMethod::EpochFloat => write!(
                    out,
                    "{}.{:06}",
                    now.timestamp(),
                    now.timestamp_subsec_micros() % 1_000_000
                ),
                DateMethod::Usec => write!(out, "{}", now.timestamp_subsec_micros() % 1_000_000),
                DateMethod::Nsec => write!(out, "{}", now.nanosecond() % 1_000_000_000),
                DateMethod::Plain => write!(out, "{}", now.format("%Y-%m-%d %H:%M:%S %z")),
                DateMethod::Rfc3339 => out.write_str(&now.to_rfc3339()),
                DateMethod::Rfc2822 => out.write_str(&now.to_rfc2822()),
            },
        }
    }
}
