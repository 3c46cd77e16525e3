use crate::date::DateFormat;
use crate::env::{env_opt, env_or, LOG_DATE_METHOD_ENV, LOG_DATE_PATTERN_ENV, LOG_PATTERN_ENV};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "%d [%l] %C: %m";

/// Construction options for a [`PatternFormatter`](crate::PatternFormatter).
///
/// **Fields**
/// - `pattern`: the pattern string to compile.
/// - `date_pattern`: strftime layout for `%d`; a `,mmm` suffix is always
///   appended.
/// - `date_method`: name of an alternate representation of the current
///   instant (`to_i`, `to_f`, `usec`, `nsec`, `to_s`, `rfc3339`, `rfc2822`).
///
/// `date_pattern` and `date_method` are mutually exclusive; with neither
/// set, `%d` uses [`ISO8601`](crate::date::ISO8601).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_method: Option<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig::new(DEFAULT_PATTERN)
    }
}

impl FormatterConfig {
    pub fn new(pattern: impl Into<String>) -> Self {
        FormatterConfig {
            pattern: pattern.into(),
            date_pattern: None,
            date_method: None,
        }
    }

    pub fn with_date_pattern(mut self, date_pattern: impl Into<String>) -> Self {
        self.date_pattern = Some(date_pattern.into());
        self
    }

    pub fn with_date_method(mut self, date_method: impl Into<String>) -> Self {
        self.date_method = Some(date_method.into());
        self
    }

    /// Build a config from `LOG_PATTERN`, `LOG_DATE_PATTERN` and
    /// `LOG_DATE_METHOD`, falling back to [`DEFAULT_PATTERN`].
    pub fn from_env() -> Self {
        FormatterConfig {
            pattern: env_or(LOG_PATTERN_ENV, DEFAULT_PATTERN),
            date_pattern: env_opt(LOG_DATE_PATTERN_ENV),
            date_method: env_opt(LOG_DATE_METHOD_ENV),
        }
    }

    /// Resolve and validate the date options.
    pub fn date_format(&self) -> Result<DateFormat, ConfigError> {
        DateFormat::resolve(self.date_pattern.as_deref(), self.date_method.as_deref())
    }
}
