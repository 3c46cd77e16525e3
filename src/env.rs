/// Environment variable names used by this crate for convenient
/// configuration of the formatter from microservices.
///
/// These are purely helpers; the formatter itself never reads the
/// environment.

/// Pattern string, e.g. `%d [%l] %C: %m`.
pub const LOG_PATTERN_ENV: &str = "LOG_PATTERN";

/// strftime layout for `%d`. Mutually exclusive with [`LOG_DATE_METHOD_ENV`].
pub const LOG_DATE_PATTERN_ENV: &str = "LOG_DATE_PATTERN";

/// Named date method for `%d`, e.g. `to_i` or `rfc3339`.
pub const LOG_DATE_METHOD_ENV: &str = "LOG_DATE_METHOD";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable, treating unset and empty the same.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
