pub mod error;
pub mod record;
pub mod format_spec;
pub mod date;
pub mod pattern;

pub mod ndc;
pub mod gdc;
pub mod context;

pub mod config;
pub mod env;
pub mod layer;
pub mod init;

pub use config::{FormatterConfig, DEFAULT_PATTERN};
pub use context::{DiagnosticContext, ThreadContext};
pub use date::{DateFormat, DateMethod};
pub use error::{BuildError, ConfigError, InitError, PatternSyntaxError, RenderError};
pub use pattern::PatternFormatter;
pub use record::{Event, LogData, LogRecord};
