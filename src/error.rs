/// Error type returned when the formatter options are invalid or conflict.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("date_pattern and date_method are mutually exclusive")]
    ConflictingDateOptions,

    #[error("unknown date method: {0:?}")]
    UnknownDateMethod(String),

    #[error("invalid strftime date pattern: {0:?}")]
    InvalidDatePattern(String),
}

/// Error type returned when a pattern string cannot be compiled.
///
/// Every variant carries the byte offset of the `%` that starts the
/// offending directive.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternSyntaxError {
    #[error("unknown directive '%{letter}' at offset {offset}")]
    UnknownDirective { letter: char, offset: usize },

    #[error("pattern ends inside the directive at offset {offset}")]
    UnterminatedDirective { offset: usize },

    #[error("missing precision digits after '.' in directive at offset {offset}")]
    MissingPrecision { offset: usize },

    #[error("width or precision too large in directive at offset {offset}")]
    InvalidWidth { offset: usize },

    #[error("unterminated '{{' parameter in directive at offset {offset}")]
    UnterminatedParam { offset: usize },
}

impl PatternSyntaxError {
    /// Byte offset of the `%` that starts the malformed directive.
    pub fn offset(&self) -> usize {
        match *self {
            PatternSyntaxError::UnknownDirective { offset, .. }
            | PatternSyntaxError::UnterminatedDirective { offset }
            | PatternSyntaxError::MissingPrecision { offset }
            | PatternSyntaxError::InvalidWidth { offset }
            | PatternSyntaxError::UnterminatedParam { offset } => offset,
        }
    }
}

/// Error type returned when building a [`PatternFormatter`](crate::PatternFormatter).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Syntax(#[from] PatternSyntaxError),
}

/// Error type returned when a compiled pattern fails to render an event.
///
/// No partial line is produced when this is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("failed to render directive '%{directive}'")]
    Directive { directive: char },
}

/// Error type returned by the `init_tracing*` helpers.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("invalid log pattern configuration: {0}")]
    Build(#[from] BuildError),

    #[error("global tracing subscriber already installed")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}
