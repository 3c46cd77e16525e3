use crate::config::FormatterConfig;
use crate::context::{DiagnosticContext, ThreadContext};
use crate::date::DateFormat;
use crate::error::{BuildError, PatternSyntaxError, RenderError};
use crate::format_spec::FormatSpec;
use crate::record::Event;
use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone};
use std::fmt::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

/// Data source selected by a directive letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `%c`
    LoggerName,
    /// `%C`
    LoggerFullName,
    /// `%d`
    Date,
    /// `%t`
    Trace,
    /// `%m`
    Message,
    /// `%M`
    FormattedMessage,
    /// `%l`
    Level,
    /// `%z`
    NdcPeek,
    /// `%y`
    NdcDotted,
    /// `%g`
    Gdc,
    /// `%x`
    NdcGet,
    /// `%%`
    Percent,
}

impl Directive {
    pub fn from_letter(letter: char) -> Option<Self> {
        let directive = match letter {
            'c' => Directive::LoggerName,
            'C' => Directive::LoggerFullName,
            'd' => Directive::Date,
            't' => Directive::Trace,
            'm' => Directive::Message,
            'M' => Directive::FormattedMessage,
            'l' => Directive::Level,
            'z' => Directive::NdcPeek,
            'y' => Directive::NdcDotted,
            'g' => Directive::Gdc,
            'x' => Directive::NdcGet,
            '%' => Directive::Percent,
            _ => return None,
        };
        Some(directive)
    }

    pub fn letter(self) -> char {
        match self {
            Directive::LoggerName => 'c',
            Directive::LoggerFullName => 'C',
            Directive::Date => 'd',
            Directive::Trace => 't',
            Directive::Message => 'm',
            Directive::FormattedMessage => 'M',
            Directive::Level => 'l',
            Directive::NdcPeek => 'z',
            Directive::NdcDotted => 'y',
            Directive::Gdc => 'g',
            Directive::NdcGet => 'x',
            Directive::Percent => '%',
        }
    }

    fn accessor(self) -> Accessor {
        match self {
            Directive::LoggerName => |s, _, out| {
                out.push_str(s.event.logger_name());
                Ok(())
            },
            Directive::LoggerFullName => |s, _, out| {
                out.push_str(s.event.logger_full_name());
                Ok(())
            },
            Directive::Date => |s, _, out| s.date.write(s.now, out),
            Directive::Trace => |s, _, out| {
                if let Some(first) = s.event.trace().first() {
                    out.push_str(first);
                }
                Ok(())
            },
            Directive::Message => |s, _, out| s.event.data().write_raw(out),
            Directive::FormattedMessage => |s, _, out| s.event.data().write_object(out),
            Directive::Level => |s, _, out| {
                out.push_str(s.event.level_name());
                Ok(())
            },
            Directive::NdcPeek => |s, param, out| {
                out.push_str(&s.context.peek(param.filter(|p| !p.is_empty())));
                Ok(())
            },
            Directive::NdcDotted => |s, _, out| {
                out.push_str(&s.context.dotted("."));
                Ok(())
            },
            Directive::Gdc => |s, _, out| {
                out.push_str(&s.context.global_value());
                Ok(())
            },
            Directive::NdcGet => |s, _, out| {
                out.push_str(&s.context.current_frame());
                Ok(())
            },
            Directive::Percent => |_, _, out| {
                out.push('%');
                Ok(())
            },
        }
    }
}

/// Everything an accessor may read while rendering one event.
struct Scope<'a> {
    event: &'a dyn Event,
    context: &'a dyn DiagnosticContext,
    date: &'a DateFormat,
    now: &'a DateTime<FixedOffset>,
}

type Accessor = fn(&Scope<'_>, Option<&str>, &mut String) -> fmt::Result;

/// Compiled directive: the accessor is resolved once when the pattern is
/// parsed.
#[derive(Clone)]
pub struct DirectiveSegment {
    pub spec: FormatSpec,
    pub directive: Directive,
    pub param: Option<String>,
    accessor: Accessor,
}

impl DirectiveSegment {
    pub fn new(spec: FormatSpec, directive: Directive, param: Option<String>) -> Self {
        DirectiveSegment {
            spec,
            directive,
            param,
            accessor: directive.accessor(),
        }
    }
}

impl fmt::Debug for DirectiveSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveSegment")
            .field("spec", &self.spec)
            .field("directive", &self.directive)
            .field("param", &self.param)
            .finish()
    }
}

impl PartialEq for DirectiveSegment {
    fn eq(&self, other: &Self) -> bool {
        self.spec == other.spec && self.directive == other.directive && self.param == other.param
    }
}

impl Eq for DirectiveSegment {}

impl fmt::Display for DirectiveSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}{}", self.spec, self.directive.letter())?;
        if let Some(param) = &self.param {
            write!(f, "{{{}}}", param)?;
        }
        Ok(())
    }
}

/// One unit of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Directive(DirectiveSegment),
}

/// Parse `pattern` into segments in a single left-to-right pass.
///
/// Adjacent literal text, including escaped `%%`, is merged into one
/// [`Segment::Literal`].
pub fn parse(pattern: &str) -> Result<Vec<Segment>, PatternSyntaxError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while let Some(found) = pattern[pos..].find('%') {
        let start = pos + found;
        literal.push_str(&pattern[pos..start]);

        let (directive, end) = parse_directive(pattern, start)?;
        pos = end;

        if directive.directive == Directive::Percent && directive.spec.is_plain() {
            literal.push('%');
            continue;
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Directive(directive));
    }

    literal.push_str(&pattern[pos..]);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Parse the directive whose `%` sits at byte `offset`, returning it along
/// with the offset just past it (and past its `{param}` block, if any).
fn parse_directive(
    pattern: &str,
    offset: usize,
) -> Result<(DirectiveSegment, usize), PatternSyntaxError> {
    let bytes = pattern.as_bytes();
    let mut i = offset + 1;

    let left_align = bytes.get(i) == Some(&b'-');
    if left_align {
        i += 1;
    }

    let (width, next) = digits(pattern, i, offset)?;
    i = next;

    let mut precision = None;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let (value, next) = digits(pattern, i, offset)?;
        if value.is_none() {
            return Err(if i >= pattern.len() {
                PatternSyntaxError::UnterminatedDirective { offset }
            } else {
                PatternSyntaxError::MissingPrecision { offset }
            });
        }
        precision = value;
        i = next;
    }

    let letter = pattern[i..]
        .chars()
        .next()
        .ok_or(PatternSyntaxError::UnterminatedDirective { offset })?;
    let directive = Directive::from_letter(letter)
        .ok_or(PatternSyntaxError::UnknownDirective { letter, offset })?;
    i += letter.len_utf8();

    let mut param = None;
    if directive != Directive::Percent && bytes.get(i) == Some(&b'{') {
        let close = pattern[i + 1..]
            .find('}')
            .ok_or(PatternSyntaxError::UnterminatedParam { offset })?;
        param = Some(pattern[i + 1..i + 1 + close].to_string());
        i += close + 2;
    }

    let spec = FormatSpec {
        left_align,
        width,
        precision,
    };
    Ok((DirectiveSegment::new(spec, directive, param), i))
}

fn digits(
    pattern: &str,
    start: usize,
    offset: usize,
) -> Result<(Option<usize>, usize), PatternSyntaxError> {
    let len = pattern[start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if len == 0 {
        return Ok((None, start));
    }
    let value: u16 = pattern[start..start + len]
        .parse()
        .map_err(|_| PatternSyntaxError::InvalidWidth { offset })?;
    Ok((Some(usize::from(value)), start + len))
}

/// A log pattern compiled once into segments and rendered many times.
///
/// The formatter is immutable after construction and can be shared between
/// threads; rendering reads only the event, the compiled segments and the
/// injected [`DiagnosticContext`].
#[derive(Clone)]
pub struct PatternFormatter {
    pattern: String,
    segments: Vec<Segment>,
    date_format: DateFormat,
    context: Arc<dyn DiagnosticContext>,
}

impl PatternFormatter {
    /// Compile `pattern` with the default date format.
    pub fn new(pattern: &str) -> Result<Self, BuildError> {
        Self::compile(pattern, DateFormat::default())
    }

    /// Compile a pattern from a [`FormatterConfig`], validating its date
    /// options first.
    pub fn from_config(config: &FormatterConfig) -> Result<Self, BuildError> {
        let date_format = config.date_format()?;
        Self::compile(&config.pattern, date_format)
    }

    pub fn compile(pattern: &str, date_format: DateFormat) -> Result<Self, BuildError> {
        let segments = parse(pattern)?;
        tracing::debug!(pattern, segments = segments.len(), "compiled log pattern");

        Ok(PatternFormatter {
            pattern: pattern.to_string(),
            segments,
            date_format,
            context: Arc::new(ThreadContext),
        })
    }

    /// Replace the diagnostic context read by `%z`, `%y`, `%g` and `%x`.
    pub fn with_context(mut self, context: Arc<dyn DiagnosticContext>) -> Self {
        self.context = context;
        self
    }

    /// The pattern as originally written.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    /// Whether any segment reads the clock.
    pub fn uses_date(&self) -> bool {
        self.segments.iter().any(|segment| {
            matches!(segment, Segment::Directive(d) if d.directive == Directive::Date)
        })
    }

    /// Render `event` using the local current time for `%d`.
    pub fn format(&self, event: &dyn Event) -> Result<String, RenderError> {
        self.format_at(event, &Local::now())
    }

    /// Render `event` with `now` as the instant shown by `%d`.
    ///
    /// Either the whole line is produced or a [`RenderError`] naming the
    /// failing directive is returned.
    pub fn format_at<Tz: TimeZone>(
        &self,
        event: &dyn Event,
        now: &DateTime<Tz>,
    ) -> Result<String, RenderError> {
        let now = now.with_timezone(&now.offset().fix());
        let scope = Scope {
            event,
            context: &*self.context,
            date: &self.date_format,
            now: &now,
        };

        let mut line = String::with_capacity(self.pattern.len() + 64);
        let mut scratch = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Directive(d) => {
                    scratch.clear();
                    (d.accessor)(&scope, d.param.as_deref(), &mut scratch).map_err(|_| {
                        RenderError::Directive {
                            directive: d.directive.letter(),
                        }
                    })?;
                    d.spec.apply(&scratch, &mut line);
                }
            }
        }
        Ok(line)
    }
}

impl fmt::Debug for PatternFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternFormatter")
            .field("pattern", &self.pattern)
            .field("segments", &self.segments)
            .field("date_format", &self.date_format)
            .finish_non_exhaustive()
    }
}

/// Prints the compiled form as an equivalent canonical pattern.
impl fmt::Display for PatternFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    for part in text.split_inclusive('%') {
                        f.write_str(part)?;
                        if part.ends_with('%') {
                            f.write_char('%')?;
                        }
                    }
                }
                Segment::Directive(d) => write!(f, "{}", d)?,
            }
        }
        Ok(())
    }
}

impl FromStr for PatternFormatter {
    type Err = BuildError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        PatternFormatter::new(pattern)
    }
}
