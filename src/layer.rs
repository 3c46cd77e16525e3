use crate::pattern::PatternFormatter;
use crate::record::{level_index, LogData, LogRecord};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that renders every event through a compiled
/// [`PatternFormatter`] and writes one line per event.
///
/// The layer does not filter by level; combine it with a filter layer if
/// needed. Render and write failures are counted and reported on stderr,
/// never through `tracing`, so the layer cannot recurse into itself.
pub struct PatternLayer<W = fn() -> io::Stdout> {
    formatter: PatternFormatter,
    make_writer: W,
    with_trace: bool,
    /// Total events seen by the layer.
    pub total_events: Arc<AtomicU64>,
    /// Rendered and written successfully.
    pub rendered_events: Arc<AtomicU64>,
    /// Dropped because rendering or writing failed.
    pub failed_events: Arc<AtomicU64>,
}

impl PatternLayer {
    /// Create a layer writing to stdout.
    pub fn new(formatter: PatternFormatter) -> Self {
        PatternLayer {
            formatter,
            make_writer: io::stdout as fn() -> io::Stdout,
            with_trace: false,
            total_events: Arc::new(AtomicU64::new(0)),
            rendered_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<W> PatternLayer<W> {
    /// Send rendered lines to `make_writer` instead.
    pub fn with_writer<W2>(self, make_writer: W2) -> PatternLayer<W2>
    where
        W2: for<'a> MakeWriter<'a> + 'static,
    {
        PatternLayer {
            formatter: self.formatter,
            make_writer,
            with_trace: self.with_trace,
            total_events: self.total_events,
            rendered_events: self.rendered_events,
            failed_events: self.failed_events,
        }
    }

    /// Record the callsite (`file:line:in module`) as the event's trace,
    /// making it available to `%t`.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.with_trace = enabled;
        self
    }

    pub fn formatter(&self) -> &PatternFormatter {
        &self.formatter
    }

    fn record_for(&self, event: &tracing::Event<'_>) -> LogRecord {
        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        let data = if fields.is_empty() {
            LogData::Text(message.unwrap_or_default())
        } else {
            let mut object = serde_json::Map::new();
            if let Some(message) = message {
                object.insert("message".to_string(), serde_json::Value::String(message));
            }
            object.extend(fields);
            LogData::Json(serde_json::Value::Object(object))
        };

        let meta = event.metadata();
        let mut record = LogRecord::new(meta.target(), level_index(meta.level()), data);
        if self.with_trace {
            if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
                let frame = match meta.module_path() {
                    Some(module) => format!("{}:{}:in {}", file, line, module),
                    None => format!("{}:{}", file, line),
                };
                record = record.with_trace(vec![frame]);
            }
        }
        record
    }
}

impl<S, W> Layer<S> for PatternLayer<W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let record = self.record_for(event);
        let mut line = match self.formatter.format(&record) {
            Ok(line) => line,
            Err(e) => {
                self.failed_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("error rendering log event: {}", e);
                return;
            }
        };
        line.push('\n');

        let mut writer = self.make_writer.make_writer_for(event.metadata());
        if let Err(e) = writer.write_all(line.as_bytes()) {
            self.failed_events.fetch_add(1, Ordering::Relaxed);
            eprintln!("error writing log line: {}", e);
            return;
        }
        self.rendered_events.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, serde_json::Value>,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(format!("{:?}", value)));
        }
    }
}
