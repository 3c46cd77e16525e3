//! Integration tests for compiling and rendering log patterns.

use chrono::{TimeZone, Utc};
use std::fmt;
use std::sync::Arc;
use tracing_log_pattern::{
    BuildError, ConfigError, DiagnosticContext, FormatterConfig, LogData, LogRecord,
    PatternFormatter, PatternSyntaxError, RenderError,
};

fn record(data: impl Into<LogData>) -> LogRecord {
    LogRecord::new("app::svc", 2, data)
}

struct FakeContext;

impl DiagnosticContext for FakeContext {
    fn peek(&self, param: Option<&str>) -> String {
        format!("top({})", param.unwrap_or("none"))
    }

    fn dotted(&self, separator: &str) -> String {
        ["a", "b", "c"].join(separator)
    }

    fn current_frame(&self) -> String {
        "a b c".to_string()
    }

    fn global_value(&self) -> String {
        "host-1".to_string()
    }
}

mod substitution_tests {
    use super::*;

    #[test]
    fn literal_only_pattern_is_unchanged() {
        let formatter = PatternFormatter::new("no directives here {} [x]").unwrap();
        assert_eq!(formatter.format(&record("ignored")).unwrap(), "no directives here {} [x]");
    }

    #[test]
    fn escaped_percent() {
        let formatter = PatternFormatter::new("100%% done").unwrap();
        assert_eq!(formatter.format(&record("x")).unwrap(), "100% done");
    }

    #[test]
    fn short_name_and_message() {
        let formatter = PatternFormatter::new("%c: %m").unwrap();
        let event = LogRecord::new("svc", 2, "hello");
        assert_eq!(formatter.format(&event).unwrap(), "svc: hello");
    }

    #[test]
    fn every_event_directive() {
        let formatter = PatternFormatter::new("%c|%C|%l|%t|%m").unwrap();
        let event = LogRecord::new("app::db::pool", 3, "slow query")
            .with_trace(vec!["pool.rs:10".into(), "main.rs:3".into()]);
        assert_eq!(
            formatter.format(&event).unwrap(),
            "pool|app::db::pool|WARN|pool.rs:10|slow query"
        );
    }

    #[test]
    fn empty_trace_renders_nothing() {
        let formatter = PatternFormatter::new("[%t]").unwrap();
        assert_eq!(formatter.format(&record("x")).unwrap(), "[]");
    }

    #[test]
    fn formatted_message_pretty_prints_json() {
        let formatter = PatternFormatter::new("%m / %M").unwrap();
        let event = record(serde_json::json!({"id": 7}));
        assert_eq!(formatter.format(&event).unwrap(), "{\"id\":7} / {\n  \"id\": 7\n}");
    }

    #[test]
    fn diagnostic_directives_read_injected_context() {
        let formatter = PatternFormatter::new("%z|%z{dflt}|%z{}|%y|%x|%g")
            .unwrap()
            .with_context(Arc::new(FakeContext));
        assert_eq!(
            formatter.format(&record("x")).unwrap(),
            "top(none)|top(dflt)|top(none)|a.b.c|a b c|host-1"
        );
    }

    #[test]
    fn default_context_reads_thread_stack() {
        use tracing_log_pattern::{gdc, ndc};

        ndc::clear();
        gdc::set("edge");
        let formatter = PatternFormatter::new("%g %z{-} %y").unwrap();
        assert_eq!(formatter.format(&record("x")).unwrap(), "edge - ");

        let _req = ndc::enter("req-1");
        let _op = ndc::enter("login");
        assert_eq!(formatter.format(&record("x")).unwrap(), "edge login req-1.login");
        gdc::clear();
    }
}

mod width_tests {
    use super::*;

    #[test]
    fn pads_then_truncates() {
        let formatter = PatternFormatter::new("%5.2m").unwrap();
        assert_eq!(formatter.format(&record("hi")).unwrap(), "   hi");
        assert_eq!(formatter.format(&record("hello world")).unwrap(), "   he");
    }

    #[test]
    fn left_aligned_level_column() {
        let formatter = PatternFormatter::new("%-5l|%m").unwrap();
        assert_eq!(formatter.format(&record("up")).unwrap(), "INFO |up");
    }

    #[test]
    fn width_applies_to_every_directive() {
        let formatter = PatternFormatter::new("%6c|%3%|%-4.1C|").unwrap();
        assert_eq!(formatter.format(&record("x")).unwrap(), "   svc|  %|a   |");
    }
}

mod date_tests {
    use super::*;

    #[test]
    fn default_format_shape() {
        let formatter = PatternFormatter::new("%d").unwrap();
        let line = formatter.format(&record("x")).unwrap();
        let (stamp, millis) = line.split_once(',').unwrap();
        assert_eq!(stamp.len(), 19);
        assert_eq!(millis.len(), 3);
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok());
    }

    #[test]
    fn format_at_uses_given_instant() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 58).unwrap()
            + chrono::Duration::milliseconds(7);
        let formatter = PatternFormatter::new("%d %l").unwrap();
        assert_eq!(
            formatter.format_at(&record("x"), &now).unwrap(),
            "2024-02-29 23:59:58,007 INFO"
        );
    }

    #[test]
    fn configured_date_pattern_and_method() {
        let now = Utc.with_ymd_and_hms(2001, 1, 12, 13, 15, 50).unwrap();

        let config = FormatterConfig::new("[%d]").with_date_pattern("%d/%m/%Y");
        let formatter = PatternFormatter::from_config(&config).unwrap();
        assert_eq!(formatter.format_at(&record("x"), &now).unwrap(), "[12/01/2001,000]");

        let config = FormatterConfig::new("[%d]").with_date_method("to_i");
        let formatter = PatternFormatter::from_config(&config).unwrap();
        assert_eq!(formatter.format_at(&record("x"), &now).unwrap(), "[979305350]");
    }
}

mod error_tests {
    use super::*;

    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn unknown_directive_is_rejected() {
        let err = PatternFormatter::new("%q").unwrap_err();
        assert_eq!(
            err,
            BuildError::Syntax(PatternSyntaxError::UnknownDirective { letter: 'q', offset: 0 })
        );
        assert!(err.to_string().contains("'%q'"));
    }

    #[test]
    fn unterminated_param_is_rejected() {
        assert!(matches!(
            "%z{abc".parse::<PatternFormatter>(),
            Err(BuildError::Syntax(PatternSyntaxError::UnterminatedParam { offset: 0 }))
        ));
    }

    #[test]
    fn conflicting_date_options() {
        let config = FormatterConfig::new("%d")
            .with_date_pattern("%H")
            .with_date_method("usec");
        assert_eq!(
            PatternFormatter::from_config(&config).unwrap_err(),
            BuildError::Config(ConfigError::ConflictingDateOptions)
        );
    }

    #[test]
    fn unknown_date_method() {
        let config = FormatterConfig::new("%d").with_date_method("yesterday");
        assert!(matches!(
            PatternFormatter::from_config(&config),
            Err(BuildError::Config(ConfigError::UnknownDateMethod(name))) if name == "yesterday"
        ));
    }

    #[test]
    fn failing_payload_yields_render_error() {
        let formatter = PatternFormatter::new("before %m after").unwrap();
        let event = record(LogData::Display(Arc::new(Broken)));
        assert_eq!(
            formatter.format(&event).unwrap_err(),
            RenderError::Directive { directive: 'm' }
        );
    }
}

mod determinism_tests {
    use super::*;

    #[test]
    fn repeated_renders_are_identical() {
        let formatter = PatternFormatter::new("%-8c %C [%5.3l] %M %%").unwrap();
        let event = LogRecord::new("core::engine", 4, "boom");
        let first = formatter.format(&event).unwrap();
        let second = formatter.format(&event).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "engine   core::engine [  ERR] boom %");
    }

    #[test]
    fn shared_across_threads() {
        let formatter = Arc::new(PatternFormatter::new("%c-%m").unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let formatter = Arc::clone(&formatter);
                std::thread::spawn(move || {
                    formatter.format(&LogRecord::new("w", 2, format!("{}", i))).unwrap()
                })
            })
            .collect();
        let lines: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(lines, vec!["w-0", "w-1", "w-2", "w-3"]);
    }
}
