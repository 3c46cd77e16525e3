//! Property-based tests for pattern compilation and rendering.
//!
//! - Literal preservation (patterns without `%` render verbatim)
//! - Escaping (`%%` always renders a single `%`)
//! - Width/precision bounds on rendered directives
//! - Canonical display recompiles to the same segments, braces included

use proptest::prelude::*;
use tracing_log_pattern::{LogRecord, PatternFormatter};

fn event(message: &str) -> LogRecord {
    LogRecord::new("prop::logger", 2, message)
}

proptest! {
    #[test]
    fn literal_patterns_render_verbatim(pattern in "[^%]*", message in ".*") {
        let formatter = PatternFormatter::new(&pattern).unwrap();
        prop_assert_eq!(formatter.format(&event(&message)).unwrap(), pattern);
    }

    #[test]
    fn escaped_percent_renders_once(left in "[^%]*", right in "[^%]*") {
        let pattern = format!("{}%%{}", left, right);
        let formatter = PatternFormatter::new(&pattern).unwrap();
        prop_assert_eq!(formatter.format(&event("x")).unwrap(), format!("{}%{}", left, right));
    }

    #[test]
    fn width_and_precision_bound_output(
        width in 0usize..40,
        precision in 0usize..40,
        left in any::<bool>(),
        message in "\\PC*",
    ) {
        let pattern = format!("%{}{}.{}m", if left { "-" } else { "" }, width, precision);
        let formatter = PatternFormatter::new(&pattern).unwrap();
        let line = formatter.format(&event(&message)).unwrap();

        let kept = message.chars().count().min(precision);
        prop_assert_eq!(line.chars().count(), kept.max(width));
        let body: String = message.chars().take(kept).collect();
        if left {
            prop_assert!(line.starts_with(&body));
        } else {
            prop_assert!(line.ends_with(&body));
        }
    }

    #[test]
    fn canonical_display_recompiles(pattern in "([a-z :\\[\\]{}]|%%|%-?[0-9]{0,2}(\\.[0-9]{1,2})?[cCtmMlzygx%])*") {
        // Generated braces may leave a `{param}` open; only valid patterns are checked.
        let formatter = match PatternFormatter::new(&pattern) {
            Ok(formatter) => formatter,
            Err(_) => return Ok(()),
        };
        let again = PatternFormatter::new(&formatter.to_string()).unwrap();
        prop_assert_eq!(formatter.segments(), again.segments());
    }
}
