use crate::{gdc, ndc};

/// Source of ambient diagnostic state read by the `%z`, `%y`, `%x` and `%g`
/// directives.
///
/// Implementations must be safe to call from any thread; the formatter only
/// ever reads through this trait.
pub trait DiagnosticContext: Send + Sync {
    /// Top of the nested context, or `param` when the stack is empty.
    fn peek(&self, param: Option<&str>) -> String;

    /// All nested frames, bottom first, joined with `separator`.
    fn dotted(&self, separator: &str) -> String;

    /// The whole nested context as a single space-separated frame.
    fn current_frame(&self) -> String;

    /// Process-wide diagnostic string.
    fn global_value(&self) -> String;
}

/// [`DiagnosticContext`] backed by the thread-local [`ndc`] stack and the
/// process-wide [`gdc`] value. This is the formatter's default.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadContext;

impl DiagnosticContext for ThreadContext {
    fn peek(&self, param: Option<&str>) -> String {
        ndc::peek().unwrap_or_else(|| param.unwrap_or_default().to_string())
    }

    fn dotted(&self, separator: &str) -> String {
        ndc::with_frames(|frames| frames.join(separator))
    }

    fn current_frame(&self) -> String {
        ndc::with_frames(|frames| frames.join(" "))
    }

    fn global_value(&self) -> String {
        gdc::get()
    }
}
