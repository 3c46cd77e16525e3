use crate::config::FormatterConfig;
use crate::error::InitError;
use crate::layer::PatternLayer;
use crate::pattern::PatternFormatter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the stdout pattern layer.
///
/// **Fields**
/// - `formatter`: pattern and date options compiled into the layer's
///   [`PatternFormatter`].
/// - `with_trace`: if `true`, the callsite of each event is recorded as its
///   trace so that `%t` renders `file:line:in module`.
#[derive(Clone, Debug, Default)]
pub struct LayerConfig {
    pub formatter: FormatterConfig,
    pub with_trace: bool,
}

/// Initialize the global `tracing` subscriber with a [`PatternLayer`] built
/// from `config`, writing to stdout.
///
/// **Errors**
/// - [`InitError::Build`] if the pattern or date options are invalid.
/// - [`InitError::SetGlobalDefault`] if a global subscriber is already set.
pub fn init_tracing_with_config(config: LayerConfig) -> Result<(), InitError> {
    let formatter = PatternFormatter::from_config(&config.formatter)?;
    let layer = PatternLayer::new(formatter).with_trace(config.with_trace);

    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Initialize tracing with `pattern` and the default date format.
///
/// Equivalent to calling [`init_tracing_with_config`] with a
/// [`LayerConfig`] holding `FormatterConfig::new(pattern)`.
pub fn init_tracing(pattern: &str) -> Result<(), InitError> {
    init_tracing_with_config(LayerConfig {
        formatter: FormatterConfig::new(pattern),
        with_trace: false,
    })
}
