use std::io;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use tracing_log_pattern::layer::PatternLayer;
use tracing_log_pattern::{ndc, FormatterConfig, PatternFormatter};

fn main() {
    let config = FormatterConfig::new("%d %-5l [%z{-}] %C: %m (%t)")
        .with_date_pattern("%H:%M:%S");
    let formatter = PatternFormatter::from_config(&config).expect("valid config");

    let layer = PatternLayer::new(formatter)
        .with_trace(true)
        .with_writer(io::sink);
    let rendered = layer.rendered_events.clone();

    let subscriber = Registry::default().with(layer);

    let n: u64 = 100_000;
    let start = Instant::now();

    tracing::subscriber::with_default(subscriber, || {
        let _request = ndc::enter("req-42");
        for i in 0..n {
            error!(iteration = i, "custom load test error");
        }
    });

    let elapsed = start.elapsed();
    println!("custom config: rendered {} events in {:?} (~{:.0} ev/s)",
        rendered.load(Ordering::Relaxed),
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
