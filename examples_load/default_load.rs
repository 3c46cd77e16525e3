use std::time::Instant;

use tracing_log_pattern::record::LogRecord;
use tracing_log_pattern::{PatternFormatter, DEFAULT_PATTERN};

fn main() {
    let formatter = PatternFormatter::new(DEFAULT_PATTERN).expect("valid pattern");
    let record = LogRecord::new("service::auth", 4, "default load test error");

    let n: u64 = 100_000;
    let start = Instant::now();

    let mut bytes = 0usize;
    for _ in 0..n {
        bytes += formatter.format(&record).expect("render").len();
    }

    let elapsed = start.elapsed();
    println!("default pattern: rendered {} lines ({} bytes) in {:?} (~{:.0} lines/s)",
        n,
        bytes,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
