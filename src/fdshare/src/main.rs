use std::io::{self, Write};
use std::process::ExitCode;

use fdshare::error::output_error;
use fdshare::{run_demo, DemoConfig};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

fn init_tracing() {
    // stderr only; stdout carries the demonstration text
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_timer(fmt::time::uptime())
                .with_filter(LevelFilter::WARN),
        )
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let config = DemoConfig::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // a successful run has already flushed its output
    match run_demo(&config, &mut out) {
        Ok(summary) => {
            info!(
                bytes_read = summary.bytes_read,
                string_len = summary.string_len,
                mismatches = summary.mismatches,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(failure) => {
            if let Err(e) = out.flush() {
                eprintln!("{}", output_error(e));
            }
            eprintln!("{}", failure.error);
            for secondary in &failure.cleanup {
                eprintln!("{} (during cleanup)", secondary);
            }
            ExitCode::FAILURE
        }
    }
}
