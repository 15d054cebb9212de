//! Logging setup for the zfr binaries
//!
//! Everything goes to stderr so stdout stays reserved for JSON.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

/// Map the `-d` count onto a level filter.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn setup_logging(verbosity: u8) {
    if verbosity > 3 {
        eprintln!("Don't be crazy, max is -d -d -d");
    }
    let filter = level_for(verbosity);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    // Keep reqwest/hyper internals out unless tracing everything.
    let noisy_modules = ["hyper", "rustls", "reqwest::connect"];
    let module_filter = tracing_subscriber::filter::filter_fn(move |metadata| {
        filter == LevelFilter::TRACE
            || !noisy_modules
                .iter()
                .any(|name| metadata.target().starts_with(name))
    });

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    if tracing_subscriber::registry()
        .with(filtered_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Error: Failed to set up logging");
    }

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
