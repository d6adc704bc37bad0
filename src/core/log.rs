//! Tracing setup for the binary. Logs go to stderr so command output on
//! stdout stays clean.
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init_logging(verbose: bool) {
    let (app_level, http_level, default_directive) = if verbose {
        (LevelFilter::DEBUG, LevelFilter::INFO, "debug")
    } else {
        (LevelFilter::OFF, LevelFilter::OFF, "off")
    };
    let targets = Targets::new()
        .with_target("manat", app_level)
        .with_target("reqwest", http_level);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A subscriber may already be installed (e.g. by test-log)
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(targets)
        .with(env_filter)
        .try_init();
}
