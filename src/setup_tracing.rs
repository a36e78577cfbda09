use time::format_description::parse;
use tracing_subscriber::fmt::time::OffsetTime;

/// Install the global fmt subscriber.
///
/// `default_level` applies unless RUST_LOG is set (e.g. RUST_LOG=loginlink=trace).
pub fn setup_tracing(default_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let timer_format = parse("[hour]:[minute]:[second].[subsecond digits:2]")
        .expect("Static time format description is valid");

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_ansi(true)
        .with_timer(OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC),
            timer_format,
        ))
        .compact()
        .init();
}
