use enrich_core::err::Result;
pub use log::*;

mod limiting;
pub use limiting::*;

/// The environment variable used to configure the log filter
pub const LOG_FILTER_ENV: &str = "ENRICH_LOG";

/// Configures the logger for this process.
///
/// Logs are written to stderr as stdout carries the event stream.
pub fn init_logging() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_FILTER_ENV, "info"))
        .target(env_logger::Target::Stderr)
        .try_init()?;
    Ok(())
}

/// Logging init function for tests
pub fn init_for_tests() {
    let res = env_logger::builder()
        .filter_module("enrich", LevelFilter::Trace)
        .is_test(true)
        .try_init();
    if let Err(err) = res {
        eprintln!("Failed to init logging: {}", err);
    }
}
