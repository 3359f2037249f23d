use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "JURL_LOG";

/// Logs go to stderr; stdout belongs to the output handler. Calling this
/// more than once is harmless.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "jurl=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
