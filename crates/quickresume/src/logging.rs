use tracing_subscriber::EnvFilter;

/// Environment variable that overrides every other filter source.
pub const LOG_ENV: &str = "QUICKRESUME_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Picks the filter from `QUICKRESUME_LOG`, then the config file, then `warn`.
pub fn filter(configured: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    if let Some(raw) = configured
        && let Ok(filter) = EnvFilter::try_new(raw)
    {
        return filter;
    }
    EnvFilter::new(DEFAULT_FILTER)
}

/// Installs the stderr subscriber. Later calls are no-ops.
pub fn init(configured: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(configured))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
