use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::DEFAULT_LOG_FILTER;

/// Turns the `--log` value into a filter. The environment is never read; a filter that
/// doesn't parse falls back to the default.
pub fn build_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber.
pub fn init_logging(filter: &str) {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(build_filter(filter))
        .with(console_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parses() {
        let filter = build_filter("info,solar_orrery::gui=debug");
        let filter_str = format!("{}", filter);
        assert!(filter_str.contains("solar_orrery::gui=debug"));
    }

    #[test]
    fn test_filter_ignores_environment() {
        std::env::set_var("RUST_LOG", "trace");
        let filter_str = format!("{}", build_filter("warn"));
        std::env::remove_var("RUST_LOG");

        assert!(filter_str.contains("warn"));
        assert!(!filter_str.contains("trace"));
    }

    #[test]
    fn test_bad_filter_falls_back() {
        let filter_str = format!("{}", build_filter("solar_orrery=notalevel"));
        assert_eq!(filter_str, DEFAULT_LOG_FILTER);
    }
}
