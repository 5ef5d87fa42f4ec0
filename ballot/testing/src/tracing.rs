use {
    std::sync::Once,
    tracing::Level,
    tracing_subscriber::{EnvFilter, FmtSubscriber},
};

/// Crates that log every request at debug level. Tests only care about ours.
const QUIET_DEPENDENCIES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "axum", "tower"];

static TRACING: Once = Once::new();

/// Directives printing ballot crates at `level` while keeping the HTTP stack
/// at `warn`.
pub fn ballot_filter_directives(level: Level) -> String {
    let mut directives = vec![level.to_string().to_lowercase()];

    for krate in QUIET_DEPENDENCIES {
        directives.push(format!("{krate}=warn"));
    }

    directives.join(",")
}

/// Route test logs through the test harness's captured output.
///
/// `RUST_LOG`, when set, replaces the default directives. Only the first call
/// in a test binary installs anything.
pub fn setup_tracing_subscriber(level: Level) {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(ballot_filter_directives(level)));

        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .without_time()
            .with_test_writer()
            .finish();

        // Another harness may have installed its own subscriber first.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_are_capped_at_warn() {
        let directives = ballot_filter_directives(Level::DEBUG);

        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("hyper=warn"));
        assert!(directives.contains("reqwest=warn"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}
