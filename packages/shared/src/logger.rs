//! Logging setup for the Sleeper binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are enabled by the default filter.
const WORKSPACE_TARGETS: &[&str] = &["sleeper_server", "sleeper_client", "sleeper_shared"];

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Every workspace crate, the binary itself and `tower_http` (request traces) are
/// enabled at `default_log_level`.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    WORKSPACE_TARGETS
        .iter()
        .copied()
        .chain([binary_target.as_str(), "tower_http"])
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "sleeper-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use sleeper_shared::logger::setup_logger;
///
/// setup_logger("sleeper-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_workspace_and_binary() {
        // テスト項目: デフォルトのフィルタにワークスペースの crate とバイナリが含まれる
        // given (前提条件):
        let binary_name = "sleeper-server";

        // when (操作):
        let directive = default_directive(binary_name, "debug");

        // then (期待する結果):
        assert!(directive.contains("sleeper_server=debug"));
        assert!(directive.contains("sleeper_shared=debug"));
        assert!(directive.contains("tower_http=debug"));
        assert!(!directive.contains("sleeper-server"));
    }
}
