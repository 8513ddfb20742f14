use crate::logging::LogFormat;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Orchestration tool probed during environment validation.
pub const DEFAULT_ORCHESTRATOR: &str = "ansible";

/// Variable telling the orchestration tool where its configuration lives.
pub const ORCHESTRATOR_CONFIG_ENV: &str = "ANSIBLE_CONFIG";

/// Default log filter expression used by the daemon.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned orchestration tool name.
#[must_use]
pub fn default_orchestrator_string() -> String {
    DEFAULT_ORCHESTRATOR.to_owned()
}
