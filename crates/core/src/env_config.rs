//! Environment variable lookups with warn-level logging for invalid values.

use crate::error::ConfigError;

/// Parse an environment variable, falling back to `default`.
///
/// Unset or empty variables return `default` silently. A value that fails to
/// parse logs a warning and also returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) if v.trim().is_empty() => default,
        Ok(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// String variable with a default for unset or empty values.
pub fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_owned())
}

/// Optional string variable; empty counts as unset.
pub fn env_opt(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// String variable that has to be present.
///
/// # Errors
/// Returns [`ConfigError::Missing`] when the variable is unset or empty.
pub fn env_required(var: &'static str) -> Result<String, ConfigError> {
    env_opt(var).ok_or(ConfigError::Missing(var))
}
