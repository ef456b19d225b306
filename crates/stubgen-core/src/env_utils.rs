//! Environment variable helpers used for configuration defaults.
//!
//! # Example
//!
//! ```
//! use stubgen_core::env_utils::{env_bool, env_var_or};
//!
//! let exception: String = env_var_or("STUBGEN_DEFAULT_EXCEPTION", "java.lang.IllegalStateException".to_string());
//! let no_bootstrap = env_bool("STUBGEN_NO_BOOTSTRAP");
//! # let _ = (exception, no_bootstrap);
//! ```

use std::str::FromStr;

/// Exception used for generated bodies when none is configured.
pub const DEFAULT_EXCEPTION: &str = "java.lang.UnsupportedOperationException";

pub const DEFAULT_EXCEPTION_VAR: &str = "STUBGEN_DEFAULT_EXCEPTION";
pub const NO_BOOTSTRAP_VAR: &str = "STUBGEN_NO_BOOTSTRAP";

/// Parse an environment variable. `None` when unset or unparsable.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// `true` for "1", "true", "yes" or "on" (any case).
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// The configured default exception type, as a binary name.
pub fn default_exception() -> String {
    env_var::<String>(DEFAULT_EXCEPTION_VAR)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_EXCEPTION.to_string())
}
