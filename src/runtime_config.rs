//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for router behavior.
//!
//! ## Environment Variables
//!
//! ### `TRELLIS_DUMP_ROUTES`
//!
//! When truthy (`1`, `true`, `yes`, `on`), the compiled routing table is
//! printed after each `Router` build. Useful for verifying site wiring at
//! startup.
//!
//! ### `TRELLIS_STRICT_SLASH`
//!
//! When truthy, the permissive trailing-slash tolerance (`/?` suffix) is
//! disabled at compile time: only the exact emitted form of each path
//! matches.
//!
//! ## Usage
//!
//! ```rust
//! use trellis::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("dump_routes: {}", config.dump_routes);
//! ```

use std::env;

/// Runtime configuration loaded from environment variables.
///
/// Load this at startup with [`RuntimeConfig::from_env()`] and hand it to
/// `Router::with_config`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeConfig {
    /// Print the compiled routing table after each build
    pub dump_routes: bool,
    /// Disable the permissive trailing-slash tolerance
    pub strict_slash: bool,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            dump_routes: env_flag("TRELLIS_DUMP_ROUTES"),
            strict_slash: env_flag("TRELLIS_STRICT_SLASH"),
        }
    }
}

fn env_flag(name: &str) -> bool {
    match env::var(name) {
        Ok(val) => matches!(
            val.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => false,
    }
}
