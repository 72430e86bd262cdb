//! Environment helpers: centralized dotenv loading and ergonomic getters.
//! Call `init_env()` once early in each binary (or rely on lazy Once).
use std::sync::Once;

static INIT: Once = Once::new();

/// Load .env (and .env.local) exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        crate::env_boot::ensure_dotenv();
        // Note: We intentionally avoid mutating process env at runtime.
        // Logging levels and shop credentials should be provided by the
        // caller/.env; components read them through explicit config structs.
    });
}

/// Get optional env var (None if unset or empty).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}
