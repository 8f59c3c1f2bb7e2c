//! Lightweight debug logging gated by TITAN_DEBUG=1 (or `--debug`).
use std::sync::OnceLock;

static ENABLED: OnceLock<bool> = OnceLock::new();

pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("TITAN_DEBUG").ok().as_deref() == Some("1"))
}

/// Turn logging on regardless of the environment. Only effective before the first `is_enabled` call.
pub fn force_enable() {
    let _ = ENABLED.set(true);
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        if $crate::core::debug::is_enabled() { eprintln!("[titan] {}", format!($($arg)*)); }
    }};
}
