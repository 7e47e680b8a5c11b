//! Logging setup plus conditional macros gated on a module-level
//! `ENABLE_LOGS` flag, for modules whose per-chunk chatter is only wanted
//! while debugging.
//!
//! ```rust
//! const ENABLE_LOGS: bool = true;
//!
//! use daybrief::log_info;
//!
//! log_info!("logged only while ENABLE_LOGS is true");
//! ```

/// Initialize the process-wide logger. Reads `RUST_LOG`, defaults to info.
/// The embedding application calls this once at startup.
pub fn init() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

/// Info-level logging, compiled against the calling module's
/// `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level logging, compiled against the calling module's
/// `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error-level logging, compiled against the calling module's
/// `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
