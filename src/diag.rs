use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Turn on debug lines for the rest of the process (`--verbose`).
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Always printed to stderr.
pub fn warn(msg: String) {
    eprintln!("warning: {}", msg);
}

/// Printed to stderr only in verbose mode.
pub fn debug(msg: String) {
    if is_verbose() {
        eprintln!("{}", msg);
    }
}

/// Like `eprintln!` with a `warning:` prefix.
#[macro_export]
macro_rules! warn_eprintln {
    ($($arg:tt)*) => {
        $crate::diag::warn(format!($($arg)*))
    };
}

/// Like `eprintln!`, but silent unless `--verbose` was given.
#[macro_export]
macro_rules! debug_eprintln {
    ($($arg:tt)*) => {
        if $crate::diag::is_verbose() {
            $crate::diag::debug(format!($($arg)*))
        }
    };
}
