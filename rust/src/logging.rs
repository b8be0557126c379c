//! Logging macros for the build-order scheduler with verbosity level control.
//!
//! Zero-cost when disabled (verbosity=0). Levels:
//! - 0: SILENT (nothing)
//! - 1: CHANGES (committed actions and groups, residual groups)
//! - 2: CHECKS (candidate resolution and single-vs-group comparisons)
//! - 3: DEBUG (group queue rebuilds and invalidation internals)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: committed actions, popped groups, end-of-run summary.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: candidate rows, satisfied skips, group pushes.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: queue invalidation and per-group recomputation.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_arguments_only_evaluated_at_enabled_levels() {
        let mut formatted = 0;
        let mut describe = |name: &str| {
            formatted += 1;
            name.to_string()
        };

        log_changes!(VERBOSITY_SILENT, "commit {}", describe("Woodcutter 1"));
        log_checks!(VERBOSITY_CHANGES, "candidate {}", describe("Clay Pit 2"));
        log_debug!(VERBOSITY_CHECKS, "rebuild {}", describe("Granary 3"));
        log_changes!(VERBOSITY_CHANGES, "commit {}", describe("Cropland 1"));
        log_debug!(VERBOSITY_DEBUG, "rebuild {}", describe("Warehouse 4"));

        assert_eq!(formatted, 2);
    }
}
