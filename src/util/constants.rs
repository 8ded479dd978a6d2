// roitab - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "roitab";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input record limits
// =============================================================================

/// Field delimiter used when none is configured.
pub const DEFAULT_DELIMITER: char = ':';

/// Maximum number of malformed-record errors tracked per file before
/// suppression. Keeps the error vector bounded for pathological inputs.
pub const MAX_RECORD_ERRORS_PER_FILE: usize = 1_000;

/// Minimum user-configurable record-error cap.
pub const MIN_RECORD_ERRORS_PER_FILE: usize = 1;

/// Maximum user-configurable record-error cap.
pub const ABSOLUTE_MAX_RECORD_ERRORS: usize = 100_000;

// =============================================================================
// Label limits
// =============================================================================

/// Maximum length in bytes of a coordinate label token. Labels beyond this
/// are rejected as malformed rather than parsed.
pub const MAX_LABEL_LENGTH: usize = 512;

/// Maximum number of digits accepted in a single axis numeral run.
/// 18 decimal digits always fit in a u64, so numeral parsing cannot overflow
/// and the element-key sum stays far below u64::MAX.
pub const MAX_NUMERAL_DIGITS: usize = 18;

// =============================================================================
// Discovery limits
// =============================================================================

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Maximum number of input files converted in a single directory run.
pub const DEFAULT_MAX_FILES: usize = 500;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 10_000;

/// Default include glob patterns for directory-mode input selection.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.txt"];

/// Extension given to every produced table file.
pub const OUTPUT_EXTENSION: &str = "csv";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name looked up in the working directory when no
/// --config path is given.
pub const CONFIG_FILE_NAME: &str = "roitab.toml";
