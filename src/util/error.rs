// roitab - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; all errors preserve the causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all roitab operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum RoiTabError {
    /// Coordinate label parsing failed.
    Label(LabelError),

    /// Input record reading failed.
    Read(ReadError),

    /// Input file discovery failed.
    Discovery(DiscoveryError),

    /// Table serialisation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for RoiTabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(e) => write!(f, "Label error: {e}"),
            Self::Read(e) => write!(f, "Read error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for RoiTabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Label(e) => Some(e),
            Self::Read(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Label errors
// ---------------------------------------------------------------------------

/// Errors raised while decomposing a coordinate label.
///
/// These carry no file context; the read layer wraps them in
/// [`ReadError::Label`] with the file path and line number attached.
#[derive(Debug)]
pub enum LabelError {
    /// The label contains neither an `x` nor a `y` axis marker.
    NoMarkers { label: String },

    /// An axis marker occurs more than once, making the split ambiguous.
    RepeatedMarker { label: String, marker: char },

    /// An axis numeral run exceeds the accepted digit count.
    NumeralOverflow {
        label: String,
        marker: char,
        digits: usize,
        max_digits: usize,
    },

    /// The label token exceeds the maximum accepted length.
    LabelTooLong { length: usize, max_length: usize },
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMarkers { label } => {
                write!(f, "label '{label}' has no x or y axis marker")
            }
            Self::RepeatedMarker { label, marker } => {
                write!(
                    f,
                    "label '{label}' contains marker '{marker}' more than once"
                )
            }
            Self::NumeralOverflow {
                label,
                marker,
                digits,
                max_digits,
            } => write!(
                f,
                "label '{label}': numeral after '{marker}' has {digits} digits, \
                 exceeds maximum of {max_digits}"
            ),
            Self::LabelTooLong { length, max_length } => {
                write!(
                    f,
                    "label is {length} bytes, exceeds maximum of {max_length}"
                )
            }
        }
    }
}

impl std::error::Error for LabelError {}

impl From<LabelError> for RoiTabError {
    fn from(e: LabelError) -> Self {
        Self::Label(e)
    }
}

// ---------------------------------------------------------------------------
// Read errors
// ---------------------------------------------------------------------------

/// Errors related to reading and decoding input records.
#[derive(Debug)]
pub enum ReadError {
    /// A line could not be split into the minimum number of fields.
    MalformedRecord {
        file: PathBuf,
        line_number: u64,
        reason: String,
    },

    /// A record's coordinate label failed to parse.
    Label {
        file: PathBuf,
        line_number: u64,
        source: LabelError,
    },

    /// File encoding is not valid UTF-8.
    InvalidEncoding {
        file: PathBuf,
        source: std::string::FromUtf8Error,
    },

    /// The input file does not exist.
    FileNotFound { file: PathBuf },

    /// I/O error while reading an input file.
    Io { file: PathBuf, source: io::Error },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord {
                file,
                line_number,
                reason,
            } => write!(f, "'{}' line {line_number}: {reason}", file.display()),
            Self::Label {
                file,
                line_number,
                source,
            } => write!(f, "'{}' line {line_number}: {source}", file.display()),
            Self::InvalidEncoding { file, source } => {
                write!(f, "'{}': invalid UTF-8 encoding: {source}", file.display())
            }
            Self::FileNotFound { file } => {
                write!(f, "input file '{}' does not exist", file.display())
            }
            Self::Io { file, source } => {
                write!(f, "'{}': I/O error: {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Label { source, .. } => Some(source),
            Self::InvalidEncoding { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ReadError> for RoiTabError {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to input file discovery in directory mode.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The input root does not exist.
    RootNotFound { path: PathBuf },

    /// The input root is not a directory.
    NotADirectory { path: PathBuf },

    /// The output root does not exist. Creating it is the caller's
    /// responsibility, not a side effect of conversion.
    OutputRootMissing { path: PathBuf },

    /// Permission denied accessing the input root.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// Walkdir traversal error (wraps individual file/dir access failures).
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Input path '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Input path '{}' is not a directory", path.display())
            }
            Self::OutputRootMissing { path } => {
                write!(
                    f,
                    "Output directory '{}' does not exist; create it before running",
                    path.display()
                )
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for RoiTabError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to table serialisation.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the destination file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for RoiTabError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for RoiTabError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for roitab results.
pub type Result<T> = std::result::Result<T, RoiTabError>;
