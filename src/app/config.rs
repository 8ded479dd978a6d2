// roitab - app/config.rs
//
// roitab.toml loading with startup validation.
//
// The config file is optional: an explicit --config path wins, otherwise
// roitab.toml in the working directory is used if present, otherwise
// defaults apply. Invalid values never abort a run; they produce actionable
// warnings and fall back to defaults.

use crate::util::constants;
use std::path::Path;

/// Raw deserialisable shape of roitab.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[input]` section.
    pub input: InputSection,
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[input]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Field delimiter (single character).
    pub delimiter: Option<String>,
    /// Malformed-record errors tracked per file.
    pub max_record_errors: Option<usize>,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Include glob patterns for directory mode.
    pub include_patterns: Option<Vec<String>>,
    /// Maximum files converted per directory run.
    pub max_files: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from roitab.toml.
///
/// All values are validated against named constants at load time.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Input --
    /// Field delimiter.
    pub delimiter: char,
    /// Malformed-record errors tracked per file.
    pub max_record_errors: usize,

    // -- Discovery --
    /// Include glob patterns for directory mode.
    pub include_patterns: Vec<String>,
    /// Maximum files converted per directory run.
    pub max_files: usize,

    // -- Logging --
    /// Logging level string (consumed before tracing is initialised).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            delimiter: constants::DEFAULT_DELIMITER,
            max_record_errors: constants::MAX_RECORD_ERRORS_PER_FILE,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_files: constants::DEFAULT_MAX_FILES,
            log_level: None,
        }
    }
}

/// Load and validate configuration from `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. If the file does not exist, returns defaults with no warnings
/// (first-run). If the file is unreadable or unparseable, returns defaults
/// with an error warning -- the run still proceeds but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config file");

    // Validate each field against named constants, accumulating all errors.
    let mut config = AppConfig::default();

    // -- Input: delimiter --
    if let Some(ref delim) = raw.input.delimiter {
        let mut chars = delim.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => config.delimiter = c,
            _ => {
                warnings.push(format!(
                    "[input] delimiter = \"{delim}\" must be exactly one character. \
                     Using default ('{}').",
                    constants::DEFAULT_DELIMITER,
                ));
            }
        }
    }

    // -- Input: max_record_errors --
    if let Some(cap) = raw.input.max_record_errors {
        if (constants::MIN_RECORD_ERRORS_PER_FILE..=constants::ABSOLUTE_MAX_RECORD_ERRORS)
            .contains(&cap)
        {
            config.max_record_errors = cap;
        } else {
            warnings.push(format!(
                "[input] max_record_errors = {cap} is out of range ({}-{}). Using default ({}).",
                constants::MIN_RECORD_ERRORS_PER_FILE,
                constants::ABSOLUTE_MAX_RECORD_ERRORS,
                constants::MAX_RECORD_ERRORS_PER_FILE,
            ));
        }
    }

    // -- Discovery: include_patterns --
    if let Some(ref patterns) = raw.discovery.include_patterns {
        if patterns.is_empty() {
            warnings.push(
                "[discovery] include_patterns is empty; no file would ever match. \
                 Using default ([\"*.txt\"])."
                    .to_string(),
            );
        } else {
            config.include_patterns = patterns.clone();
        }
    }

    // -- Discovery: max_files --
    if let Some(files) = raw.discovery.max_files {
        if (constants::MIN_MAX_FILES..=constants::ABSOLUTE_MAX_FILES).contains(&files) {
            config.max_files = files;
        } else {
            warnings.push(format!(
                "[discovery] max_files = {files} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_FILES,
                constants::ABSOLUTE_MAX_FILES,
                constants::DEFAULT_MAX_FILES,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn load_str(content: &str) -> (AppConfig, Vec<String>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("roitab.toml");
        fs::write(&path, content).expect("write config");
        load_config(&path)
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let (config, warnings) = load_config(Path::new("/nonexistent/roitab.toml"));
        assert_eq!(config.delimiter, ':');
        assert_eq!(config.include_patterns, vec!["*.txt".to_string()]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_config_applies() {
        let (config, warnings) = load_str(
            r#"
[input]
delimiter = ";"
max_record_errors = 10

[discovery]
include_patterns = ["*.log", "*.txt"]
max_files = 25

[logging]
level = "debug"
"#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.max_record_errors, 10);
        assert_eq!(config.include_patterns.len(), 2);
        assert_eq!(config.max_files, 25);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_multichar_delimiter_warns_and_falls_back() {
        let (config, warnings) = load_str("[input]\ndelimiter = \"::\"\n");
        assert_eq!(config.delimiter, ':');
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("delimiter"));
    }

    #[test]
    fn test_out_of_range_max_files_warns() {
        let (config, warnings) = load_str("[discovery]\nmax_files = 0\n");
        assert_eq!(config.max_files, constants::DEFAULT_MAX_FILES);
        assert!(warnings[0].contains("max_files"));
    }

    #[test]
    fn test_empty_include_patterns_warns() {
        let (config, warnings) = load_str("[discovery]\ninclude_patterns = []\n");
        assert_eq!(config.include_patterns, vec!["*.txt".to_string()]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unparseable_toml_warns_and_falls_back() {
        let (config, warnings) = load_str("not valid toml [[[");
        assert_eq!(config.delimiter, ':');
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("parse"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_, warnings) = load_str("[input]\nfuture_option = true\n");
        assert!(warnings.is_empty(), "unknown keys must not warn");
    }

    #[test]
    fn test_invalid_log_level_warns() {
        let (config, warnings) = load_str("[logging]\nlevel = \"verbose\"\n");
        assert_eq!(config.log_level, None);
        assert!(warnings[0].contains("level"));
    }
}
