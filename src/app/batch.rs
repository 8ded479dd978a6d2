// roitab - app/batch.rs
//
// Directory-mode conversion: discover matching input files one level deep,
// convert each independently, and report per-file outcomes.
//
// Files are independent — each reads its own input and writes its own
// output, with no shared mutable state — so the batch runs them in
// parallel with rayon. A failed file never blocks or corrupts the others.

use crate::app::config::AppConfig;
use crate::app::convert::{convert_file, ConvertOptions, FileReport};
use crate::util::constants;
use crate::util::error::{DiscoveryError, Result, RoiTabError};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Options controlling one directory run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Glob patterns (filename-only) an input file must match.
    pub include_patterns: Vec<String>,

    /// Maximum number of files converted in one run.
    pub max_files: usize,

    /// Per-file conversion options.
    pub convert: ConvertOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_files: constants::DEFAULT_MAX_FILES,
            convert: ConvertOptions::default(),
        }
    }
}

impl From<&AppConfig> for BatchOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            include_patterns: config.include_patterns.clone(),
            max_files: config.max_files,
            convert: ConvertOptions::from(config),
        }
    }
}

/// Outcome of one directory run.
#[derive(Debug)]
pub struct BatchSummary {
    /// Reports for files that converted successfully, in input-name order.
    pub converted: Vec<FileReport>,

    /// Files that failed, with the error that stopped each one.
    pub failed: Vec<(PathBuf, RoiTabError)>,

    /// Directory entries skipped because they matched no include pattern.
    pub skipped: usize,

    /// Non-fatal discovery warnings (inaccessible entries, truncation).
    pub warnings: Vec<String>,
}

impl BatchSummary {
    /// True when every discovered file converted.
    pub fn all_converted(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert every matching file directly inside `input_dir`, producing a
/// same-stem `.csv` file in `output_dir` for each.
///
/// `output_dir` must already exist; it is never created here.
///
/// # Fatal errors
/// Returns `Err` only when a root is invalid (`RootNotFound`,
/// `NotADirectory`, `OutputRootMissing`, `PermissionDenied`). Per-file
/// failures are collected in the summary and do not stop the run.
pub fn convert_dir(
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    validate_roots(input_dir, output_dir)?;

    let max_files = options.max_files.min(constants::ABSOLUTE_MAX_FILES);
    let include_pats = compile_patterns(&options.include_patterns);

    tracing::debug!(
        input = %input_dir.display(),
        output = %output_dir.display(),
        include = ?options.include_patterns,
        max_files,
        "Directory conversion starting"
    );

    let mut inputs: Vec<PathBuf> = Vec::new();
    let mut skipped = 0usize;
    let mut warnings: Vec<String> = Vec::new();

    // Depth 1: only files directly inside the input directory take part.
    for entry_result in walkdir::WalkDir::new(input_dir)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if !is_included(file_name, &include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            skipped += 1;
            continue;
        }

        if inputs.len() >= max_files {
            warnings.push(format!(
                "More than {max_files} matching files found; the excess was not converted. \
                 Raise [discovery] max_files to convert more."
            ));
            break;
        }
        inputs.push(path.to_path_buf());
    }

    // Name order keeps run output deterministic whatever the walk returned.
    inputs.sort_unstable();

    let outcomes: Vec<(PathBuf, Result<FileReport>)> = inputs
        .par_iter()
        .map(|input| {
            let output = output_dir
                .join(input.file_name().unwrap_or_default())
                .with_extension(constants::OUTPUT_EXTENSION);
            (input.clone(), convert_file(input, &output, &options.convert))
        })
        .collect();

    let mut converted = Vec::new();
    let mut failed = Vec::new();
    for (input, outcome) in outcomes {
        match outcome {
            Ok(report) => converted.push(report),
            Err(e) => {
                tracing::error!(file = %input.display(), error = %e, "File conversion failed");
                failed.push((input, e));
            }
        }
    }

    tracing::info!(
        converted = converted.len(),
        failed = failed.len(),
        skipped,
        "Directory conversion complete"
    );

    Ok(BatchSummary {
        converted,
        failed,
        skipped,
        warnings,
    })
}

/// Pre-flight validation of both roots.
///
/// `fs::metadata` is used rather than `Path::exists` / `Path::is_dir`
/// because those helpers map ALL errors — including PermissionDenied — to
/// `false`, making an access-denied root indistinguishable from a missing
/// one.
fn validate_roots(input_dir: &Path, output_dir: &Path) -> Result<()> {
    match fs::metadata(input_dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(DiscoveryError::NotADirectory {
                path: input_dir.to_path_buf(),
            }
            .into())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DiscoveryError::PermissionDenied {
                path: input_dir.to_path_buf(),
                source: e,
            }
            .into())
        }
        Err(_) => {
            return Err(DiscoveryError::RootNotFound {
                path: input_dir.to_path_buf(),
            }
            .into())
        }
    }

    match fs::metadata(output_dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(DiscoveryError::OutputRootMissing {
            path: output_dir.to_path_buf(),
        }
        .into()),
    }
}

/// Compile glob pattern strings, logging and skipping any that fail.
fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Returns true if `file_name` matches at least one include pattern.
fn is_included(file_name: &str, include_pats: &[glob::Pattern]) -> bool {
    include_pats.iter().any(|p| p.matches(file_name))
}
