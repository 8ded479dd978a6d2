// roitab - core/reader.rs
//
// Stream-oriented record reading from coordinate log content.
// Core layer: accepts string content, never touches the filesystem.

use crate::core::model::RoiRecord;
use crate::util::error::ReadError;
use std::path::Path;

/// Configuration for record reading.
#[derive(Debug, Clone)]
pub struct ReadConfig {
    /// Field delimiter splitting the label compound from the value.
    pub delimiter: char,

    /// Malformed-record errors collected per file before suppression.
    pub max_record_errors: usize,
}

impl Default for ReadConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            delimiter: constants::DEFAULT_DELIMITER,
            max_record_errors: constants::MAX_RECORD_ERRORS_PER_FILE,
        }
    }
}

/// Result of reading one file's content into records.
#[derive(Debug)]
pub struct ReadResult {
    /// Well-formed records in source order.
    pub records: Vec<RoiRecord>,

    /// Malformed-record errors (capped at `max_record_errors`).
    pub errors: Vec<ReadError>,

    /// Total lines processed, including skipped blanks.
    pub lines_processed: u64,
}

/// Read delimiter-separated records out of `content`.
///
/// Each line splits on the configured delimiter into at least two fields:
/// the first is a compound "<label> <annotation>" (whitespace-separated,
/// only the first token is the label), the second is the measurement value
/// kept verbatim. Fields beyond the second are ignored. Blank lines are
/// skipped. Source order is preserved.
///
/// Lines with fewer than two fields, or with an empty label token, are
/// recorded as [`ReadError::MalformedRecord`] and skipped; reading always
/// continues to the end of the content.
pub fn read_records(content: &str, file_path: &Path, config: &ReadConfig) -> ReadResult {
    let mut records = Vec::new();
    let mut errors: Vec<ReadError> = Vec::new();
    let mut lines_processed: u64 = 0;

    for (line_idx, line) in content.lines().enumerate() {
        lines_processed += 1;
        let line_number = (line_idx as u64) + 1;

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split(config.delimiter);
        // split always yields at least one item
        let head = fields.next().unwrap_or("");
        let Some(value) = fields.next() else {
            if errors.len() < config.max_record_errors {
                errors.push(ReadError::MalformedRecord {
                    file: file_path.to_path_buf(),
                    line_number,
                    reason: format!(
                        "expected at least 2 '{}'-separated fields, found 1",
                        config.delimiter
                    ),
                });
            }
            continue;
        };

        let mut tokens = head.split_whitespace();
        let Some(label) = tokens.next() else {
            if errors.len() < config.max_record_errors {
                errors.push(ReadError::MalformedRecord {
                    file: file_path.to_path_buf(),
                    line_number,
                    reason: "label field is empty".to_string(),
                });
            }
            continue;
        };

        // Remaining tokens of the first field are annotation text. It plays
        // no part in the transform but is kept for diagnostics.
        let annotation = {
            let rest = tokens.collect::<Vec<_>>().join(" ");
            (!rest.is_empty()).then_some(rest)
        };

        records.push(RoiRecord {
            label: label.to_string(),
            annotation,
            value: value.to_string(),
            line_number,
        });
    }

    tracing::debug!(
        file = %file_path.display(),
        records = records.len(),
        errors = errors.len(),
        lines = lines_processed,
        "Record reading complete"
    );

    ReadResult {
        records,
        errors,
        lines_processed,
    }
}
