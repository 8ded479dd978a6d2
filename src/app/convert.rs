// roitab - app/convert.rs
//
// Single-file conversion pipeline: read the input log, build the table,
// write the CSV. This is the only place in the repository that opens
// files; the core layer stays filesystem-free.

use crate::app::config::AppConfig;
use crate::core::export::write_csv;
use crate::core::reader::{read_records, ReadConfig};
use crate::core::table::build_table;
use crate::util::error::{ExportError, ReadError, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Options controlling one file's conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Field delimiter in the input log.
    pub delimiter: char,

    /// Malformed-record errors tracked per file before suppression.
    pub max_record_errors: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            delimiter: constants::DEFAULT_DELIMITER,
            max_record_errors: constants::MAX_RECORD_ERRORS_PER_FILE,
        }
    }
}

impl From<&AppConfig> for ConvertOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            delimiter: config.delimiter,
            max_record_errors: config.max_record_errors,
        }
    }
}

/// Statistics for one converted file.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Source log path.
    pub input: PathBuf,

    /// Destination table path.
    pub output: PathBuf,

    /// Well-formed records read from the source.
    pub records: usize,

    /// Data rows written to the destination.
    pub rows: usize,

    /// Pair-type columns in the destination.
    pub columns: usize,

    /// Records skipped as malformed (record shape or label).
    pub skipped: usize,

    /// Cells overwritten by a later record (last-write-wins).
    pub overwrites: usize,
}

/// Convert one coordinate log into its pivoted CSV table.
///
/// Malformed records and labels skip only themselves (logged, capped);
/// a missing or undecodable input, or an unwritable destination, aborts
/// this file only. The destination is written directly in its final shape.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<FileReport> {
    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        "Conversion starting"
    );

    let bytes = fs::read(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ReadError::FileNotFound {
            file: input.to_path_buf(),
        },
        _ => ReadError::Io {
            file: input.to_path_buf(),
            source: e,
        },
    })?;
    let content = String::from_utf8(bytes).map_err(|e| ReadError::InvalidEncoding {
        file: input.to_path_buf(),
        source: e,
    })?;

    let read_config = ReadConfig {
        delimiter: options.delimiter,
        max_record_errors: options.max_record_errors,
    };
    let read_result = read_records(&content, input, &read_config);
    for error in &read_result.errors {
        tracing::warn!(error = %error, "Malformed record skipped");
    }

    let build = build_table(&read_result.records, input, options.max_record_errors);
    for error in &build.errors {
        tracing::warn!(error = %error, "Record with unparseable label skipped");
    }

    let file = File::create(output).map_err(|e| ExportError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;
    let rows = write_csv(&build.table, BufWriter::new(file), output)?;

    let report = FileReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        records: read_result.records.len(),
        rows,
        columns: build.table.columns.len(),
        skipped: read_result.errors.len() + build.errors.len(),
        overwrites: build.overwrites,
    };

    tracing::info!(
        input = %report.input.display(),
        output = %report.output.display(),
        records = report.records,
        rows = report.rows,
        columns = report.columns,
        skipped = report.skipped,
        "Conversion complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::RoiTabError;

    #[test]
    fn test_convert_reference_scenario() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("log.txt");
        let output = dir.path().join("data_out.csv");
        fs::write(&input, "y12x34 roi1:0.5\ny0x0 roi2:1.2\n").expect("write input");

        let report = convert_file(&input, &output, &ConvertOptions::default()).unwrap();
        assert_eq!(report.records, 2);
        assert_eq!(report.rows, 2);
        assert_eq!(report.columns, 1);
        assert_eq!(report.skipped, 0);

        let produced = fs::read_to_string(&output).expect("read output");
        assert_eq!(produced, "\"\"\n0,1.2\n46,0.5\n");
    }

    #[test]
    fn test_convert_missing_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = convert_file(
            &dir.path().join("absent.txt"),
            &dir.path().join("out.csv"),
            &ConvertOptions::default(),
        );
        assert!(matches!(
            result,
            Err(RoiTabError::Read(ReadError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_convert_invalid_utf8_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("binary.txt");
        fs::write(&input, [0xff, 0xfe, 0x00, 0x41]).expect("write input");

        let result = convert_file(
            &input,
            &dir.path().join("out.csv"),
            &ConvertOptions::default(),
        );
        assert!(matches!(
            result,
            Err(RoiTabError::Read(ReadError::InvalidEncoding { .. }))
        ));
    }

    #[test]
    fn test_convert_unwritable_destination() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("log.txt");
        fs::write(&input, "x1 a:1\n").expect("write input");

        // Destination inside a directory that does not exist.
        let result = convert_file(
            &input,
            &dir.path().join("no_such_dir").join("out.csv"),
            &ConvertOptions::default(),
        );
        assert!(matches!(
            result,
            Err(RoiTabError::Export(ExportError::Io { .. }))
        ));
    }

    #[test]
    fn test_convert_skips_bad_records_and_reports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("log.txt");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "x1 a:1\nno-delimiter-here\nnomarker b:2\nx2 c:3\n",
        )
        .expect("write input");

        let report = convert_file(&input, &output, &ConvertOptions::default()).unwrap();
        assert_eq!(report.records, 3, "three lines split into records");
        assert_eq!(report.rows, 2, "only well-labelled records pivot");
        assert_eq!(report.skipped, 2);
    }

    /// Running the transform twice on the same input is byte-identical.
    #[test]
    fn test_convert_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("log.txt");
        fs::write(&input, "ax3 r:1\nby9 r:2\nax9 r:3\n").expect("write input");

        let out1 = dir.path().join("first.csv");
        let out2 = dir.path().join("second.csv");
        convert_file(&input, &out1, &ConvertOptions::default()).unwrap();
        convert_file(&input, &out2, &ConvertOptions::default()).unwrap();

        assert_eq!(
            fs::read(&out1).unwrap(),
            fs::read(&out2).unwrap(),
            "repeated runs must produce byte-identical output"
        );
    }
}
