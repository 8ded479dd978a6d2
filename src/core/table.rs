// roitab - core/table.rs
//
// Accumulate parsed records into the wide output table.
//
// Two-phase: a single pass folds (element, pair-type) -> value into a
// sparse map with last-write-wins semantics, then the pivot enumerates the
// distinct element numbers ascending and the distinct pair types in
// first-seen order to lay out rows and columns.

use crate::core::label::{element_key, pair_type, parse_label};
use crate::core::model::{RoiRecord, RoiTable, TableRow};
use crate::util::error::ReadError;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Result of building one file's table.
#[derive(Debug)]
pub struct BuildResult {
    /// The pivoted table.
    pub table: RoiTable,

    /// Records skipped because their label failed to parse (capped).
    pub errors: Vec<ReadError>,

    /// Number of accumulated cells overwritten by a later record mapping to
    /// the same (element, pair-type) pair.
    pub overwrites: usize,
}

/// Build the wide table from an ordered sequence of records.
///
/// Malformed labels skip only their own record; every error is collected
/// (capped at `max_errors`) and the remaining records still contribute.
/// When two records map to the same (element, pair-type) cell, the later
/// record's value silently replaces the earlier one.
pub fn build_table(records: &[RoiRecord], file_path: &Path, max_errors: usize) -> BuildResult {
    let mut columns: Vec<String> = Vec::new();
    let mut column_index: HashMap<String, usize> = HashMap::new();
    let mut cells: HashMap<(u64, usize), String> = HashMap::new();
    let mut elements: BTreeSet<u64> = BTreeSet::new();
    let mut errors: Vec<ReadError> = Vec::new();
    let mut overwrites = 0usize;

    for record in records {
        let parsed = match parse_label(&record.label) {
            Ok(p) => p,
            Err(e) => {
                if errors.len() < max_errors {
                    errors.push(ReadError::Label {
                        file: file_path.to_path_buf(),
                        line_number: record.line_number,
                        source: e,
                    });
                }
                continue;
            }
        };

        let element = element_key(&parsed);
        let column = pair_type(&parsed);

        let col_idx = match column_index.get(&column) {
            Some(&idx) => idx,
            None => {
                let idx = columns.len();
                columns.push(column.clone());
                column_index.insert(column, idx);
                idx
            }
        };

        elements.insert(element);
        if cells.insert((element, col_idx), record.value.clone()).is_some() {
            tracing::trace!(
                element,
                column = %columns[col_idx],
                line = record.line_number,
                "Cell overwritten by later record"
            );
            overwrites += 1;
        }
    }

    // Pivot: rows ascending by element number, one cell slot per column.
    let rows: Vec<TableRow> = elements
        .into_iter()
        .map(|element| TableRow {
            element,
            cells: (0..columns.len())
                .map(|idx| cells.remove(&(element, idx)))
                .collect(),
        })
        .collect();

    tracing::debug!(
        file = %file_path.display(),
        rows = rows.len(),
        columns = columns.len(),
        skipped = errors.len(),
        overwrites,
        "Table built"
    );

    BuildResult {
        table: RoiTable { columns, rows },
        errors,
        overwrites,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants;
    use std::path::PathBuf;

    fn record(label: &str, value: &str, line_number: u64) -> RoiRecord {
        RoiRecord {
            label: label.to_string(),
            annotation: None,
            value: value.to_string(),
            line_number,
        }
    }

    fn build(records: &[RoiRecord]) -> BuildResult {
        build_table(
            records,
            &PathBuf::from("test.txt"),
            constants::MAX_RECORD_ERRORS_PER_FILE,
        )
    }

    /// The reference scenario: two digit-only labels share the empty pair
    /// type, so the table has one empty-named column and two ascending rows.
    #[test]
    fn test_reference_scenario() {
        let result = build(&[record("y12x34", "0.5", 1), record("y0x0", "1.2", 2)]);

        assert_eq!(result.table.columns, vec!["".to_string()]);
        assert_eq!(result.table.rows.len(), 2);
        assert_eq!(result.table.rows[0].element, 0);
        assert_eq!(result.table.rows[1].element, 46);
        assert_eq!(result.table.cell(0, ""), Some("1.2"));
        assert_eq!(result.table.cell(46, ""), Some("0.5"));
        assert!(result.errors.is_empty());
    }

    /// Distinct coordinates may sum to the same element number. They land on
    /// the same row, differentiated by pair type.
    #[test]
    fn test_element_collision_splits_by_pair_type() {
        let result = build(&[record("ax8", "left", 1), record("by8", "right", 2)]);

        assert_eq!(result.table.rows.len(), 1);
        assert_eq!(result.table.rows[0].element, 8);
        assert_eq!(result.table.columns, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(result.table.cell(8, "a"), Some("left"));
        assert_eq!(result.table.cell(8, "b"), Some("right"));
        assert_eq!(result.overwrites, 0);
    }

    /// Same (element, pair-type) pair: the later record wins silently.
    #[test]
    fn test_last_write_wins() {
        let result = build(&[record("x5", "first", 1), record("y5", "second", 2)]);

        assert_eq!(result.table.rows.len(), 1);
        assert_eq!(result.table.cell(5, ""), Some("second"));
        assert_eq!(result.overwrites, 1);
    }

    /// Columns appear in first-seen order regardless of row order.
    #[test]
    fn test_column_order_is_first_seen() {
        let result = build(&[
            record("zebx9", "1", 1),
            record("altx3", "2", 2),
            record("zebx1", "3", 3),
        ]);
        assert_eq!(
            result.table.columns,
            vec!["zeb".to_string(), "alt".to_string()]
        );
    }

    /// Rows come out ascending by element number whatever the input order.
    #[test]
    fn test_rows_sorted_ascending() {
        let result = build(&[
            record("x30", "c", 1),
            record("x10", "a", 2),
            record("x20", "b", 3),
        ]);
        let elements: Vec<u64> = result.table.rows.iter().map(|r| r.element).collect();
        assert_eq!(elements, vec![10, 20, 30]);
    }

    /// Cells with no contributing record stay empty.
    #[test]
    fn test_unmatched_cells_are_empty() {
        let result = build(&[record("ax1", "v1", 1), record("bx2", "v2", 2)]);

        assert_eq!(result.table.rows.len(), 2);
        // Row 1 has a value only in column "a"; row 2 only in column "b".
        assert_eq!(result.table.rows[0].cells, vec![Some("v1".to_string()), None]);
        assert_eq!(result.table.rows[1].cells, vec![None, Some("v2".to_string())]);
    }

    /// A malformed label skips its record and is reported; others survive.
    #[test]
    fn test_malformed_label_skips_record() {
        let result = build(&[
            record("nomarker", "dropped", 1),
            record("x1x2", "dropped", 2),
            record("x3", "kept", 3),
        ]);

        assert_eq!(result.table.rows.len(), 1);
        assert_eq!(result.table.cell(3, ""), Some("kept"));
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(
            result.errors[0],
            ReadError::Label { line_number: 1, .. }
        ));
        assert!(matches!(
            result.errors[1],
            ReadError::Label { line_number: 2, .. }
        ));
    }

    #[test]
    fn test_label_error_cap() {
        let records: Vec<RoiRecord> = (1..=5)
            .map(|i| record("nomarker", "v", i))
            .collect();
        let result = build_table(&records, &PathBuf::from("test.txt"), 3);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_empty_input_builds_empty_table() {
        let result = build(&[]);
        assert!(result.table.is_empty());
        assert!(result.table.columns.is_empty());
    }
}
