// roitab - core/export.rs
//
// CSV serialisation of the pivoted table.
// Core layer: writes to any Write trait object.

use crate::core::model::RoiTable;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Serialise `table` as CSV.
///
/// The first line is the header of pair-type column names only; each data
/// line then carries the element number as an unlabelled leading field
/// followed by the column values. The shape is written directly — there is
/// no intermediate pivot header to strip afterwards. Data rows therefore
/// hold one more field than the header, which is why the writer runs in
/// flexible mode.
///
/// A header consisting of a single empty column name is emitted as an
/// explicitly quoted empty field (`""`), keeping the line distinguishable
/// from a blank record on re-read. An empty table produces an empty file.
///
/// Returns the number of data rows written.
pub fn write_csv<W: Write>(
    table: &RoiTable,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    if table.columns.is_empty() {
        // No records survived parsing: nothing to describe, nothing to write.
        csv_writer.flush().map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: e,
        })?;
        return Ok(0);
    }

    // Header: column names only, no leading cell for the element number.
    csv_writer
        .write_record(&table.columns)
        .map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    let mut count = 0;
    for row in &table.rows {
        let element = row.element.to_string();
        let fields = std::iter::once(element.as_str())
            .chain(row.cells.iter().map(|c| c.as_deref().unwrap_or("")));

        csv_writer
            .write_record(fields)
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}
