use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;
use std::path::Path;

use crate::mapping::ExportRecord;
use crate::schema::OutputSchema;

/// Write the header and every record with all fields quoted. Returns the data row count.
pub fn write_records<W: Write>(out: W, schema: &OutputSchema, records: &[ExportRecord]) -> Result<usize> {
    let mut wtr = WriterBuilder::new().quote_style(QuoteStyle::Always).from_writer(out);
    wtr.write_record(schema.titles())?;
    for rec in records {
        debug_assert!(rec.keys().eq(schema.ids()));
        wtr.write_record(rec.values())?;
    }
    wtr.flush()?;
    Ok(records.len())
}

/// Write the CSV to `path`, replacing any previous file there.
pub fn write_csv_file(path: &Path, schema: &OutputSchema, records: &[ExportRecord]) -> Result<usize> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    let file = std::fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let rows = write_records(&file, schema, records).with_context(|| format!("failed to write {}", path.display()))?;
    file.sync_all().with_context(|| format!("failed to sync {}", path.display()))?;
    Ok(rows)
}
