use crate::error::{Result, SalesError};
use crate::table::SalesTable;
use arrow::{
    array::{Array, Float64Array},
    util::display::{ArrayFormatter, FormatOptions},
};
use csv::{QuoteStyle, WriterBuilder};
use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::Path,
};
use tracing::info;

/// Write `table` as comma-delimited text with a header row.
///
/// - strings are quoted only when they contain the delimiter, a quote or a newline
/// - Float64 cells use plain positional decimals (`0.0000001`, never `1e-7`),
///   other types use Arrow's display; nulls are empty fields
/// - the file is written to a hidden temp file beside `path` and renamed
///   over it, so the target is either complete or untouched
///
/// A missing parent directory is an `Io` failure.
#[tracing::instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display()))]
pub fn write_csv<P: AsRef<Path>>(table: &SalesTable, path: P) -> Result<()> {
    // 1) Build ".../.<name>.tmp" next to the target
    let path = path.as_ref();
    let file_name = path.file_name().ok_or_else(|| {
        SalesError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

    // 2) Write everything to the temp file
    if let Err(e) = write_records(table, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    // 3) Rename over the target
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SalesError::io(path, e)
    })?;

    info!(rows = table.num_rows(), "wrote csv");
    Ok(())
}

/// How one column renders its cells.
enum CellFormat<'a> {
    Float(&'a Float64Array),
    Arrow(ArrayFormatter<'a>),
}

impl CellFormat<'_> {
    fn cell(&self, row: usize) -> String {
        match self {
            CellFormat::Float(arr) if arr.is_null(row) => String::new(),
            CellFormat::Float(arr) => arr.value(row).to_string(),
            CellFormat::Arrow(f) => f.value(row).to_string(),
        }
    }
}

fn write_records(table: &SalesTable, tmp_path: &Path) -> Result<()> {
    let file = File::create(tmp_path).map_err(|e| SalesError::io(tmp_path, e))?;
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(BufWriter::new(file));

    writer.write_record(table.column_names())?;

    let options = FormatOptions::default();
    let formatters = table
        .batch()
        .columns()
        .iter()
        .map(|col| match col.as_any().downcast_ref::<Float64Array>() {
            Some(floats) => Ok(CellFormat::Float(floats)),
            None => ArrayFormatter::try_new(col.as_ref(), &options).map(CellFormat::Arrow),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for row in 0..table.num_rows() {
        writer.write_record(formatters.iter().map(|f| f.cell(row)))?;
    }

    writer.flush().map_err(|e| SalesError::io(tmp_path, e))?;
    Ok(())
}
